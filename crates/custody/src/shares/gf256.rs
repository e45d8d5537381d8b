//! Arithmetic over GF(2^8) with the AES reduction polynomial
//! x^8 + x^4 + x^3 + x + 1 (0x11B).
//!
//! Multiplication and inversion never branch or index on their operands, so
//! timing does not depend on secret bytes or share values.

/// Field addition (and subtraction): XOR.
#[inline]
pub const fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication by shift-and-add, reduced modulo 0x11B each step.
pub const fn mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    let mut i = 0;
    while i < 8 {
        // All-ones when the low bit of `b` is set, zero otherwise.
        product ^= a & (b & 1).wrapping_neg();
        let carry = (a >> 7).wrapping_neg();
        a = (a << 1) ^ (0x1B & carry);
        b >>= 1;
        i += 1;
    }
    product
}

/// Multiplicative inverse as `a^254`. Maps 0 to 0.
pub const fn inv(a: u8) -> u8 {
    let a2 = mul(a, a);
    let a3 = mul(a2, a);
    let a6 = mul(a3, a3);
    let a12 = mul(a6, a6);
    let a15 = mul(a12, a3);
    let a30 = mul(a15, a15);
    let a60 = mul(a30, a30);
    let a63 = mul(a60, a3);
    let a126 = mul(a63, a63);
    let a127 = mul(a126, a);
    mul(a127, a127)
}

/// Field division. `b` must be nonzero.
#[inline]
pub const fn div(a: u8, b: u8) -> u8 {
    mul(a, inv(b))
}

/// Evaluate a polynomial at `x` with Horner's rule.
///
/// `coeffs[0]` is the constant term.
pub fn eval(coeffs: &[u8], x: u8) -> u8 {
    coeffs
        .iter()
        .rev()
        .fold(0u8, |acc, &c| add(mul(acc, x), c))
}

/// Lagrange basis weights at zero for the evaluation points `xs`.
///
/// `weights[i] = Π_{j≠i} x_j / (x_j − x_i)`. Points must be distinct and
/// nonzero; callers validate that.
pub fn lagrange_weights_at_zero(xs: &[u8]) -> Vec<u8> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            xs.iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(1u8, |acc, (_, &xj)| mul(acc, div(xj, add(xj, xi))))
        })
        .collect()
}
