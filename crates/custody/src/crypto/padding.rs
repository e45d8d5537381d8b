//! PKCS#7 padding to the AES block size.

use super::CipherError;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Copy `data` and append 1..=16 bytes, each equal to the pad length.
///
/// The output is allocated at its final size, so no partial copy of `data` is
/// left behind by a reallocation.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let n = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Verify PKCS#7 padding and borrow the unpadded prefix.
///
/// # Errors
///
/// Returns [`CipherError::MalformedCiphertext`] if the length is not a nonzero
/// multiple of the block size or the pad bytes are inconsistent.
pub fn unpad(data: &[u8]) -> Result<&[u8], CipherError> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(CipherError::MalformedCiphertext("padded length is not a block multiple"));
    }
    let n = data[data.len() - 1] as usize;
    if n == 0 || n > BLOCK_LEN || data[data.len() - n..].iter().any(|&b| b as usize != n) {
        return Err(CipherError::MalformedCiphertext("invalid padding"));
    }
    Ok(&data[..data.len() - n])
}
