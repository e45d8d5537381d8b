//! Threshold secret sharing (Shamir) over GF(256).
//!
//! [`split`] turns a secret into `n` shares such that any `t` of them recover it
//! through [`combine`], while `t − 1` or fewer carry no information about it.
//! Each secret byte gets its own random polynomial of degree `t − 1` whose
//! constant term is that byte; share `i` holds the evaluations at `x = i`.
//!
//! # Share text format
//!
//! ```text
//! s1.<index>.<base64url-no-pad(value)>
//! ```
//!
//! # Limitations
//!
//! Shares are not authenticated. Combining shares from a different secret or a
//! different threshold silently yields a wrong secret of the right length;
//! callers verify the result downstream (see `CustodyManager` commitments).

mod gf256;

use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::secret::MasterSecret;

/// Largest number of shares: one per nonzero element of GF(256).
pub const MAX_SHARES: usize = 255;

/// Prefix of the share text encoding.
pub const SHARE_PREFIX: &str = "s1";

/// Errors produced by the share codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// The threshold is zero or larger than the share count.
    #[error("invalid threshold {threshold} for {share_count} shares")]
    InvalidThreshold { threshold: usize, share_count: usize },

    /// More shares were requested than GF(256) has evaluation points.
    #[error("share count {0} exceeds the maximum of {MAX_SHARES}")]
    ShareCountOutOfRange(usize),

    /// The secret to split has zero length.
    #[error("secret must not be empty")]
    EmptySecret,

    /// Fewer distinct shares than the threshold were supplied.
    #[error("insufficient shares: {required} required, {supplied} distinct supplied")]
    InsufficientShares { required: usize, supplied: usize },

    /// A share has index zero, an unexpected length, or unparseable text.
    #[error("malformed share: {0}")]
    MalformedShare(&'static str),
}

/// One evaluation point `(index, value)` of the sharing polynomials.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// Nonzero x-coordinate.
    pub index: u8,
    /// One evaluation per secret byte.
    pub value: Vec<u8>,
}

impl Share {
    pub fn new(index: u8, value: Vec<u8>) -> Self {
        Self { index, value }
    }

    /// Encode as `s1.<index>.<base64url(value)>`.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}.{}.{}",
            SHARE_PREFIX,
            self.index,
            URL_SAFE_NO_PAD.encode(&self.value),
        )
    }

    /// Parse the text produced by [`Share::to_string_repr`].
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::MalformedShare`] on a bad prefix, a zero or
    /// non-numeric index, invalid base64, or an empty value.
    pub fn parse(s: &str) -> Result<Self, ShareError> {
        let parts: Vec<&str> = s.splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != SHARE_PREFIX {
            return Err(ShareError::MalformedShare("unrecognised share encoding"));
        }
        let index: u8 = parts[1]
            .parse()
            .map_err(|_| ShareError::MalformedShare("share index is not a number in 1..=255"))?;
        if index == 0 {
            return Err(ShareError::MalformedShare("share index must be nonzero"));
        }
        let value = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| ShareError::MalformedShare("share value is not base64url"))?;
        if value.is_empty() {
            return Err(ShareError::MalformedShare("share value is empty"));
        }
        Ok(Self { index, value })
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("value", &format_args!("[REDACTED; {}]", self.value.len()))
            .finish()
    }
}

/// The `n` shares produced by one [`split`], plus the threshold used.
#[derive(Clone, Debug)]
pub struct ShareSet {
    threshold: usize,
    shares: Vec<Share>,
}

impl ShareSet {
    /// Assemble a share set received from an external provisioning step.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidThreshold`] if `threshold` is zero or
    /// exceeds the number of shares, and [`ShareError::MalformedShare`] if
    /// indices repeat or are zero, or values differ in length.
    pub fn from_parts(threshold: usize, shares: Vec<Share>) -> Result<Self, ShareError> {
        if threshold == 0 || threshold > shares.len() {
            return Err(ShareError::InvalidThreshold {
                threshold,
                share_count: shares.len(),
            });
        }
        let mut seen = [false; 256];
        let len = shares[0].value.len();
        for share in &shares {
            if share.index == 0 {
                return Err(ShareError::MalformedShare("share index must be nonzero"));
            }
            if seen[share.index as usize] {
                return Err(ShareError::MalformedShare("duplicate share index"));
            }
            seen[share.index as usize] = true;
            if share.value.len() != len || len == 0 {
                return Err(ShareError::MalformedShare("inconsistent share lengths"));
            }
        }
        Ok(Self { threshold, shares })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn as_slice(&self) -> &[Share] {
        &self.shares
    }

    /// Look up a share by its index.
    pub fn get(&self, index: u8) -> Option<&Share> {
        self.shares.iter().find(|s| s.index == index)
    }

    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }
}

/// Split `secret` into `share_count` shares, any `threshold` of which recover it.
///
/// Shares are indexed `1..=share_count`.
///
/// # Errors
///
/// - [`ShareError::InvalidThreshold`] if `threshold < 1` or `threshold > share_count`.
/// - [`ShareError::ShareCountOutOfRange`] if `share_count > 255`.
/// - [`ShareError::EmptySecret`] if `secret` is empty.
pub fn split(secret: &[u8], share_count: usize, threshold: usize) -> Result<ShareSet, ShareError> {
    if threshold == 0 || threshold > share_count {
        return Err(ShareError::InvalidThreshold {
            threshold,
            share_count,
        });
    }
    if share_count > MAX_SHARES {
        return Err(ShareError::ShareCountOutOfRange(share_count));
    }
    if secret.is_empty() {
        return Err(ShareError::EmptySecret);
    }

    let mut shares: Vec<Share> = (1..=share_count as u8)
        .map(|index| Share::new(index, vec![0u8; secret.len()]))
        .collect();

    let mut coeffs = Zeroizing::new(vec![0u8; threshold]);
    for (pos, &byte) in secret.iter().enumerate() {
        coeffs[0] = byte;
        OsRng.fill_bytes(&mut coeffs[1..]);
        for share in &mut shares {
            share.value[pos] = gf256::eval(&coeffs, share.index);
        }
    }

    debug!(share_count, threshold, secret_len = secret.len(), "secret split into shares");
    Ok(ShareSet { threshold, shares })
}

/// Recover the secret from at least `threshold` shares with distinct indices.
///
/// Shares with a repeated index are ignored after the first occurrence. The
/// first `threshold` distinct shares are interpolated at zero.
///
/// # Errors
///
/// - [`ShareError::InvalidThreshold`] if `threshold` is zero.
/// - [`ShareError::InsufficientShares`] if fewer than `threshold` distinct
///   indices are present.
/// - [`ShareError::MalformedShare`] if a used share has index zero or its
///   length differs from the others.
pub fn combine(shares: &[Share], threshold: usize) -> Result<MasterSecret, ShareError> {
    if threshold == 0 {
        return Err(ShareError::InvalidThreshold {
            threshold,
            share_count: shares.len(),
        });
    }

    let mut seen = [false; 256];
    let mut used: Vec<&Share> = Vec::with_capacity(threshold);
    for share in shares {
        if seen[share.index as usize] {
            continue;
        }
        seen[share.index as usize] = true;
        used.push(share);
    }
    if used.len() < threshold {
        return Err(ShareError::InsufficientShares {
            required: threshold,
            supplied: used.len(),
        });
    }
    used.truncate(threshold);

    if used.iter().any(|s| s.index == 0) {
        return Err(ShareError::MalformedShare("share index must be nonzero"));
    }
    let len = used[0].value.len();
    if len == 0 || used.iter().any(|s| s.value.len() != len) {
        return Err(ShareError::MalformedShare("inconsistent share lengths"));
    }

    let xs: Vec<u8> = used.iter().map(|s| s.index).collect();
    let weights = gf256::lagrange_weights_at_zero(&xs);

    let mut secret = vec![0u8; len];
    for (pos, out) in secret.iter_mut().enumerate() {
        *out = used
            .iter()
            .zip(&weights)
            .fold(0u8, |acc, (s, &w)| gf256::add(acc, gf256::mul(s.value[pos], w)));
    }

    debug!(threshold, "secret reconstructed from shares");
    Ok(MasterSecret::new(secret))
}
