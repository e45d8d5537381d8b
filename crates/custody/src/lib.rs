//! Threshold key custody and field-granular record encryption.
//!
//! Leaves first:
//!
//! - [`shares`]: Shamir splitting and Lagrange reconstruction over GF(256).
//! - [`kdf`]: binds a reconstructed secret to one record identifier.
//! - [`crypto`]: deterministic, type-preserving encryption of one value.
//! - [`record`]: applies the value cipher to every field of a record.
//! - [`custody`]: read-only holder of the share set and threshold.
//!
//! ```no_run
//! use custody::{kdf, record, CustodyManager, FieldValue, MasterSecret, Record};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = CustodyManager::provision(MasterSecret::generate(32), 10, 2)?;
//! let subset = manager.shares_at(&[3, 4])?;
//! let secret = manager.reconstruct_key(&subset)?;
//! let key = kdf::derive(&secret, "asset1");
//!
//! let asset: Record = [("Color", FieldValue::from("blue")), ("Size", FieldValue::from(5))]
//!     .into_iter()
//!     .collect();
//! let sealed = record::encrypt_record(&key, &asset)?;
//! assert_eq!(record::decrypt_record(&key, &sealed)?, asset);
//! # Ok(())
//! # }
//! ```
//!
//! All operations are synchronous, CPU-bound, and free of shared mutable state.

pub mod crypto;
pub mod custody;
pub mod kdf;
pub mod record;
pub mod secret;
pub mod shares;

pub use crypto::CipherError;
pub use custody::{global, install_global, CustodyError, CustodyManager, SecretCommitment};
pub use kdf::RecordKey;
pub use record::{EncryptedRecord, FieldMap, FieldValue, Record, RecordError};
pub use secret::MasterSecret;
pub use shares::{Share, ShareError, ShareSet};
