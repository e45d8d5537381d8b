//! Common types, protocol definitions, and errors shared across asset-ledger crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
