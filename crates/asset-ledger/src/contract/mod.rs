//! Asset record lifecycle over an encrypted world state.
//!
//! # Per-call key handling
//!
//! 1. The configured share indices are fetched from the [`CustodyManager`].
//! 2. The master secret is reconstructed from them and a [`RecordKey`] derived
//!    for the asset id.
//! 3. Each field value is sealed (or opened) under that key.
//! 4. Secret and key are dropped, and so zeroised, before the call returns.
//!
//! Nothing derived from the master secret outlives a single operation.
//!
//! # Security invariants
//!
//! - Only ciphertext records are written to the [`WorldState`].
//! - Field values and key material are never logged; asset ids are.

pub mod seed;

use std::sync::Arc;

use bytes::Bytes;
use common::error::ServiceError;
use common::protocol::{Asset, AssetEntry};
use custody::record::{decrypt_record, encrypt_record};
use custody::{kdf, CustodyError, CustodyManager, EncryptedRecord, Record, RecordError, RecordKey};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::store::{StoreError, WorldState};

/// Errors produced by [`AssetContract`] operations.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("the asset {0} already exists")]
    AssetExists(String),

    #[error("the asset {0} does not exist")]
    AssetNotFound(String),

    /// The record key could not be reconstructed.
    #[error("record key unavailable: {0}")]
    Custody(#[from] CustodyError),

    #[error(transparent)]
    Record(#[from] RecordError),

    /// A stored or supplied record is not the expected JSON shape.
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ContractError> for ServiceError {
    fn from(err: ContractError) -> Self {
        let message = err.to_string();
        match err {
            ContractError::AssetExists(_) => ServiceError::Conflict(message),
            ContractError::AssetNotFound(_) => ServiceError::NotFound(message),
            ContractError::Custody(_) | ContractError::Store(_) => ServiceError::Unavailable(message),
            ContractError::Record(RecordError::NotAnObject) | ContractError::Malformed(_) => {
                ServiceError::BadRequest(message)
            }
            ContractError::Record(_) => ServiceError::EncryptionFailure(message),
        }
    }
}

/// The asset contract: CRUD and transfer over encrypted records.
pub struct AssetContract<S> {
    state: S,
    custody: Arc<CustodyManager>,
    selection: Vec<u8>,
}

impl<S: WorldState> AssetContract<S> {
    /// `selection` names the share indices combined on every call.
    pub fn new(state: S, custody: Arc<CustodyManager>, selection: Vec<u8>) -> Self {
        Self {
            state,
            custody,
            selection,
        }
    }

    /// Write the sample assets, replacing any with the same ids.
    pub async fn init_ledger(&self) -> Result<(), ContractError> {
        for asset in seed::sample_assets() {
            self.put_asset(&asset).await?;
            info!(asset_id = %asset.id, "asset initialised");
        }
        Ok(())
    }

    /// Store a new asset.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::AssetExists`] when the id is taken.
    pub async fn create_asset(&self, asset: Asset) -> Result<Asset, ContractError> {
        if self.asset_exists(&asset.id).await? {
            return Err(ContractError::AssetExists(asset.id));
        }
        self.put_asset(&asset).await?;
        Ok(asset)
    }

    /// Read and decrypt an asset.
    pub async fn read_asset(&self, id: &str) -> Result<Asset, ContractError> {
        let stored = self.load(id).await?;
        let record = self.open(id, &stored)?;
        Ok(serde_json::from_value(record.into_json_object())?)
    }

    /// Read an asset as stored: field names mapped to ciphertext.
    pub async fn read_asset_raw(&self, id: &str) -> Result<EncryptedRecord, ContractError> {
        let stored = self.load(id).await?;
        Ok(serde_json::from_slice(&stored)?)
    }

    /// Overwrite an existing asset.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::AssetNotFound`] when there is nothing to replace.
    pub async fn update_asset(&self, asset: Asset) -> Result<(), ContractError> {
        if !self.asset_exists(&asset.id).await? {
            return Err(ContractError::AssetNotFound(asset.id));
        }
        self.put_asset(&asset).await
    }

    pub async fn delete_asset(&self, id: &str) -> Result<(), ContractError> {
        if !self.asset_exists(id).await? {
            return Err(ContractError::AssetNotFound(id.to_owned()));
        }
        self.state.delete_state(id).await?;
        debug!(asset_id = %id, "asset deleted");
        Ok(())
    }

    pub async fn asset_exists(&self, id: &str) -> Result<bool, ContractError> {
        Ok(self
            .state
            .get_state(id)
            .await?
            .is_some_and(|bytes| !bytes.is_empty()))
    }

    /// Change an asset's owner. Returns the previous owner.
    pub async fn transfer_asset(&self, id: &str, new_owner: &str) -> Result<String, ContractError> {
        let mut asset = self.read_asset(id).await?;
        let previous = std::mem::replace(&mut asset.owner, new_owner.to_owned());
        self.put_asset(&asset).await?;
        info!(asset_id = %id, "asset transferred");
        Ok(previous)
    }

    /// Every stored record as it sits in the world state.
    ///
    /// Values that are not JSON are returned as strings.
    pub async fn get_all_assets(&self) -> Result<Vec<AssetEntry>, ContractError> {
        let entries = self.state.get_state_by_range("", "").await?;
        Ok(entries
            .into_iter()
            .map(|(key, bytes)| {
                let record = serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
                AssetEntry { key, record }
            })
            .collect())
    }

    /// Every stored record, decrypted under its own key.
    ///
    /// # Errors
    ///
    /// Fails on the first record that does not decrypt; no partial listing is
    /// returned.
    pub async fn get_all_assets_decrypted(&self) -> Result<Vec<AssetEntry>, ContractError> {
        let entries = self.state.get_state_by_range("", "").await?;
        let mut out = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            let record = self.open(&key, &bytes).inspect_err(|e| {
                warn!(asset_id = %key, error = %e, "stored record failed to decrypt");
            })?;
            out.push(AssetEntry {
                key,
                record: record.into_json_object(),
            });
        }
        Ok(out)
    }

    async fn load(&self, id: &str) -> Result<Bytes, ContractError> {
        match self.state.get_state(id).await? {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(ContractError::AssetNotFound(id.to_owned())),
        }
    }

    async fn put_asset(&self, asset: &Asset) -> Result<(), ContractError> {
        let sealed = self.seal(asset)?;
        self.state.put_state(&asset.id, sealed).await?;
        Ok(())
    }

    fn record_key(&self, id: &str) -> Result<RecordKey, ContractError> {
        let subset = self.custody.shares_at(&self.selection)?;
        let secret = self.custody.reconstruct_key(&subset)?;
        Ok(kdf::derive(&secret, id))
    }

    fn seal(&self, asset: &Asset) -> Result<Bytes, ContractError> {
        let record = Record::from_json_object(serde_json::to_value(asset)?)?;
        let key = self.record_key(&asset.id)?;
        let sealed = encrypt_record(&key, &record)?;
        Ok(Bytes::from(serde_json::to_vec(&sealed)?))
    }

    fn open(&self, id: &str, stored: &[u8]) -> Result<Record, ContractError> {
        let sealed: EncryptedRecord = serde_json::from_slice(stored)?;
        let key = self.record_key(id)?;
        Ok(decrypt_record(&key, &sealed)?)
    }
}
