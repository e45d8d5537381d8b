//! Asset types exchanged between the ledger contract and its callers.
//!
//! Plaintext assets are serialised with the field names of the original asset
//! transfer contract (`ID`, `Color`, `Size`, `Owner`, `AppraisedValue`,
//! `docType`). What reaches the world state is the encrypted form of that
//! object: the same names mapped to ciphertext strings.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// A plaintext asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Size")]
    pub size: i64,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "AppraisedValue")]
    pub appraised_value: i64,
    /// Record kind marker; `"asset"` for seeded assets.
    #[serde(rename = "docType", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

impl Asset {
    /// Construct an [`Asset`] without a `docType`.
    pub fn new(
        id: impl Into<String>,
        color: impl Into<String>,
        size: i64,
        owner: impl Into<String>,
        appraised_value: i64,
    ) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            size,
            owner: owner.into(),
            appraised_value,
            doc_type: None,
        }
    }
}

/// One world-state entry returned by a range scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    /// World-state key (the asset ID).
    #[serde(rename = "Key")]
    pub key: String,
    /// The stored record: ciphertext or decrypted, depending on the query.
    #[serde(rename = "Record")]
    pub record: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error body reported for a failed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn asset_uses_contract_field_names() {
        let asset = Asset::new("asset1", "blue", 5, "Tomoko", 300);
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(
            value,
            json!({"ID": "asset1", "Color": "blue", "Size": 5, "Owner": "Tomoko", "AppraisedValue": 300})
        );
    }

    #[test]
    fn asset_keeps_field_order() {
        let asset = Asset::new("asset1", "blue", 5, "Tomoko", 300);
        let json = serde_json::to_string(&asset).unwrap();
        assert!(json.starts_with(r#"{"ID":"asset1","Color":"blue""#));
    }

    #[test]
    fn doc_type_round_trip() {
        let mut asset = Asset::new("asset2", "red", 5, "Brad", 400);
        asset.doc_type = Some("asset".into());
        let json = serde_json::to_string(&asset).unwrap();
        let decoded: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, asset);
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&crate::ServiceError::Conflict("asset1 exists".into()));
        assert_eq!(e.code, "conflict");
        assert!(e.message.contains("asset1 exists"));
    }
}
