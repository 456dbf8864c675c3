//! The batch document exchanged with multisig transaction builders.
//!
//! Field names and nesting follow the transaction builder's JSON schema
//! exactly. Any deviation changes the checksum.

use crate::BatchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version of the batch document.
pub const FORMAT_VERSION: &str = "1.0";

/// A checksummed batch of timelock calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDocument {
    /// Always [`FORMAT_VERSION`].
    pub version: String,
    /// Decimal chain id.
    pub chain_id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Document metadata, including the checksum.
    pub meta: BatchMeta,
    /// Wrapped calls in the order they were added.
    pub transactions: Vec<BatchTransaction>,
}

/// [`BatchDocument`] metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
    /// File name derived from the batch action.
    ///
    /// Nulled while hashing, so the checksum does not depend on it.
    pub name: Option<String>,
    /// Human-readable description of the batch.
    pub description: String,
    /// Version of the transaction builder the document targets.
    pub tx_builder_version: String,
    /// The multisig the batch is proposed from.
    pub created_from_safe_address: String,
    /// Always empty.
    pub created_from_owner_address: String,
    /// `0x`-prefixed Keccak-256 of the canonical document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// A single timelock call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTransaction {
    /// The timelock address.
    pub to: String,
    /// Always `"0"`.
    pub value: String,
    /// The timelock method being called.
    pub contract_method: ContractMethod,
    /// The timelock call's argument values.
    pub contract_inputs_values: ContractInputsValues,
}

/// ABI description of the timelock method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethod {
    /// Declared inputs, in ABI order.
    pub inputs: Vec<AbiInput>,
    /// Method name.
    pub name: String,
    /// Always `false`.
    pub payable: bool,
}

/// A single declared ABI input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiInput {
    /// Solidity type as written in the source.
    pub internal_type: String,
    /// Parameter name.
    pub name: String,
    /// ABI type.
    #[serde(rename = "type")]
    pub ty: String,
}

/// Values for the timelock method's inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInputsValues {
    /// The proposed call's target.
    pub target: String,
    /// Always `"0"`.
    pub value: String,
    /// The proposed call's method signature.
    pub signature: String,
    /// The proposed call's data without its selector, `0x`-prefixed.
    pub data: String,
    /// Decimal ETA.
    pub eta: String,
}

impl AbiInput {
    fn new(name: &str, ty: &str) -> Self {
        Self {
            internal_type: ty.to_string(),
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

impl ContractMethod {
    /// A timelock method taking `(target, value, signature, data, eta)`.
    pub fn timelock(name: &str) -> Self {
        let inputs = [
            ("target", "address"),
            ("value", "uint256"),
            ("signature", "string"),
            ("data", "bytes"),
            ("eta", "uint256"),
        ]
        .into_iter()
        .map(|(name, ty)| AbiInput::new(name, ty))
        .collect();
        Self {
            inputs,
            name: name.to_string(),
            payable: false,
        }
    }
}

impl BatchDocument {
    /// Compute the checksum of this document.
    ///
    /// The document is hashed with `meta.name` nulled and `meta.checksum`
    /// absent, so neither affects the result.
    pub fn compute_checksum(&self) -> Result<Option<String>, BatchError> {
        let mut draft = self.clone();
        draft.meta.name = None;
        draft.meta.checksum = None;
        Ok(configurator_hash::checksum_value(&draft)?)
    }

    /// A copy of this document with its checksum computed and attached.
    pub fn with_checksum(mut self) -> Result<Self, BatchError> {
        let checksum = self.compute_checksum()?;
        self.meta.checksum = checksum;
        Ok(self)
    }

    /// Check that `meta.checksum` matches the document contents.
    pub fn verify_checksum(&self) -> Result<(), BatchError> {
        let computed = self.compute_checksum()?;
        if computed != self.meta.checksum {
            return Err(BatchError::ChecksumMismatch {
                stored: self.meta.checksum.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, BatchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document previously produced by [`BatchDocument::to_json`].
    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document as pretty JSON to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), BatchError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> BatchDocument {
        BatchDocument {
            version: FORMAT_VERSION.to_string(),
            chain_id: "1".to_string(),
            created_at: 0,
            meta: BatchMeta {
                name: Some("queue.json".to_string()),
                description: "desc".to_string(),
                tx_builder_version: "1.16.3".to_string(),
                created_from_safe_address: String::new(),
                created_from_owner_address: String::new(),
                checksum: None,
            },
            transactions: vec![],
        }
    }

    #[test]
    fn schema_field_names() {
        let value = serde_json::to_value(document()).unwrap();
        let meta = &value["meta"];
        assert_eq!(value["chainId"], "1");
        assert_eq!(value["createdAt"], 0);
        assert_eq!(meta["txBuilderVersion"], "1.16.3");
        assert_eq!(meta["createdFromOwnerAddress"], "");
        assert!(meta.get("checksum").is_none());
    }

    #[test]
    fn timelock_inputs() {
        let method = ContractMethod::timelock("queueTransaction");
        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["inputs"][3]["type"], "bytes");
        assert_eq!(value["inputs"][3]["internalType"], "bytes");
        let names: Vec<_> = method.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["target", "value", "signature", "data", "eta"]);
    }

    #[test]
    fn checksum_ignores_name() {
        let doc = document().with_checksum().unwrap();
        let mut renamed = doc.clone();
        renamed.meta.name = Some("execute.json".to_string());
        assert_eq!(renamed.compute_checksum().unwrap(), doc.meta.checksum);
        renamed.verify_checksum().unwrap();
    }
}
