//! Encoding of proposed transactions into timelock batch documents.
//!
//! A [`TxBatcher`] accumulates [`ProposedTransaction`]s along with the batch
//! metadata and encodes them into a [`BatchDocument`] in one of two variants,
//! queue or execute. Every proposed call is wrapped as a call to the timelock
//! taking `(target, value, signature, data, eta)`.
//!
//! Documents carry a checksum over their canonical serialization, see
//! [`configurator_hash`].

#![deny(missing_docs)]
#![deny(unsafe_code)]

use configurator_types::{address, Address, ProposedTransaction};

#[doc(inline)]
pub use document::{
    AbiInput, BatchDocument, BatchMeta, BatchTransaction, ContractInputsValues, ContractMethod,
    FORMAT_VERSION,
};
#[doc(inline)]
pub use error::BatchError;

mod document;
mod error;

/// The timelock every batched call is routed through.
pub const DEFAULT_TIMELOCK: Address = address!("a133c9a92fb8dda4f6a0ed4c5ec0ea0a48b6ce5e");

/// Transaction builder version written into document metadata.
pub const DEFAULT_TX_BUILDER_VERSION: &str = "1.16.3";

/// Configuration options passed to [`TxBatcher::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatcherConfig {
    /// The timelock every call is wrapped for.
    pub timelock: Address,
    /// Transaction builder version written into document metadata.
    pub tx_builder_version: String,
    /// Whether to accept transactions whose validation produced errors.
    ///
    /// Forced transactions are logged as warnings.
    pub force: bool,
}

/// The batch variant to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatchAction {
    /// Queue calls in the timelock.
    Queue,
    /// Execute previously queued calls.
    Execute,
}

/// Accumulates proposed transactions and batch metadata.
#[derive(Clone, Debug)]
pub struct TxBatcher {
    config: BatcherConfig,
    chain_id: Option<u64>,
    safe_address: Option<Address>,
    description: Option<String>,
    eta: Option<u64>,
    transactions: Vec<ProposedTransaction>,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            timelock: DEFAULT_TIMELOCK,
            tx_builder_version: DEFAULT_TX_BUILDER_VERSION.to_string(),
            force: false,
        }
    }
}

impl BatchAction {
    /// The timelock method called by this action.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Queue => "queueTransaction",
            Self::Execute => "executeTransaction",
        }
    }

    /// The document name for this action.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Queue => "queue.json",
            Self::Execute => "execute.json",
        }
    }
}

impl TxBatcher {
    /// An empty batcher.
    pub fn new(config: BatcherConfig) -> Self {
        Self {
            config,
            chain_id: None,
            safe_address: None,
            description: None,
            eta: None,
            transactions: Vec::new(),
        }
    }

    /// The batcher's configuration.
    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }

    /// Set the chain the batch is executed on.
    pub fn set_chain_id(&mut self, chain_id: u64) -> &mut Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the multisig the batch is proposed from.
    pub fn set_safe_address(&mut self, safe_address: Address) -> &mut Self {
        self.safe_address = Some(safe_address);
        self
    }

    /// Set the batch description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Set the timestamp after which queued calls may be executed.
    pub fn set_eta(&mut self, eta: u64) -> &mut Self {
        self.eta = Some(eta);
        self
    }

    /// Transactions added so far, in order.
    pub fn transactions(&self) -> &[ProposedTransaction] {
        &self.transactions
    }

    /// Append a proposed transaction.
    ///
    /// A transaction whose validation produced errors is rejected unless the
    /// batcher is configured with `force`.
    pub fn add_transaction(&mut self, tx: ProposedTransaction) -> Result<(), BatchError> {
        if !tx.validation.errors.is_empty() {
            if !self.config.force {
                return Err(BatchError::Rejected {
                    signature: tx.signature,
                    errors: tx.validation.errors,
                });
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(
                signature = %tx.signature,
                errors = ?tx.validation.errors,
                "forcing transaction with validation errors"
            );
        }
        self.transactions.push(tx);
        Ok(())
    }

    /// Encode the batch, stamped with the current time.
    pub fn encode(&self, action: BatchAction) -> Result<BatchDocument, BatchError> {
        self.encode_at(action, chrono::Utc::now().timestamp_millis())
    }

    /// Encode the batch with the given creation time in epoch milliseconds.
    ///
    /// The output depends only on the batcher's state, `action` and
    /// `created_at`. The checksum depends on neither the action's file name
    /// nor itself.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn encode_at(
        &self,
        action: BatchAction,
        created_at: i64,
    ) -> Result<BatchDocument, BatchError> {
        let chain_id = self.chain_id.ok_or(BatchError::MissingChainId)?;
        let description = self
            .description
            .clone()
            .ok_or(BatchError::MissingDescription)?;
        let eta = self.eta.ok_or(BatchError::MissingEta)?;
        if self.transactions.is_empty() {
            return Err(BatchError::NoTransactions);
        }

        let transactions = self
            .transactions
            .iter()
            .enumerate()
            .map(|(ix, tx)| self.wrap(ix, tx, action, eta))
            .collect::<Result<Vec<_>, _>>()?;

        let document = BatchDocument {
            version: FORMAT_VERSION.to_string(),
            chain_id: chain_id.to_string(),
            created_at,
            meta: BatchMeta {
                name: Some(action.file_name().to_string()),
                description,
                tx_builder_version: self.config.tx_builder_version.clone(),
                created_from_safe_address: self
                    .safe_address
                    .map(|a| a.to_checksum(None))
                    .unwrap_or_default(),
                created_from_owner_address: String::new(),
                checksum: None,
            },
            transactions,
        }
        .with_checksum()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            transactions = document.transactions.len(),
            checksum = ?document.meta.checksum,
            "encoded batch"
        );

        Ok(document)
    }

    /// Wrap the transaction at `ix` as a timelock call.
    fn wrap(
        &self,
        ix: usize,
        tx: &ProposedTransaction,
        action: BatchAction,
        eta: u64,
    ) -> Result<BatchTransaction, BatchError> {
        let data = tx.stripped_data().ok_or(BatchError::CallDataTooShort(ix))?;
        Ok(BatchTransaction {
            to: self.config.timelock.to_checksum(None),
            value: "0".to_string(),
            contract_method: ContractMethod::timelock(action.method()),
            contract_inputs_values: ContractInputsValues {
                target: tx.target.to_checksum(None),
                value: "0".to_string(),
                signature: tx.signature.clone(),
                data: format!("0x{}", hex::encode(data)),
                eta: eta.to_string(),
            },
        })
    }
}
