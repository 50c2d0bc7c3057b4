//! Ledger client errors.

use crate::units::AmountError;
use alloy_primitives::{TxHash, U256};

/// Largest accepted gift card message, in characters.
pub const MAX_MESSAGE_LEN: usize = 280;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("another transaction is still pending")]
    Busy,
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error("message is {0} characters long, at most {MAX_MESSAGE_LEN} are allowed")]
    MessageTooLong(usize),
    #[error("at least one merchant must be selected")]
    NoMerchants,
    #[error("unknown merchant index {index}, {count} merchants are known")]
    UnknownMerchant { index: U256, count: usize },
    #[error("USDC approval {approval_tx} succeeded but creating the gift card failed: {source}")]
    PartialCreate {
        approval_tx: TxHash,
        #[source]
        source: Box<LedgerError>,
    },
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
    #[error(transparent)]
    Contract(#[from] alloy_contract::Error),
    #[error(transparent)]
    Transport(#[from] alloy_provider::PendingTransactionError),
}

impl LedgerError {
    /// Returns the approval transaction left behind by a failed create, if any.
    pub fn dangling_approval(&self) -> Option<TxHash> {
        match self {
            Self::PartialCreate { approval_tx, .. } => Some(*approval_tx),
            _ => None,
        }
    }
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
