use alloy_primitives::hex::FromHexError;
use std::fmt;

/// EIP-1193 error code: the user rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;
/// EIP-1193 error code: the requested account or method has not been authorized.
pub const UNAUTHORIZED: i64 = 4100;
/// EIP-3326 error code: the wallet does not know the requested chain.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC internal error.
pub const INTERNAL_ERROR: i64 = -32603;

/// An error reported by a wallet provider, following the EIP-1193 `ProviderRpcError` shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_REQUEST, "User rejected the request.")
    }

    pub fn unrecognized_chain(chain_id: u64) -> Self {
        Self::new(
            UNRECOGNIZED_CHAIN,
            format!("Unrecognized chain ID {chain_id:#x}. Try adding the chain using wallet_addEthereumChain first."),
        )
    }

    pub fn internal(message: impl fmt::Display) -> Self {
        Self::new(INTERNAL_ERROR, message.to_string())
    }

    /// Returns `true` if the wallet does not know the requested chain.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN
    }
}

/// Errors surfaced by [`WalletSession`](crate::WalletSession).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No wallet provider is available. Not fatal: the user should install one.
    #[error("no wallet detected, install one from {install_url}")]
    ProviderMissing { install_url: String },
    /// Account or network negotiation failed.
    #[error("{0}")]
    Connection(String),
    #[error("a wallet connection request is already pending")]
    ConnectInProgress,
}

impl From<ProviderRpcError> for SessionError {
    fn from(err: ProviderRpcError) -> Self {
        Self::Connection(err.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("Failed to create wallet from private key. Private key is invalid hex: {0}")]
    InvalidHex(#[from] FromHexError),
    #[error(
        "Failed to create wallet from private key. Invalid private key. But env var {0} exists. Is the `$` anchor missing?"
    )]
    ExistsAsEnvVar(String),
}
