use crate::error::ProviderRpcError;
use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use flexigift_config::NetworkDescriptor;
use tokio::sync::broadcast;

/// A change pushed by the wallet outside of any request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The exposed accounts changed. Empty when the user revoked access or locked the wallet.
    AccountsChanged(Vec<Address>),
    /// The wallet switched to another network.
    ChainChanged(ChainId),
}

/// The surface of an injected wallet (EIP-1193) that a session needs.
#[async_trait]
pub trait WalletProvider: Send + Sync + 'static {
    /// A handle able to sign and submit transactions from the connected account.
    type Signer: Clone + Send + Sync + 'static;

    /// Asks the user for account access (`eth_requestAccounts`). May prompt.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderRpcError>;

    /// Returns the accounts already authorized for this client (`eth_accounts`). Never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderRpcError>;

    /// Returns the chain the wallet is currently on (`eth_chainId`).
    async fn chain_id(&self) -> Result<ChainId, ProviderRpcError>;

    /// Returns a signing handle for the active account and network.
    async fn signer(&self) -> Result<Self::Signer, ProviderRpcError>;

    /// Asks the wallet to switch networks (`wallet_switchEthereumChain`).
    ///
    /// Fails with [`UNRECOGNIZED_CHAIN`](crate::error::UNRECOGNIZED_CHAIN) if the wallet does not
    /// know the chain.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderRpcError>;

    /// Asks the wallet to register a network (`wallet_addEthereumChain`).
    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderRpcError>;

    /// Subscribes to account and chain change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
