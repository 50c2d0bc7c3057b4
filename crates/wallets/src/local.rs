use crate::{
    error::{ProviderRpcError, UNAUTHORIZED},
    provider::{ProviderEvent, WalletProvider},
};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, ChainId};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use flexigift_config::NetworkDescriptor;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

struct LocalState {
    networks: BTreeMap<ChainId, NetworkDescriptor>,
    active: ChainId,
    authorized: bool,
}

/// A wallet backed by a private key held in memory.
///
/// Behaves like an injected browser wallet: accounts are only exposed after
/// [`request_accounts`](WalletProvider::request_accounts), networks must be known before the
/// wallet can switch to them, and changes are announced to subscribers.
pub struct LocalWalletProvider {
    signer: PrivateKeySigner,
    state: Mutex<LocalState>,
    events: broadcast::Sender<ProviderEvent>,
}

impl LocalWalletProvider {
    /// Creates a wallet for `signer`, currently on `network`.
    pub fn new(signer: PrivateKeySigner, network: NetworkDescriptor) -> Self {
        let active = network.chain_id;
        Self {
            signer,
            state: Mutex::new(LocalState {
                networks: BTreeMap::from([(active, network)]),
                active,
                authorized: false,
            }),
            events: broadcast::channel(16).0,
        }
    }

    /// Registers another network the wallet can switch to.
    pub fn with_network(self, network: NetworkDescriptor) -> Self {
        self.state.lock().networks.insert(network.chain_id, network);
        self
    }

    /// The account this wallet signs for.
    pub fn address(&self) -> Address {
        alloy_signer::Signer::address(&self.signer)
    }

    /// The network the wallet is currently on.
    pub fn active_network(&self) -> NetworkDescriptor {
        let state = self.state.lock();
        state.networks[&state.active].clone()
    }

    /// Revokes the client's access to the account, as locking the wallet would.
    pub fn revoke(&self) {
        let was_authorized = std::mem::replace(&mut self.state.lock().authorized, false);
        if was_authorized {
            let _ = self.events.send(ProviderEvent::AccountsChanged(vec![]));
        }
    }

    fn activate(&self, chain_id: ChainId) -> Result<(), ProviderRpcError> {
        let changed = {
            let mut state = self.state.lock();
            if !state.networks.contains_key(&chain_id) {
                return Err(ProviderRpcError::unrecognized_chain(chain_id));
            }
            std::mem::replace(&mut state.active, chain_id) != chain_id
        };
        if changed {
            debug!(chain_id, "local wallet switched network");
            let _ = self.events.send(ProviderEvent::ChainChanged(chain_id));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    type Signer = DynProvider;

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderRpcError> {
        let address = self.address();
        let newly_authorized = !std::mem::replace(&mut self.state.lock().authorized, true);
        if newly_authorized {
            let _ = self.events.send(ProviderEvent::AccountsChanged(vec![address]));
        }
        Ok(vec![address])
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderRpcError> {
        let authorized = self.state.lock().authorized;
        Ok(if authorized { vec![self.address()] } else { vec![] })
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderRpcError> {
        Ok(self.state.lock().active)
    }

    async fn signer(&self) -> Result<DynProvider, ProviderRpcError> {
        if !self.state.lock().authorized {
            return Err(ProviderRpcError::new(
                UNAUTHORIZED,
                "The requested account has not been authorized by the user.",
            ));
        }
        let network = self.active_network();
        let url = network.rpc_url().map_err(ProviderRpcError::internal)?;
        trace!(%url, chain = %network.chain_name, "building signing provider");
        let wallet = EthereumWallet::from(self.signer.clone());
        Ok(ProviderBuilder::new().wallet(wallet).connect_http(url).erased())
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderRpcError> {
        self.activate(chain_id)
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderRpcError> {
        if network.rpc_urls.is_empty() {
            return Err(ProviderRpcError::internal("rpcUrls must contain at least one endpoint"));
        }
        let chain_id = network.chain_id;
        self.state.lock().networks.insert(chain_id, network.clone());
        self.activate(chain_id)
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
