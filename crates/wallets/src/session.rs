//! The wallet session: the single connection between the client and the user's wallet.

use crate::{
    error::SessionError,
    provider::{ProviderEvent, WalletProvider},
};
use alloy_primitives::{Address, ChainId};
use flexigift_config::NetworkDescriptor;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 16;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// A point-in-time view of a [`WalletSession`].
#[derive(Clone, Debug)]
pub struct SessionState<S> {
    pub address: Option<Address>,
    pub chain_id: Option<ChainId>,
    pub signer: Option<S>,
    pub status: ConnectionStatus,
    /// The message of the last failed connection attempt.
    pub error: Option<String>,
}

impl<S> Default for SessionState<S> {
    fn default() -> Self {
        Self {
            address: None,
            chain_id: None,
            signer: None,
            status: ConnectionStatus::Disconnected,
            error: None,
        }
    }
}

impl<S> SessionState<S> {
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.status == ConnectionStatus::Connecting
    }
}

/// Notifications published by a session to its subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { address: Address, chain_id: ChainId },
    AccountChanged(Address),
    Disconnected,
    /// The wallet moved to another chain. Every handle bound to the old chain is stale and the
    /// session has been cleared; the caller must rebuild its context.
    ReloadRequired(ChainId),
}

/// Mediates between the client and a [`WalletProvider`].
///
/// There is one session per client; share it behind an [`Arc`]. State changes are published as
/// [`SessionEvent`]s to everyone who [subscribed](Self::subscribe).
pub struct WalletSession<W: WalletProvider> {
    provider: Option<Arc<W>>,
    target: NetworkDescriptor,
    install_url: String,
    state: Mutex<SessionState<W::Signer>>,
    events: broadcast::Sender<SessionEvent>,
}

impl<W: WalletProvider> WalletSession<W> {
    /// Creates a disconnected session.
    ///
    /// `target` is the network the session negotiates the wallet onto, `install_url` is where
    /// users without a wallet are sent.
    pub fn new(provider: Option<W>, target: NetworkDescriptor, install_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            provider: provider.map(Arc::new),
            target,
            install_url: install_url.into(),
            state: Mutex::new(SessionState::default()),
            events,
        }
    }

    /// Returns `true` if a wallet provider is available.
    pub fn is_provider_installed(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider(&self) -> Option<&Arc<W>> {
        self.provider.as_ref()
    }

    /// The network this session negotiates the wallet onto.
    pub fn target(&self) -> &NetworkDescriptor {
        &self.target
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState<W::Signer> {
        self.state.lock().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().is_connected()
    }

    pub fn address(&self) -> Option<Address> {
        self.state.lock().address
    }

    /// Returns the signing handle, if connected.
    pub fn signer(&self) -> Option<W::Signer> {
        let state = self.state.lock();
        state.is_connected().then(|| state.signer.clone()).flatten()
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Connects to the wallet, prompting the user for account access.
    ///
    /// Switches the wallet to the target network, registering it first if the wallet does not
    /// know it. On failure the error is also recorded in the session state and any previous
    /// connection is left untouched.
    pub async fn connect(&self) -> Result<Address, SessionError> {
        let Some(provider) = self.provider.clone() else {
            let err = SessionError::ProviderMissing { install_url: self.install_url.clone() };
            warn!("{err}");
            self.state.lock().error = Some(err.to_string());
            return Err(err);
        };

        {
            let mut state = self.state.lock();
            if state.is_connecting() {
                return Err(SessionError::ConnectInProgress);
            }
            state.status = ConnectionStatus::Connecting;
            state.error = None;
        }

        match self.negotiate(&provider).await {
            Ok((address, chain_id, signer)) => {
                {
                    let mut state = self.state.lock();
                    *state = SessionState {
                        address: Some(address),
                        chain_id: Some(chain_id),
                        signer: Some(signer),
                        status: ConnectionStatus::Connected,
                        error: None,
                    };
                }
                debug!(%address, chain_id, "wallet connected");
                let _ = self.events.send(SessionEvent::Connected { address, chain_id });
                Ok(address)
            }
            Err(err) => {
                error!(%err, "failed to connect wallet");
                let mut state = self.state.lock();
                state.status = if state.signer.is_some() {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Disconnected
                };
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn negotiate(&self, provider: &W) -> Result<(Address, ChainId, W::Signer), SessionError> {
        let accounts = provider.request_accounts().await?;
        let address = *accounts
            .first()
            .ok_or_else(|| SessionError::Connection("wallet did not expose any account".into()))?;

        let mut chain_id = provider.chain_id().await?;
        if chain_id != self.target.chain_id {
            self.switch_network(provider, chain_id).await?;
            chain_id = provider.chain_id().await?;
        }

        let signer = provider.signer().await?;
        Ok((address, chain_id, signer))
    }

    async fn switch_network(&self, provider: &W, current: ChainId) -> Result<(), SessionError> {
        let target = self.target.chain_id;
        debug!(current, target, "switching wallet network");
        match provider.switch_chain(target).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_unrecognized_chain() => {
                debug!(target, "wallet does not know the target network, adding it");
                provider.add_chain(&self.target).await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Populates the session from accounts the wallet has already authorized, without
    /// prompting. Returns the restored address, if any.
    pub async fn restore(&self) -> Option<Address> {
        let provider = self.provider.clone()?;
        let restored = async {
            let Some(&address) = provider.accounts().await?.first() else {
                return Ok(None);
            };
            let chain_id = provider.chain_id().await?;
            let signer = provider.signer().await?;
            Ok::<_, SessionError>(Some((address, chain_id, signer)))
        };

        match restored.await {
            Ok(Some((address, chain_id, signer))) => {
                {
                    let mut state = self.state.lock();
                    if state.is_connecting() {
                        trace!("connection in progress, skipping restore");
                        return None;
                    }
                    *state = SessionState {
                        address: Some(address),
                        chain_id: Some(chain_id),
                        signer: Some(signer),
                        status: ConnectionStatus::Connected,
                        error: None,
                    };
                }
                debug!(%address, chain_id, "restored wallet session");
                let _ = self.events.send(SessionEvent::Connected { address, chain_id });
                Some(address)
            }
            Ok(None) => None,
            Err(err) => {
                error!(%err, "failed to check wallet connection");
                None
            }
        }
    }

    /// Clears the session. Never calls into the wallet: most wallets cannot be disconnected
    /// programmatically.
    pub fn disconnect(&self) {
        let was_connected = {
            let mut state = self.state.lock();
            let was_connected = state.is_connected();
            *state = SessionState::default();
            was_connected
        };
        if was_connected {
            let _ = self.events.send(SessionEvent::Disconnected);
        }
    }

    /// Applies a wallet notification to the session.
    pub fn handle_event(&self, event: ProviderEvent) {
        trace!(?event, "wallet notification");
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => self.disconnect(),
                Some(&address) => {
                    {
                        let mut state = self.state.lock();
                        if !state.is_connected() || state.address == Some(address) {
                            return;
                        }
                        state.address = Some(address);
                    }
                    let _ = self.events.send(SessionEvent::AccountChanged(address));
                }
            },
            ProviderEvent::ChainChanged(chain_id) => {
                {
                    let mut state = self.state.lock();
                    if !state.is_connected() || state.chain_id == Some(chain_id) {
                        return;
                    }
                    *state = SessionState::default();
                }
                warn!(chain_id, "wallet switched networks, session must be rebuilt");
                let _ = self.events.send(SessionEvent::ReloadRequired(chain_id));
            }
        }
    }

    /// Starts applying wallet notifications to this session in the background.
    ///
    /// Returns `None` if there is no wallet. Dropping the returned listener unregisters it.
    pub fn listen(self: &Arc<Self>) -> Option<SessionListener> {
        let mut events = self.provider.as_ref()?.subscribe();
        let session: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(session) = session.upgrade() else { break };
                        session.handle_event(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "missed wallet notifications");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Some(SessionListener { handle })
    }
}

/// Keeps wallet notifications flowing into a session; unregisters on drop.
#[derive(Debug)]
pub struct SessionListener {
    handle: JoinHandle<()>,
}

impl Drop for SessionListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
