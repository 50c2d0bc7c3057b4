//! # flexigift-wallets
//!
//! Wallet session management: connecting to a wallet, negotiating the target network and
//! following the wallet's account and chain changes.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::{ProviderRpcError, SessionError};

mod local;
pub use local::LocalWalletProvider;

mod provider;
pub use provider::{ProviderEvent, WalletProvider};

mod raw_wallet;
pub use raw_wallet::WalletOpts;

mod session;
pub use session::{ConnectionStatus, SessionEvent, SessionListener, SessionState, WalletSession};

pub mod utils;
