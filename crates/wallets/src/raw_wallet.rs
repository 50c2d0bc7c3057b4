use crate::utils::create_private_key_signer;
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use eyre::Result;
use serde::Serialize;

/// Options for the key the local wallet signs with.
///
/// The key can either be:
/// 1. passed in cleartext (or through `FLEXIGIFT_PRIVATE_KEY`)
/// 2. entered interactively via a secure prompt
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Wallet options", about = None, long_about = None)]
pub struct WalletOpts {
    /// Open an interactive prompt to enter your private key.
    #[arg(long, short)]
    pub interactive: bool,

    /// Use the provided private key.
    #[arg(long, value_name = "RAW_PRIVATE_KEY", env = "FLEXIGIFT_PRIVATE_KEY")]
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl WalletOpts {
    /// Returns the configured signer, or `None` if no key was provided.
    pub fn signer(&self) -> Result<Option<PrivateKeySigner>> {
        if self.interactive {
            let private_key = rpassword::prompt_password("Enter private key: ")?;
            return create_private_key_signer(&private_key).map(Some);
        }
        self.private_key.as_deref().map(create_private_key_signer).transpose()
    }
}
