//! Subcommands of the `flexigift` binary.

use crate::{
    opts::WalletArgs,
    route::Route,
    utils::{self, Client, Session},
};
use alloy_primitives::{Address, TxHash, U256};
use eyre::{Result, bail};
use flexigift_config::Config;
use flexigift_ledger::{GiftCardRecord, links};
use flexigift_wallets::SessionListener;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

pub mod card;
pub mod connect;
pub mod create;
pub mod info;

/// A connected wallet session and the ledger client signing through it.
pub struct Context {
    pub config: Config,
    pub session: Arc<Session>,
    pub client: Client,
    _listener: Option<SessionListener>,
}

impl Context {
    /// Loads the config and connects the wallet, switching it to the target network.
    pub async fn connect(args: &WalletArgs) -> Result<Self> {
        let config = args.rpc.load_config()?;
        let session = utils::session(&config, &args.wallet)?;
        let listener = session.listen();
        session.connect().await?;
        let client = utils::ledger_client(&session, &config);
        Ok(Self { config, session, client, _listener: listener })
    }

    /// The connected account.
    pub fn address(&self) -> Option<Address> {
        self.session.address()
    }

    pub fn tx_url(&self, hash: &TxHash) -> String {
        links::explorer_tx_url(self.config.explorer_url(), hash)
    }

    /// Fetches a card again after it changed.
    pub async fn refetch(&self, id: U256) -> Result<GiftCardRecord> {
        Ok(self.client.get_gift_card(id).await?)
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses a gift card id given as a number, a `/redeem/{id}` path or a full share link.
pub fn parse_card_id(s: &str) -> Result<U256> {
    if let Ok(id) = U256::from_str_radix(s, 10) {
        return Ok(id);
    }
    let route = match Url::parse(s) {
        Ok(url) => Route::parse(url.path())?,
        Err(_) => Route::parse(s)?,
    };
    match route {
        Route::Redeem(id) => Ok(id),
        route => bail!("`{route}` does not point to a gift card"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_ids() {
        assert_eq!(parse_card_id("42").unwrap(), U256::from(42));
        assert_eq!(parse_card_id("/redeem/42").unwrap(), U256::from(42));
        assert_eq!(parse_card_id("https://flexigift.app/redeem/42?from=mail").unwrap(), U256::from(42));
        assert!(parse_card_id("/create").is_err());
        assert!(parse_card_id("https://flexigift.app/").is_err());
        assert!(parse_card_id("forty-two").is_err());
    }
}
