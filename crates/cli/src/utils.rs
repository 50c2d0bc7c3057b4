use alloy_provider::DynProvider;
use chrono::{DateTime, NaiveDateTime, Utc};
use eyre::{Result, WrapErr};
use flexigift_config::Config;
use flexigift_ledger::{AlloyLedger, LedgerClient};
use flexigift_wallets::{LocalWalletProvider, WalletOpts, WalletSession};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// The wallet session the CLI drives.
pub type Session = WalletSession<LocalWalletProvider>;

/// The ledger client signing through the session's provider.
pub type Client = LedgerClient<AlloyLedger<DynProvider>>;

/// Initializes a tracing Subscriber for logging
pub fn subscriber() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads a `.env` file from the current directory, if there is one.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        warn!(%err, "failed to load .env file");
    }
}

/// Builds a disconnected session for the configured network.
///
/// Without a private key there is no wallet, and connecting fails with the install hint.
pub fn session(config: &Config, wallet: &WalletOpts) -> Result<Arc<Session>> {
    let target = config.network();
    let provider = wallet.signer()?.map(|signer| LocalWalletProvider::new(signer, target.clone()));
    Ok(Arc::new(WalletSession::new(provider, target, config.wallet_install_url.clone())))
}

/// Returns a ledger client bound to the session's signer, if connected.
pub fn ledger_client(session: &Session, config: &Config) -> Client {
    let merchants = config.merchants.len();
    match session.signer() {
        Some(provider) => {
            LedgerClient::new(AlloyLedger::from_contracts(provider, &config.contracts), merchants)
        }
        None => LedgerClient::disconnected(merchants),
    }
}

/// Current unix time, in seconds.
pub fn now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// Formats a unix timestamp as a UTC date.
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Parses a point in time given as unix seconds, an RFC 3339 date or `YYYY-MM-DDTHH:MM` (UTC).
pub fn parse_timestamp(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    let date = DateTime::parse_from_rfc3339(s)
        .map(|date| date.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").map(|date| date.and_utc()))
        .wrap_err_with(|| format!("invalid date `{s}`"))?;
    u64::try_from(date.timestamp()).wrap_err_with(|| format!("date `{s}` is before 1970"))
}
