use eyre::EyreHandler;
use flexigift_ledger::LedgerError;
use flexigift_wallets::SessionError;
use itertools::Itertools;
use std::{error::Error, fmt};

/// Reports errors as a deduplicated chain followed by what the user can do about them.
pub struct Handler {
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    pub fn new(debug_handler: Option<Box<dyn EyreHandler>>) -> Self {
        Self { debug_handler }
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        dedup_chain(error).into_iter().format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_handler) = &self.debug_handler {
            return debug_handler.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }
        render(error, f)
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

fn render(error: &(dyn Error + 'static), f: &mut impl fmt::Write) -> fmt::Result {
    let errors = dedup_chain(error);
    let Some((error_msg, sources)) = errors.split_first() else { return Ok(()) };
    write!(f, "{error_msg}")?;

    if !sources.is_empty() {
        write!(f, "\n\nContext:")?;
        let multiple = sources.len() > 1;
        for (n, source) in sources.iter().enumerate() {
            if multiple {
                write!(f, "\n- Error #{n}: {source}")?;
            } else {
                write!(f, "\n- {source}")?;
            }
        }
    }

    for hint in hints(error) {
        write!(f, "\n\n{hint}")?;
    }
    Ok(())
}

/// What the user can act on, found anywhere in an error chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hint {
    /// USDC stays approved for the gift card contract.
    DanglingApproval(String),
    /// No wallet is available to connect to.
    InstallWallet(String),
    /// A transaction was mined but reverted.
    Reverted(String),
    /// The command needs a signer.
    NoSigner,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingApproval(tx) => write!(
                f,
                "Approval:\n- {tx} left the amount approved for the gift card contract; \
                 the next `flexigift create` overwrites it"
            ),
            Self::InstallWallet(url) => write!(f, "Wallet:\n- install one from {url}"),
            Self::Reverted(tx) => write!(f, "Transaction:\n- {tx} was mined but reverted"),
            Self::NoSigner => {
                write!(f, "Wallet:\n- pass --private-key or --interactive to sign transactions")
            }
        }
    }
}

/// Collects the hints of every FlexiGift error in the chain.
pub fn hints(error: &(dyn Error + 'static)) -> Vec<Hint> {
    std::iter::successors(Some(error), |&err| err.source())
        .filter_map(|err| {
            // boxed sources are reported as the box itself
            let ledger = err
                .downcast_ref::<LedgerError>()
                .or_else(|| err.downcast_ref::<Box<LedgerError>>().map(|err| &**err));
            if let Some(err) = ledger {
                return match err {
                    LedgerError::PartialCreate { approval_tx, .. } => {
                        Some(Hint::DanglingApproval(approval_tx.to_string()))
                    }
                    LedgerError::Reverted { tx_hash } => Some(Hint::Reverted(tx_hash.to_string())),
                    LedgerError::NotConnected => Some(Hint::NoSigner),
                    _ => None,
                };
            }
            match err.downcast_ref::<SessionError>()? {
                SessionError::ProviderMissing { install_url } => {
                    Some(Hint::InstallWallet(install_url.clone()))
                }
                _ => None,
            }
        })
        .dedup()
        .collect()
}

/// Returns the messages of an error and its sources, collapsing the `msg1: msg2; msg2` pattern
/// into `msg1: msg2`.
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes: Vec<String> = std::iter::successors(Some(error), |&err| err.source())
        .map(|cause| cause.to_string().trim().to_string())
        .collect();
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// Installs the [`eyre`] and [`panic`](mod@std::panic) hooks.
///
/// `FLEXIGIFT_DEBUG` swaps the user-facing report for color-eyre's verbose one.
pub fn install() {
    let (panic_hook, debug_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug in flexigift, please report it.")
        .into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("FLEXIGIFT_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler::new(debug.then(|| debug_hook(e))))
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}
