//! Configuration errors

use figment::providers::{Format, Toml};
use std::{collections::HashSet, fmt};

/// The message shown when the config could not be extracted from the figment
pub const FAILED_TO_EXTRACT_CONFIG_MSG: &str = "failed to extract flexigift config:";

/// Represents a failed attempt to extract [`Config`](crate::Config) from a `Figment`
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    /// error thrown when extracting the `Config`
    pub(crate) error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut unique = HashSet::with_capacity(self.error.count());
        writeln!(f, "{FAILED_TO_EXTRACT_CONFIG_MSG}")?;
        for err in self.error.clone() {
            let from_toml = err
                .metadata
                .as_ref()
                .map(|meta| meta.name.contains(Toml::NAME))
                .unwrap_or_default();
            let err = if from_toml { format!("toml: {err}") } else { err.to_string() };
            if unique.insert(err.clone()) {
                writeln!(f, "{err}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

/// Errors raised while resolving values out of a loaded config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Extract(#[from] ExtractConfigError),
    #[error("network `{0}` has no RPC endpoint configured")]
    MissingRpcUrl(String),
    #[error("invalid RPC endpoint `{url}`: {source}")]
    InvalidRpcUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid chain id `{0}`: expected a 0x-prefixed hex or decimal quantity")]
    InvalidChainId(String),
}
