//! Network descriptors in the shape wallets expect for `wallet_addEthereumChain`.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use url::Url;

/// Chain id of Arbitrum Sepolia.
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421_614;

/// The native currency of a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    /// Ether, as used by every Ethereum rollup.
    pub fn ether() -> Self {
        Self { name: "Ethereum".to_string(), symbol: "ETH".to_string(), decimals: 18 }
    }
}

/// Everything a wallet needs to register and switch to a network.
///
/// Keys are snake_case so the `[network]` table and `FLEXIGIFT_NETWORK__*` variables merge
/// over the defaults. The chain id is accepted as a number or a hex/decimal string. Use
/// [`add_chain_parameter`](Self::add_chain_parameter) for the shape wallets expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    #[serde(deserialize_with = "hex_quantity::deserialize")]
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// The EIP-3085 `AddEthereumChainParameter` object, as passed to `wallet_addEthereumChain`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter<'a> {
    #[serde(serialize_with = "hex_quantity::serialize")]
    pub chain_id: u64,
    pub chain_name: &'a str,
    pub native_currency: &'a NativeCurrency,
    pub rpc_urls: &'a [String],
    pub block_explorer_urls: &'a [String],
}

impl NetworkDescriptor {
    /// Arbitrum Sepolia testnet.
    pub fn arbitrum_sepolia() -> Self {
        Self {
            chain_id: ARBITRUM_SEPOLIA_CHAIN_ID,
            chain_name: "Arbitrum Sepolia".to_string(),
            native_currency: NativeCurrency::ether(),
            rpc_urls: vec!["https://sepolia-rollup.arbitrum.io/rpc".to_string()],
            block_explorer_urls: vec!["https://sepolia.arbiscan.io/".to_string()],
        }
    }

    /// Returns the chain id as the hex string wallets use, e.g. `0x66eee`.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Returns the descriptor in the `wallet_addEthereumChain` shape, chain id as a hex quantity.
    pub fn add_chain_parameter(&self) -> AddEthereumChainParameter<'_> {
        AddEthereumChainParameter {
            chain_id: self.chain_id,
            chain_name: &self.chain_name,
            native_currency: &self.native_currency,
            rpc_urls: &self.rpc_urls,
            block_explorer_urls: &self.block_explorer_urls,
        }
    }

    /// Returns the first RPC endpoint, parsed.
    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        let url = self
            .rpc_urls
            .first()
            .ok_or_else(|| ConfigError::MissingRpcUrl(self.chain_name.clone()))?;
        Url::parse(url).map_err(|source| ConfigError::InvalidRpcUrl { url: url.clone(), source })
    }

    /// Returns the block explorer base URL without a trailing slash.
    pub fn explorer_url(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(|url| url.trim_end_matches('/'))
    }
}

/// Parses a chain id given either as `0x`-prefixed hex or as a decimal string.
pub fn parse_chain_id(s: &str) -> Result<u64, ConfigError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidChainId(s.to_string()))
}

mod hex_quantity {
    use super::*;

    pub(super) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => parse_chain_id(&s).map_err(de::Error::custom),
        }
    }
}
