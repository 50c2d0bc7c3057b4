//! # flexigift-config
//!
//! Network, contract and merchant configuration for the FlexiGift client.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, address};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{ConfigError, ExtractConfigError};

mod merchants;
pub use merchants::{Merchant, MerchantCatalogue};

mod network;
pub use network::{
    ARBITRUM_SEPOLIA_CHAIN_ID, AddEthereumChainParameter, NativeCurrency, NetworkDescriptor,
    parse_chain_id,
};

// reexport so cli types can implement `figment::Provider` to merge their arguments
pub use figment;

/// Addresses of the contracts the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// The FlexiGift gift card contract.
    pub flexigift: Address,
    /// The USDC token used to fund gift cards.
    pub usdc: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            flexigift: Address::ZERO,
            usdc: address!("0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d"),
        }
    }
}

/// FlexiGift client configuration.
///
/// # Defining a configuration
///
/// Values are merged from the following sources, in ascending priority:
///
///   1. The built-in defaults, targeting Arbitrum Sepolia.
///   2. A `flexigift.toml` file in the current directory.
///   3. Environment variables prefixed with `FLEXIGIFT_`. Nested keys are separated with `__`,
///      e.g. `FLEXIGIFT_CONTRACTS__FLEXIGIFT=0x...`.
///
/// Command line arguments are merged on top by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The network the contracts live on.
    pub network: NetworkDescriptor,
    /// Overrides the network's first RPC endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_rpc_url: Option<String>,
    /// Deployed contract addresses.
    pub contracts: ContractAddresses,
    /// Merchants gift cards can be spent at, by index.
    pub merchants: MerchantCatalogue,
    /// Merchant indices preselected when creating a gift card.
    pub default_merchants: Vec<u64>,
    /// Where users without a wallet are sent.
    pub wallet_install_url: String,
    /// Origin of the web app, used to build shareable redeem links.
    pub app_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkDescriptor::arbitrum_sepolia(),
            eth_rpc_url: None,
            contracts: ContractAddresses::default(),
            merchants: MerchantCatalogue::default(),
            default_merchants: vec![0, 1, 2],
            wallet_install_url: "https://metamask.io/download/".to_string(),
            app_origin: "https://flexigift.app".to_string(),
        }
    }
}

impl Config {
    /// The name of the config file.
    pub const FILE_NAME: &'static str = "flexigift.toml";

    /// The prefix of environment variables merged into the config.
    pub const ENV_PREFIX: &'static str = "FLEXIGIFT_";

    /// Loads the config from the default figment.
    ///
    /// See [`figment`](Self::figment) for more details.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::from_provider(Self::figment())
    }

    /// Extracts a config from the given provider.
    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        let config = Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::new)?;
        if config.contracts.flexigift.is_zero() {
            warn!("no FlexiGift contract address configured; set `contracts.flexigift`");
        }
        Ok(config)
    }

    /// Returns the default figment: defaults, then `flexigift.toml`, then the environment.
    pub fn figment() -> Figment {
        Figment::from(Self::default())
            .merge(Toml::file(Self::FILE_NAME))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Returns the target network with the configured RPC override applied.
    pub fn network(&self) -> NetworkDescriptor {
        let mut network = self.network.clone();
        if let Some(url) = &self.eth_rpc_url {
            network.rpc_urls.retain(|existing| existing != url);
            network.rpc_urls.insert(0, url.clone());
        }
        network
    }

    /// Returns the block explorer base URL of the target network.
    pub fn explorer_url(&self) -> &str {
        self.network.explorer_url().unwrap_or("https://sepolia.arbiscan.io")
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("FlexiGift Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn default_figment_is_default_config() {
        Jail::expect_with(|_| {
            let config = Config::load().unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "flexigift.toml",
                r#"
                default_merchants = [3]
                merchants = ["Amazon", "Uber", "Zomato", "Starbucks"]

                [contracts]
                flexigift = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
                usdc = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
            "#,
            )?;
            let config = Config::load().unwrap();
            assert_eq!(
                config.contracts.flexigift,
                address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")
            );
            assert_eq!(config.merchants.len(), 4);
            assert_eq!(config.default_merchants, vec![3]);
            assert_eq!(config.network, NetworkDescriptor::arbitrum_sepolia());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("flexigift.toml", "eth_rpc_url = \"http://localhost:8545\"")?;
            jail.set_env("FLEXIGIFT_ETH_RPC_URL", "http://127.0.0.1:9545");
            jail.set_env("FLEXIGIFT_NETWORK__CHAIN_NAME", "Local Arbitrum");
            let config = Config::load().unwrap();
            assert_eq!(config.eth_rpc_url.as_deref(), Some("http://127.0.0.1:9545"));
            assert_eq!(config.network.chain_name, "Local Arbitrum");
            assert_eq!(config.network.chain_id, ARBITRUM_SEPOLIA_CHAIN_ID);

            let network = config.network();
            assert_eq!(network.rpc_urls[0], "http://127.0.0.1:9545");
            assert_eq!(network.rpc_urls[1], "https://sepolia-rollup.arbitrum.io/rpc");
            Ok(())
        });
    }

    #[test]
    fn network_table_and_env_merge_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "flexigift.toml",
                r#"
                [network]
                chain_id = 31337
                rpc_urls = ["http://localhost:8545"]
                block_explorer_urls = ["http://localhost:4000/"]

                [network.native_currency]
                symbol = "gETH"
            "#,
            )?;
            jail.set_env("FLEXIGIFT_NETWORK__CHAIN_ID", "0x7a6a");
            let config = Config::load().unwrap();
            assert_eq!(config.network.chain_id, 31338);
            assert_eq!(config.network.chain_name, "Arbitrum Sepolia");
            assert_eq!(config.network.rpc_urls, ["http://localhost:8545"]);
            assert_eq!(config.network.native_currency.symbol, "gETH");
            assert_eq!(config.network.native_currency.decimals, 18);
            assert_eq!(config.explorer_url(), "http://localhost:4000");
            Ok(())
        });
    }

    #[test]
    fn invalid_toml_is_reported() {
        Jail::expect_with(|jail| {
            jail.create_file("flexigift.toml", "[contracts]\nusdc = \"not an address\"")?;
            let err = Config::load().unwrap_err();
            assert!(err.to_string().starts_with(error::FAILED_TO_EXTRACT_CONFIG_MSG), "{err}");
            Ok(())
        });
    }
}
