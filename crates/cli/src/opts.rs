use alloy_primitives::Address;
use clap::Parser;
use eyre::Result;
use flexigift_config::{
    Config,
    figment::{
        self, Figment, Metadata, Profile,
        value::{Dict, Map, Value},
    },
};
use flexigift_wallets::WalletOpts;

/// Network and contract overrides.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Network options")]
pub struct RpcOpts {
    /// The RPC endpoint of the target network.
    #[arg(long = "rpc-url", short = 'r', value_name = "URL", env = "ETH_RPC_URL")]
    pub url: Option<String>,

    /// The FlexiGift contract address.
    #[arg(long, value_name = "ADDRESS")]
    pub flexigift: Option<Address>,

    /// The USDC token address.
    #[arg(long, value_name = "ADDRESS")]
    pub usdc: Option<Address>,
}

impl figment::Provider for RpcOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("RpcOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Profile::Default, self.dict())]))
    }
}

impl RpcOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = &self.url {
            dict.insert("eth_rpc_url".into(), url.clone().into());
        }
        let mut contracts = Dict::new();
        if let Some(flexigift) = self.flexigift {
            contracts.insert("flexigift".into(), flexigift.to_string().into());
        }
        if let Some(usdc) = self.usdc {
            contracts.insert("usdc".into(), usdc.to_string().into());
        }
        if !contracts.is_empty() {
            dict.insert("contracts".into(), Value::from(contracts));
        }
        dict
    }

    /// Returns the figment of the loaded config with these options merged on top.
    pub fn figment(&self) -> Figment {
        Config::figment().merge(self.clone())
    }

    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::from_provider(self.figment())?)
    }
}

/// Everything needed to act on behalf of a wallet.
#[derive(Clone, Debug, Default, Parser)]
pub struct WalletArgs {
    #[command(flatten)]
    pub rpc: RpcOpts,

    #[command(flatten)]
    pub wallet: WalletOpts,
}
