use super::{Context, parse_card_id, print_json};
use crate::{
    opts::{RpcOpts, WalletArgs},
    route::share_link,
};
use alloy_primitives::{Address, U256};
use clap::Parser;
use eyre::Result;
use serde::Serialize;

/// CLI arguments for `flexigift balance`.
#[derive(Clone, Debug, Parser)]
pub struct BalanceArgs {
    /// The account to query. Defaults to the connected account.
    pub who: Option<Address>,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

impl BalanceArgs {
    pub async fn run(self, json: bool) -> Result<()> {
        let ctx = Context::connect(&self.wallet).await?;
        let Some(who) = self.who.or_else(|| ctx.address()) else {
            eyre::bail!("no account to query");
        };
        let balance = ctx.client.usdc_balance(who).await;
        if json {
            return print_json(&serde_json::json!({ "address": who, "usdcBalance": balance }));
        }
        println!("{balance} USDC");
        Ok(())
    }
}

/// CLI arguments for `flexigift merchants`.
#[derive(Clone, Debug, Parser)]
pub struct MerchantsArgs {
    /// Read the merchant names registered in the contract instead of the configured ones.
    #[arg(long)]
    pub onchain: bool,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Debug, Serialize)]
struct MerchantEntry {
    index: u64,
    name: String,
    default: bool,
}

impl MerchantsArgs {
    pub async fn run(self, json: bool) -> Result<()> {
        let config = self.wallet.rpc.load_config()?;
        let mut entries: Vec<MerchantEntry> = config
            .merchants
            .iter()
            .map(|merchant| MerchantEntry {
                index: merchant.index,
                name: merchant.name.to_string(),
                default: config.default_merchants.contains(&merchant.index),
            })
            .collect();

        if self.onchain {
            let ctx = Context::connect(&self.wallet).await?;
            for entry in &mut entries {
                entry.name = ctx.client.merchant_name(U256::from(entry.index)).await?;
            }
        }

        if json {
            return print_json(&entries);
        }
        for entry in &entries {
            let marker = if entry.default { " (default)" } else { "" };
            println!("{:>3}  {}{marker}", entry.index, entry.name);
        }
        Ok(())
    }
}

/// CLI arguments for `flexigift network`.
#[derive(Clone, Debug, Parser)]
pub struct NetworkArgs {
    #[command(flatten)]
    pub rpc: RpcOpts,
}

impl NetworkArgs {
    pub fn run(self) -> Result<()> {
        let network = self.rpc.load_config()?.network();
        print_json(&network.add_chain_parameter())
    }
}

/// CLI arguments for `flexigift link`.
#[derive(Clone, Debug, Parser)]
pub struct LinkArgs {
    /// The gift card id.
    #[arg(value_name = "ID", value_parser = parse_card_id)]
    pub id: U256,

    /// Origin of the web app. Defaults to the configured one.
    #[arg(long)]
    pub origin: Option<String>,

    #[command(flatten)]
    pub rpc: RpcOpts,
}

impl LinkArgs {
    pub fn run(self, json: bool) -> Result<()> {
        let origin = match self.origin {
            Some(origin) => origin,
            None => self.rpc.load_config()?.app_origin,
        };
        let link = share_link(&origin, self.id);
        if json {
            return print_json(&serde_json::json!({ "id": self.id, "link": link }));
        }
        println!("{link}");
        Ok(())
    }
}
