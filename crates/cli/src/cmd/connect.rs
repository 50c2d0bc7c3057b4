use super::{Context, print_json};
use crate::opts::WalletArgs;
use alloy_primitives::{Address, ChainId};
use clap::Parser;
use eyre::Result;
use flexigift_ledger::links;
use serde::Serialize;

/// CLI arguments for `flexigift connect`.
#[derive(Clone, Debug, Parser)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSummary {
    address: Address,
    chain_id: ChainId,
    network: String,
    usdc_balance: String,
}

impl ConnectArgs {
    pub async fn run(self, json: bool) -> Result<()> {
        let ctx = Context::connect(&self.wallet).await?;
        let state = ctx.session.state();
        let Some(address) = state.address else { eyre::bail!("wallet not connected") };

        let summary = SessionSummary {
            address,
            chain_id: state.chain_id.unwrap_or(ctx.session.target().chain_id),
            network: ctx.session.target().chain_name.clone(),
            usdc_balance: ctx.client.usdc_balance(address).await,
        };
        if json {
            return print_json(&summary);
        }

        println!("Connected {} on {} ({})", links::short_address(&address), summary.network, summary.chain_id);
        println!("Address:      {address}");
        println!("USDC balance: {}", summary.usdc_balance);
        println!("Explorer:     {}", links::explorer_address_url(ctx.config.explorer_url(), &address));
        Ok(())
    }
}
