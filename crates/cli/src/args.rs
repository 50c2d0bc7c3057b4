use crate::cmd::{
    card::{CardArgs, RedeemArgs, ShowArgs},
    connect::ConnectArgs,
    create::CreateArgs,
    info::{BalanceArgs, LinkArgs, MerchantsArgs, NetworkArgs},
};
use clap::{Parser, Subcommand};

/// Create, share and redeem USDC gift cards on Arbitrum.
#[derive(Debug, Parser)]
#[command(name = "flexigift", version, next_display_order = None)]
pub struct Flexigift {
    #[command(subcommand)]
    pub cmd: FlexigiftSubcommand,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum FlexigiftSubcommand {
    /// Connect the wallet and show the session.
    #[command(visible_alias = "c")]
    Connect(ConnectArgs),

    /// Fund a new gift card with USDC.
    Create(CreateArgs),

    /// Show a gift card and what can be done with it.
    #[command(visible_alias = "s")]
    Show(ShowArgs),

    /// Spend part of a gift card at a merchant.
    Redeem(RedeemArgs),

    /// Reclaim the remaining balance of an expired gift card.
    Refund(CardArgs),

    /// Release a gift card whose scheduled delivery time has passed.
    Deliver(CardArgs),

    /// Cancel the scheduled delivery of a gift card.
    CancelDelivery(CardArgs),

    /// Show the USDC balance of an account.
    #[command(visible_alias = "b")]
    Balance(BalanceArgs),

    /// List the merchants gift cards can be spent at.
    Merchants(MerchantsArgs),

    /// Print the target network in `wallet_addEthereumChain` form.
    Network(NetworkArgs),

    /// Print the link a recipient opens to redeem a gift card.
    Link(LinkArgs),
}
