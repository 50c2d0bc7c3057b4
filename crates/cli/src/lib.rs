//! # flexigift-cli
//!
//! The `flexigift` command line client.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod args;
pub mod cmd;
pub mod handler;
pub mod opts;
pub mod route;
pub mod utils;

use args::{Flexigift, FlexigiftSubcommand};
use clap::Parser;
use eyre::Result;

/// Run the `flexigift` command-line interface.
pub fn run() -> Result<()> {
    setup();

    let args = Flexigift::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run_command(args))
}

/// Setup the global logger and other utilities.
pub fn setup() {
    handler::install();
    utils::load_dotenv();
    utils::subscriber();
}

/// Run the subcommand.
pub async fn run_command(args: Flexigift) -> Result<()> {
    let json = args.json;
    match args.cmd {
        FlexigiftSubcommand::Connect(cmd) => cmd.run(json).await,
        FlexigiftSubcommand::Create(cmd) => cmd.run(json).await,
        FlexigiftSubcommand::Show(cmd) => cmd.run(json).await,
        FlexigiftSubcommand::Redeem(cmd) => cmd.run(json).await,
        FlexigiftSubcommand::Refund(cmd) => cmd.refund(json).await,
        FlexigiftSubcommand::Deliver(cmd) => cmd.deliver(json).await,
        FlexigiftSubcommand::CancelDelivery(cmd) => cmd.cancel_delivery(json).await,
        FlexigiftSubcommand::Balance(cmd) => cmd.run(json).await,
        FlexigiftSubcommand::Merchants(cmd) => cmd.run(json).await,
        FlexigiftSubcommand::Network(cmd) => cmd.run(),
        FlexigiftSubcommand::Link(cmd) => cmd.run(json),
    }
}
