//! # flexigift-ledger
//!
//! Typed calls against the FlexiGift contract and its USDC payment token.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod abi;

mod client;
pub use client::{LedgerClient, created_gift_card_id};

pub mod error;
pub use error::LedgerError;

mod ledger;
pub use ledger::{AlloyLedger, GiftCardLedger};

pub mod links;

mod types;
pub use types::{
    CardActions, CardStatus, CreateGiftCardRequest, GiftCardRecord, RedeemBlocker, RefundBlocker,
    SubmittedTx, TransactionResult,
};

mod units;
pub use units::{AmountError, TokenAmount, USDC_DECIMALS};
