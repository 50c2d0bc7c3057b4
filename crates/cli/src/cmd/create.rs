use super::{Context, print_json};
use crate::{
    opts::WalletArgs,
    route::share_link,
    utils::{format_timestamp, parse_timestamp},
};
use alloy_primitives::U256;
use clap::Parser;
use eyre::{Result, WrapErr};
use flexigift_ledger::{CreateGiftCardRequest, GiftCardRecord, LedgerError, TransactionResult};
use serde::Serialize;

/// CLI arguments for `flexigift create`.
#[derive(Clone, Debug, Parser)]
pub struct CreateArgs {
    /// The amount of USDC to put on the card, e.g. `25.50`.
    pub amount: String,

    /// Days until the card expires and the giver can reclaim what is left.
    #[arg(long, short, default_value_t = 30, value_name = "DAYS")]
    pub expiry_days: u64,

    /// Merchant index the card can be spent at. Repeat for several merchants.
    ///
    /// Defaults to the configured default selection.
    #[arg(long = "merchant", short, value_name = "INDEX")]
    pub merchants: Vec<u64>,

    /// A message for the recipient.
    #[arg(long, default_value = "")]
    pub message: String,

    /// Hold the card until this time: unix seconds, RFC 3339, or `YYYY-MM-DDTHH:MM` in UTC.
    #[arg(long, value_name = "WHEN")]
    pub deliver_at: Option<String>,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    #[serde(flatten)]
    result: TransactionResult,
    explorer_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gift_card: Option<GiftCardRecord>,
}

impl CreateArgs {
    pub async fn run(self, json: bool) -> Result<()> {
        let delivery_timestamp = self.deliver_at.as_deref().map(parse_timestamp).transpose()?;
        let ctx = Context::connect(&self.wallet).await?;

        let merchants =
            if self.merchants.is_empty() { ctx.config.default_merchants.clone() } else { self.merchants };
        let request = CreateGiftCardRequest {
            amount: self.amount,
            expiry_days: self.expiry_days,
            merchant_indices: merchants.into_iter().map(U256::from).collect(),
            message: self.message,
            delivery_timestamp,
        };

        let result = match ctx.client.create_gift_card(&request).await {
            Ok(result) => result,
            Err(err @ LedgerError::PartialCreate { approval_tx, .. }) => {
                eprintln!(
                    "Warning: USDC stays approved for the gift card contract, see {}",
                    ctx.tx_url(&approval_tx)
                );
                return Err(err.into());
            }
            Err(err) => return Err(err).wrap_err("failed to create gift card"),
        };

        let gift_card = match result.gift_card_id {
            Some(id) => Some(ctx.refetch(id).await?),
            None => None,
        };
        let created = Created {
            result,
            explorer_url: ctx.tx_url(&result.transaction_hash),
            share_link: result.gift_card_id.map(|id| share_link(&ctx.config.app_origin, id)),
            gift_card,
        };
        if json {
            return print_json(&created);
        }

        println!("Transaction: {}", created.explorer_url);
        match (&created.share_link, &created.gift_card) {
            (Some(link), Some(card)) => {
                println!("Gift card #{} created with {} USDC", card.id, card.amount);
                println!("Expires:     {}", format_timestamp(card.expiry_timestamp));
                if let Some(delivery) = card.delivery_timestamp {
                    println!("Delivery:    {}", format_timestamp(delivery));
                }
                println!("Share link:  {link}");
            }
            _ => println!("Gift card created, but its id could not be read from the receipt"),
        }
        Ok(())
    }
}
