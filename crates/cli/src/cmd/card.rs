use super::{Context, parse_card_id, print_json};
use crate::{opts::WalletArgs, utils};
use alloy_primitives::{Address, U256};
use clap::Parser;
use eyre::{Result, WrapErr, bail};
use flexigift_ledger::{
    CardActions, CardStatus, GiftCardRecord, TokenAmount, TransactionResult, links,
};
use serde::Serialize;

/// A gift card, addressed by id or share link.
#[derive(Clone, Debug, Parser)]
pub struct CardArgs {
    /// The gift card id, or its `/redeem/{id}` link.
    #[arg(value_name = "ID", value_parser = parse_card_id)]
    pub id: U256,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

/// CLI arguments for `flexigift show`.
#[derive(Clone, Debug, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    pub card: CardArgs,
}

/// CLI arguments for `flexigift redeem`.
#[derive(Clone, Debug, Parser)]
pub struct RedeemArgs {
    #[command(flatten)]
    pub card: CardArgs,

    /// The amount of USDC to spend.
    pub amount: String,

    /// Index of the merchant the card is spent at.
    #[arg(long, short, value_name = "INDEX")]
    pub merchant: u64,
}

/// The redeem view of a card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CardView {
    #[serde(flatten)]
    card: GiftCardRecord,
    status: CardStatus,
    actions: CardActions,
}

impl CardView {
    fn new(card: GiftCardRecord, viewer: Option<Address>) -> Self {
        let now = utils::now();
        Self { status: card.status(now), actions: card.actions(viewer, now), card }
    }

    fn print(&self, explorer: &str) {
        let card = &self.card;
        println!("Gift card #{} ({})", card.id, self.status);
        println!("Amount:    {} USDC", card.amount);
        println!("Remaining: {} USDC", card.remaining_balance);
        println!(
            "From:      {} ({})",
            links::short_address(&card.giver),
            links::explorer_address_url(explorer, &card.giver)
        );
        println!("Created:   {}", utils::format_timestamp(card.created_at));
        println!("Expires:   {}", utils::format_timestamp(card.expiry_timestamp));
        if let Some(delivery) = card.delivery_timestamp {
            let state = if card.is_delivered { "delivered" } else { "scheduled" };
            println!("Delivery:  {} ({state})", utils::format_timestamp(delivery));
        }
        if let Some(message) = &card.message {
            println!("Message:   {message}");
        }

        let actions = [
            (self.actions.redeem, "redeem"),
            (self.actions.refund, "refund"),
            (self.actions.deliver, "deliver"),
            (self.actions.cancel_delivery, "cancel-delivery"),
        ];
        let available: Vec<_> =
            actions.into_iter().filter_map(|(enabled, name)| enabled.then_some(name)).collect();
        if available.is_empty() {
            println!("Actions:   none");
        } else {
            println!("Actions:   {}", available.join(", "));
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Receipt {
    #[serde(flatten)]
    result: TransactionResult,
    explorer_url: String,
    gift_card: CardView,
}

impl ShowArgs {
    pub async fn run(self, json: bool) -> Result<()> {
        let ctx = Context::connect(&self.card.wallet).await?;
        let card = ctx.client.get_gift_card(self.card.id).await?;
        let view = CardView::new(card, ctx.address());
        if json {
            return print_json(&view);
        }
        view.print(ctx.config.explorer_url());
        Ok(())
    }
}

impl RedeemArgs {
    pub async fn run(self, json: bool) -> Result<()> {
        let id = self.card.id;
        let amount: TokenAmount = self.amount.parse()?;
        let ctx = Context::connect(&self.card.wallet).await?;
        let card = ctx.client.get_gift_card(id).await?;
        if let Err(blocker) = card.redeem_eligibility(amount, utils::now()) {
            bail!("gift card #{id} cannot be redeemed: {blocker}");
        }
        let result = ctx
            .client
            .redeem_gift_card(id, &self.amount, U256::from(self.merchant))
            .await
            .wrap_err_with(|| format!("failed to redeem gift card #{id}"))?;
        finish(&ctx, id, result, json).await
    }
}

impl CardArgs {
    pub async fn refund(self, json: bool) -> Result<()> {
        let ctx = Context::connect(&self.wallet).await?;
        let card = ctx.client.get_gift_card(self.id).await?;
        if let Err(blocker) = card.refund_eligibility(ctx.address(), utils::now()) {
            bail!("gift card #{} cannot be refunded: {blocker}", self.id);
        }
        let result = ctx
            .client
            .refund_gift_card(self.id)
            .await
            .wrap_err_with(|| format!("failed to refund gift card #{}", self.id))?;
        finish(&ctx, self.id, result, json).await
    }

    pub async fn deliver(self, json: bool) -> Result<()> {
        let ctx = Context::connect(&self.wallet).await?;
        let result = ctx
            .client
            .deliver_gift_card(self.id)
            .await
            .wrap_err_with(|| format!("failed to deliver gift card #{}", self.id))?;
        finish(&ctx, self.id, result, json).await
    }

    pub async fn cancel_delivery(self, json: bool) -> Result<()> {
        let ctx = Context::connect(&self.wallet).await?;
        let result = ctx
            .client
            .cancel_scheduled_delivery(self.id)
            .await
            .wrap_err_with(|| format!("failed to cancel delivery of gift card #{}", self.id))?;
        finish(&ctx, self.id, result, json).await
    }
}

/// Reports a mined transaction along with the card as it is now.
async fn finish(ctx: &Context, id: U256, result: TransactionResult, json: bool) -> Result<()> {
    let receipt = Receipt {
        result,
        explorer_url: ctx.tx_url(&result.transaction_hash),
        gift_card: CardView::new(ctx.refetch(id).await?, ctx.address()),
    };
    if json {
        return print_json(&receipt);
    }
    println!("Transaction: {}", receipt.explorer_url);
    println!();
    receipt.gift_card.print(ctx.config.explorer_url());
    Ok(())
}
