use crate::{abi::IFlexiGift, units::TokenAmount};
use alloy_primitives::{Address, Log, TxHash, U256};
use serde::Serialize;
use std::fmt;

/// A gift card as stored by the contract.
///
/// Records are never patched locally, they are fetched again after every mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCardRecord {
    pub id: U256,
    pub giver: Address,
    pub amount: TokenAmount,
    pub remaining_balance: TokenAmount,
    /// Unix timestamp, in seconds.
    pub expiry_timestamp: u64,
    pub is_active: bool,
    pub created_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_timestamp: Option<u64>,
    pub is_delivered: bool,
}

impl From<IFlexiGift::GiftCard> for GiftCardRecord {
    fn from(card: IFlexiGift::GiftCard) -> Self {
        let seconds = |value: U256| value.saturating_to::<u64>();
        Self {
            id: card.id,
            giver: card.giver,
            amount: TokenAmount::from_raw(card.amount),
            remaining_balance: TokenAmount::from_raw(card.remainingBalance),
            expiry_timestamp: seconds(card.expiryTimestamp),
            is_active: card.isActive,
            created_at: seconds(card.createdAt),
            message: Some(card.message).filter(|message| !message.is_empty()),
            delivery_timestamp: Some(seconds(card.deliveryTimestamp)).filter(|&ts| ts != 0),
            is_delivered: card.isDelivered,
        }
    }
}

impl GiftCardRecord {
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expiry_timestamp
    }

    pub fn has_balance(&self) -> bool {
        !self.remaining_balance.is_zero()
    }

    pub fn status(&self, now: u64) -> CardStatus {
        if !self.is_active {
            CardStatus::Inactive
        } else if self.is_expired(now) {
            CardStatus::Expired
        } else {
            CardStatus::Active
        }
    }

    /// Whether the card can still be spent.
    pub fn can_redeem(&self, now: u64) -> bool {
        self.status(now) == CardStatus::Active && self.has_balance()
    }

    /// Checks whether `amount` can be spent from the card as last fetched.
    ///
    /// Advisory only: the contract decides against its current state.
    pub fn redeem_eligibility(&self, amount: TokenAmount, now: u64) -> Result<(), RedeemBlocker> {
        if !self.can_redeem(now) {
            return Err(RedeemBlocker::Unavailable(self.status(now)));
        }
        if amount > self.remaining_balance {
            return Err(RedeemBlocker::ExceedsBalance { remaining: self.remaining_balance });
        }
        Ok(())
    }

    /// Checks whether `caller` may reclaim the remaining balance.
    pub fn refund_eligibility(&self, caller: Option<Address>, now: u64) -> Result<(), RefundBlocker> {
        if !self.is_expired(now) {
            return Err(RefundBlocker::NotExpired);
        }
        if caller != Some(self.giver) {
            return Err(RefundBlocker::NotGiver);
        }
        if !self.is_active || !self.has_balance() {
            return Err(RefundBlocker::NoBalance);
        }
        Ok(())
    }

    pub fn can_refund(&self, caller: Option<Address>, now: u64) -> bool {
        self.refund_eligibility(caller, now).is_ok()
    }

    /// Whether a scheduled delivery is still waiting to be released.
    pub fn delivery_pending(&self) -> bool {
        self.delivery_timestamp.is_some() && !self.is_delivered
    }

    pub fn actions(&self, caller: Option<Address>, now: u64) -> CardActions {
        let is_giver = caller == Some(self.giver);
        CardActions {
            redeem: self.can_redeem(now),
            refund: self.can_refund(caller, now),
            deliver: self.delivery_pending()
                && self.is_active
                && self.delivery_timestamp.is_some_and(|ts| now >= ts),
            cancel_delivery: self.delivery_pending() && self.is_active && is_giver,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Expired,
    Inactive,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Inactive => "Inactive",
        })
    }
}

/// Why a redemption is not available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RedeemBlocker {
    #[error("the gift card is {0} or has nothing left")]
    Unavailable(CardStatus),
    #[error("amount exceeds remaining balance of {remaining} USDC")]
    ExceedsBalance { remaining: TokenAmount },
}

/// Why a refund is not available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RefundBlocker {
    #[error("the gift card has not expired yet")]
    NotExpired,
    #[error("only the giver can refund this gift card")]
    NotGiver,
    #[error("nothing left to refund")]
    NoBalance,
}

/// Actions offered on the redeem view of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardActions {
    pub redeem: bool,
    pub refund: bool,
    pub deliver: bool,
    pub cancel_delivery: bool,
}

/// Outcome of a confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub transaction_hash: TxHash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_card_id: Option<U256>,
}

impl TransactionResult {
    pub const fn new(transaction_hash: TxHash) -> Self {
        Self { transaction_hash, gift_card_id: None }
    }
}

/// Input of [`LedgerClient::create_gift_card`](crate::LedgerClient::create_gift_card).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateGiftCardRequest {
    /// Decimal USDC amount, e.g. `25.50`.
    pub amount: String,
    pub expiry_days: u64,
    pub merchant_indices: Vec<U256>,
    pub message: String,
    /// Unix timestamp at which the card is released to the recipient.
    pub delivery_timestamp: Option<u64>,
}

/// A mined transaction, as seen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedTx {
    pub hash: TxHash,
    pub success: bool,
    pub logs: Vec<Log>,
}
