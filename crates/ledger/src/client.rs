use crate::{
    abi::IFlexiGift,
    error::{LedgerError, MAX_MESSAGE_LEN, Result},
    ledger::GiftCardLedger,
    types::{CreateGiftCardRequest, GiftCardRecord, SubmittedTx, TransactionResult},
    units::{AmountError, TokenAmount},
};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolEvent;
use tokio::sync::{Mutex, MutexGuard};

/// Typed facade over a [`GiftCardLedger`].
///
/// Validates input, converts amounts to fixed point and normalizes receipts. State-changing
/// calls are serialized: while one is pending every other one fails with
/// [`LedgerError::Busy`].
#[derive(Debug)]
pub struct LedgerClient<L> {
    ledger: Option<L>,
    merchant_count: usize,
    in_flight: Mutex<()>,
}

impl<L: GiftCardLedger> LedgerClient<L> {
    /// Creates a client that signs through `ledger`.
    pub fn new(ledger: L, merchant_count: usize) -> Self {
        Self { ledger: Some(ledger), merchant_count, in_flight: Mutex::new(()) }
    }

    /// Creates a client without a signer, every call fails with [`LedgerError::NotConnected`].
    pub fn disconnected(merchant_count: usize) -> Self {
        Self { ledger: None, merchant_count, in_flight: Mutex::new(()) }
    }

    pub fn is_connected(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn ledger(&self) -> Result<&L> {
        self.ledger.as_ref().ok_or(LedgerError::NotConnected)
    }

    /// Approves the gift card contract for the amount, then creates the card.
    ///
    /// Returns the hash of the create transaction and the id read from its
    /// `GiftCardCreated` event. If the approval is mined but the create fails, the error is
    /// [`LedgerError::PartialCreate`] carrying the approval hash.
    pub async fn create_gift_card(
        &self,
        request: &CreateGiftCardRequest,
    ) -> Result<TransactionResult> {
        let ledger = self.ledger()?;
        let amount = positive_amount(&request.amount)?;
        let message_len = request.message.chars().count();
        if message_len > MAX_MESSAGE_LEN {
            return Err(LedgerError::MessageTooLong(message_len));
        }
        if request.merchant_indices.is_empty() {
            return Err(LedgerError::NoMerchants);
        }
        for &index in &request.merchant_indices {
            self.known_merchant(index)?;
        }

        let _guard = self.begin()?;
        let spender = ledger.gift_card_address();
        let approval = ensure_success(ledger.approve(spender, amount.raw()).await?)?;
        debug!(tx_hash = %approval.hash, %spender, %amount, "USDC approved");

        let created = async {
            ensure_success(
                ledger
                    .create_gift_card(
                        amount.raw(),
                        U256::from(request.expiry_days),
                        request.merchant_indices.clone(),
                        request.message.clone(),
                        U256::from(request.delivery_timestamp.unwrap_or_default()),
                    )
                    .await?,
            )
        }
        .await
        .map_err(|source| {
            error!(approval_tx = %approval.hash, %source, "gift card creation failed after approval");
            LedgerError::PartialCreate { approval_tx: approval.hash, source: Box::new(source) }
        })?;

        let gift_card_id = created_gift_card_id(&created, spender);
        if gift_card_id.is_none() {
            warn!(tx_hash = %created.hash, "no GiftCardCreated event in receipt");
        }
        Ok(TransactionResult { transaction_hash: created.hash, gift_card_id })
    }

    /// Spends `amount` of the card at the given merchant.
    ///
    /// The remaining balance is checked by the contract only.
    pub async fn redeem_gift_card(
        &self,
        id: U256,
        amount: &str,
        merchant_index: U256,
    ) -> Result<TransactionResult> {
        let ledger = self.ledger()?;
        let amount = positive_amount(amount)?;
        self.known_merchant(merchant_index)?;
        let _guard = self.begin()?;
        let tx = ledger.redeem_gift_card(id, amount.raw(), merchant_index).await?;
        ensure_success(tx).map(|tx| TransactionResult::new(tx.hash))
    }

    pub async fn refund_gift_card(&self, id: U256) -> Result<TransactionResult> {
        let ledger = self.ledger()?;
        let _guard = self.begin()?;
        ensure_success(ledger.refund_gift_card(id).await?).map(|tx| TransactionResult::new(tx.hash))
    }

    /// Releases a card whose scheduled delivery time has passed.
    pub async fn deliver_gift_card(&self, id: U256) -> Result<TransactionResult> {
        let ledger = self.ledger()?;
        let _guard = self.begin()?;
        ensure_success(ledger.deliver_gift_card(id).await?).map(|tx| TransactionResult::new(tx.hash))
    }

    pub async fn cancel_scheduled_delivery(&self, id: U256) -> Result<TransactionResult> {
        let ledger = self.ledger()?;
        let _guard = self.begin()?;
        ensure_success(ledger.cancel_scheduled_delivery(id).await?)
            .map(|tx| TransactionResult::new(tx.hash))
    }

    pub async fn get_gift_card(&self, id: U256) -> Result<GiftCardRecord> {
        let card = self.ledger()?.gift_card(id).await?;
        Ok(card.into())
    }

    /// Returns the USDC balance of `owner` formatted with two decimals.
    ///
    /// Any failure is logged and reported as `0.00`.
    pub async fn usdc_balance(&self, owner: Address) -> String {
        let balance = match self.ledger() {
            Ok(ledger) => ledger.usdc_balance(owner).await,
            Err(err) => Err(err),
        };
        match balance {
            Ok(balance) => TokenAmount::from_raw(balance).to_display(),
            Err(err) => {
                warn!(%owner, %err, "failed to read USDC balance");
                TokenAmount::ZERO.to_display()
            }
        }
    }

    pub async fn merchant_name(&self, index: U256) -> Result<String> {
        self.ledger()?.merchant_name(index).await
    }

    fn known_merchant(&self, index: U256) -> Result<()> {
        if index >= U256::from(self.merchant_count) {
            return Err(LedgerError::UnknownMerchant { index, count: self.merchant_count });
        }
        Ok(())
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().map_err(|_| LedgerError::Busy)
    }
}

fn positive_amount(amount: &str) -> Result<TokenAmount> {
    let amount = TokenAmount::from_decimal_str(amount)?;
    if amount.is_zero() {
        return Err(AmountError::NotPositive.into());
    }
    Ok(amount)
}

fn ensure_success(tx: SubmittedTx) -> Result<SubmittedTx> {
    if tx.success { Ok(tx) } else { Err(LedgerError::Reverted { tx_hash: tx.hash }) }
}

/// Finds the id announced by the gift card contract in a create receipt.
pub fn created_gift_card_id(tx: &SubmittedTx, contract: Address) -> Option<U256> {
    tx.logs
        .iter()
        .filter(|log| log.address == contract)
        .find_map(|log| IFlexiGift::GiftCardCreated::decode_log(log).ok())
        .map(|event| event.data.giftCardId)
}
