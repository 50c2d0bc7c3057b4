//! In-memory [`GiftCardLedger`] recording every call it receives.

use alloy_primitives::{Address, Bytes, Log, LogData, TxHash, U256, address};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use flexigift_ledger::{
    GiftCardLedger, LedgerError, SubmittedTx, abi::IFlexiGift, error::Result,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const FLEXIGIFT: Address = address!("0x00000000000000000000000000000000000f1e61");
pub const USDC: Address = address!("0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d");
pub const GIVER: Address = address!("0x1111111111111111111111111111111111111111");
pub const STRANGER: Address = address!("0x2222222222222222222222222222222222222222");

pub const APPROVE_TX: TxHash = TxHash::repeat_byte(0xa1);
pub const CREATE_TX: TxHash = TxHash::repeat_byte(0xc1);
pub const OTHER_TX: TxHash = TxHash::repeat_byte(0xb1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Approve { spender: Address, amount: U256 },
    Create {
        amount: U256,
        expiry_days: U256,
        merchant_indices: Vec<U256>,
        message: String,
        delivery_timestamp: U256,
    },
    Redeem { id: U256, amount: U256, merchant_index: U256 },
    Refund(U256),
    Deliver(U256),
    CancelDelivery(U256),
}

/// What the mock answers.
#[derive(Clone, Debug)]
pub struct Script {
    pub revert_approve: bool,
    pub revert_create: bool,
    /// Id announced by the `GiftCardCreated` event, no event is emitted if `None`.
    pub created_id: Option<u64>,
    /// Holds `approve` until [`MockLedger::release`] is called.
    pub gate_approve: bool,
    pub balance: Option<U256>,
    pub card: Option<IFlexiGift::GiftCard>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            revert_approve: false,
            revert_create: false,
            created_id: Some(42),
            gate_approve: false,
            balance: Some(U256::ZERO),
            card: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockLedger {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    script: Script,
    calls: Mutex<Vec<Call>>,
    entered: Notify,
    release: Notify,
}

impl MockLedger {
    pub fn new(script: Script) -> Self {
        Self { inner: Arc::new(Inner { script, ..Default::default() }) }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Resolves once a gated `approve` is pending.
    pub async fn approve_entered(&self) {
        self.inner.entered.notified().await
    }

    pub fn release(&self) {
        self.inner.release.notify_one();
    }

    fn record(&self, call: Call) {
        self.inner.calls.lock().unwrap().push(call);
    }

    fn script(&self) -> &Script {
        &self.inner.script
    }
}

fn mined(hash: TxHash, success: bool, logs: Vec<Log>) -> SubmittedTx {
    SubmittedTx { hash, success, logs }
}

fn unknown(function: &str) -> LedgerError {
    alloy_contract::Error::UnknownFunction(function.to_string()).into()
}

#[async_trait]
impl GiftCardLedger for MockLedger {
    fn gift_card_address(&self) -> Address {
        FLEXIGIFT
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<SubmittedTx> {
        self.record(Call::Approve { spender, amount });
        if self.script().gate_approve {
            self.inner.entered.notify_one();
            self.inner.release.notified().await;
        }
        Ok(mined(APPROVE_TX, !self.script().revert_approve, vec![]))
    }

    async fn create_gift_card(
        &self,
        amount: U256,
        expiry_days: U256,
        merchant_indices: Vec<U256>,
        message: String,
        delivery_timestamp: U256,
    ) -> Result<SubmittedTx> {
        self.record(Call::Create {
            amount,
            expiry_days,
            merchant_indices,
            message: message.clone(),
            delivery_timestamp,
        });

        // The token contract logs the transfer first.
        let mut logs = vec![Log { address: USDC, data: LogData::new_unchecked(vec![], Bytes::new()) }];
        if let Some(id) = self.script().created_id {
            let event = IFlexiGift::GiftCardCreated {
                giftCardId: U256::from(id),
                giver: GIVER,
                amount,
                expiryTimestamp: U256::from(1_700_000_000u64),
                message,
                deliveryTimestamp: delivery_timestamp,
            };
            logs.push(Log { address: FLEXIGIFT, data: event.encode_log_data() });
        }
        Ok(mined(CREATE_TX, !self.script().revert_create, logs))
    }

    async fn redeem_gift_card(
        &self,
        id: U256,
        amount: U256,
        merchant_index: U256,
    ) -> Result<SubmittedTx> {
        self.record(Call::Redeem { id, amount, merchant_index });
        Ok(mined(OTHER_TX, true, vec![]))
    }

    async fn refund_gift_card(&self, id: U256) -> Result<SubmittedTx> {
        self.record(Call::Refund(id));
        Ok(mined(OTHER_TX, true, vec![]))
    }

    async fn deliver_gift_card(&self, id: U256) -> Result<SubmittedTx> {
        self.record(Call::Deliver(id));
        Ok(mined(OTHER_TX, true, vec![]))
    }

    async fn cancel_scheduled_delivery(&self, id: U256) -> Result<SubmittedTx> {
        self.record(Call::CancelDelivery(id));
        Ok(mined(OTHER_TX, true, vec![]))
    }

    async fn gift_card(&self, _id: U256) -> Result<IFlexiGift::GiftCard> {
        self.script().card.clone().ok_or_else(|| unknown("getGiftCard"))
    }

    async fn usdc_balance(&self, _owner: Address) -> Result<U256> {
        self.script().balance.ok_or_else(|| unknown("balanceOf"))
    }

    async fn merchant_name(&self, index: U256) -> Result<String> {
        match index.to::<u64>() {
            0 => Ok("Amazon".to_string()),
            _ => Err(unknown("getMerchantName")),
        }
    }
}

/// A card worth 25 USDC with 10.50 left, expiring at `expiry`.
pub fn card(expiry: u64) -> IFlexiGift::GiftCard {
    IFlexiGift::GiftCard {
        id: U256::from(42),
        giver: GIVER,
        amount: U256::from(25_000_000u64),
        remainingBalance: U256::from(10_500_000u64),
        expiryTimestamp: U256::from(expiry),
        isActive: true,
        createdAt: U256::from(expiry - 30 * 86_400),
        message: "enjoy".to_string(),
        deliveryTimestamp: U256::ZERO,
        isDelivered: false,
    }
}
