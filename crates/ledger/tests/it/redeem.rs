use crate::mock::{Call, GIVER, MockLedger, OTHER_TX, STRANGER, Script, card};
use alloy_primitives::U256;
use flexigift_ledger::{
    CardActions, CardStatus, LedgerClient, LedgerError, RefundBlocker, TransactionResult,
};
use similar_asserts::assert_eq;

const EXPIRY: u64 = 1_750_000_000;

fn setup(script: Script) -> (LedgerClient<MockLedger>, MockLedger) {
    let ledger = MockLedger::new(script);
    (LedgerClient::new(ledger.clone(), 5), ledger)
}

#[tokio::test]
async fn redeem_converts_amount() {
    let (client, ledger) = setup(Script::default());
    let id = U256::from(42);

    let result = client.redeem_gift_card(id, "2.5", U256::from(3)).await.unwrap();
    assert_eq!(result, TransactionResult::new(OTHER_TX));
    assert_eq!(
        ledger.calls(),
        vec![Call::Redeem { id, amount: U256::from(2_500_000u64), merchant_index: U256::from(3) }]
    );

    let err = client.redeem_gift_card(id, "0", U256::ZERO).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
    assert_eq!(ledger.calls().len(), 1);
}

#[tokio::test]
async fn redeem_rejects_unknown_merchant() {
    let (client, ledger) = setup(Script::default());

    let err = client.redeem_gift_card(U256::from(1), "1", U256::from(99)).await.unwrap_err();
    assert!(
        matches!(err, LedgerError::UnknownMerchant { index, count: 5 } if index == U256::from(99)),
        "{err}"
    );
    let err = client.redeem_gift_card(U256::from(1), "1", U256::from(5)).await.unwrap_err();
    assert!(matches!(err, LedgerError::UnknownMerchant { .. }), "{err}");
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn card_lifecycle_calls() {
    let (client, ledger) = setup(Script::default());
    let id = U256::from(7);

    client.refund_gift_card(id).await.unwrap();
    client.deliver_gift_card(id).await.unwrap();
    client.cancel_scheduled_delivery(id).await.unwrap();
    assert_eq!(ledger.calls(), vec![Call::Refund(id), Call::Deliver(id), Call::CancelDelivery(id)]);
}

#[tokio::test]
async fn fetches_full_record() {
    let (client, _) = setup(Script { card: Some(card(EXPIRY)), ..Default::default() });

    let record = client.get_gift_card(U256::from(42)).await.unwrap();
    assert_eq!(record.giver, GIVER);
    assert_eq!(record.amount.to_display(), "25.00");
    assert_eq!(record.remaining_balance.to_display(), "10.50");
    assert_eq!(record.message.as_deref(), Some("enjoy"));
    assert_eq!(record.delivery_timestamp, None);
    assert_eq!(record.status(EXPIRY - 1), CardStatus::Active);
    assert_eq!(
        record.actions(Some(STRANGER), EXPIRY - 1),
        CardActions { redeem: true, ..Default::default() }
    );
}

#[tokio::test]
async fn spent_inactive_card_offers_no_redeem() {
    let mut spent = card(EXPIRY);
    spent.remainingBalance = U256::ZERO;
    spent.isActive = false;
    let (client, _) = setup(Script { card: Some(spent), ..Default::default() });

    let record = client.get_gift_card(U256::from(42)).await.unwrap();
    assert_eq!(record.remaining_balance.to_display(), "0.00");
    assert_eq!(record.status(EXPIRY - 1), CardStatus::Inactive);
    assert!(!record.actions(Some(GIVER), EXPIRY - 1).redeem);
}

#[tokio::test]
async fn refund_offered_to_giver_after_expiry() {
    let (client, _) = setup(Script { card: Some(card(EXPIRY)), ..Default::default() });
    let record = client.get_gift_card(U256::from(42)).await.unwrap();

    assert!(record.actions(Some(GIVER), EXPIRY + 1).refund);
    assert!(!record.actions(Some(STRANGER), EXPIRY + 1).refund);
    assert!(!record.actions(Some(GIVER), EXPIRY).refund);
    assert_eq!(record.refund_eligibility(Some(GIVER), EXPIRY), Err(RefundBlocker::NotExpired));
}

#[tokio::test]
async fn ledger_read_errors_propagate() {
    let (client, _) = setup(Script::default());
    let err = client.get_gift_card(U256::from(1)).await.unwrap_err();
    assert!(matches!(err, LedgerError::Contract(_)), "{err}");

    assert_eq!(client.merchant_name(U256::ZERO).await.unwrap(), "Amazon");
    assert!(client.merchant_name(U256::from(9)).await.is_err());
}

#[tokio::test]
async fn balance_degrades_to_zero() {
    let (client, _) = setup(Script { balance: Some(U256::from(1_234_567u64)), ..Default::default() });
    assert_eq!(client.usdc_balance(GIVER).await, "1.23");

    let (client, _) = setup(Script { balance: None, ..Default::default() });
    assert_eq!(client.usdc_balance(GIVER).await, "0.00");

    let client = LedgerClient::<MockLedger>::disconnected(5);
    assert_eq!(client.usdc_balance(GIVER).await, "0.00");
    assert!(matches!(client.get_gift_card(U256::ZERO).await, Err(LedgerError::NotConnected)));
}
