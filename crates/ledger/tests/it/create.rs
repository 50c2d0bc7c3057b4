use crate::mock::{APPROVE_TX, CREATE_TX, Call, FLEXIGIFT, MockLedger, Script};
use alloy_primitives::U256;
use flexigift_ledger::{
    AmountError, CreateGiftCardRequest, LedgerClient, LedgerError, TransactionResult,
    error::MAX_MESSAGE_LEN,
};
use similar_asserts::assert_eq;

const MERCHANTS: usize = 5;

fn request(amount: &str) -> CreateGiftCardRequest {
    CreateGiftCardRequest {
        amount: amount.to_string(),
        expiry_days: 30,
        merchant_indices: vec![U256::from(0), U256::from(1), U256::from(2)],
        message: "Happy birthday!".to_string(),
        delivery_timestamp: None,
    }
}

fn setup(script: Script) -> (LedgerClient<MockLedger>, MockLedger) {
    let ledger = MockLedger::new(script);
    (LedgerClient::new(ledger.clone(), MERCHANTS), ledger)
}

#[tokio::test]
async fn approves_exact_amount_then_creates() {
    let (client, ledger) = setup(Script::default());

    let mut request = request("12.3456785");
    request.delivery_timestamp = Some(1_800_000_000);
    let result = client.create_gift_card(&request).await.unwrap();

    assert_eq!(
        result,
        TransactionResult { transaction_hash: CREATE_TX, gift_card_id: Some(U256::from(42)) }
    );
    let amount = U256::from(12_345_679u64);
    assert_eq!(
        ledger.calls(),
        vec![
            Call::Approve { spender: FLEXIGIFT, amount },
            Call::Create {
                amount,
                expiry_days: U256::from(30),
                merchant_indices: request.merchant_indices.clone(),
                message: request.message.clone(),
                delivery_timestamp: U256::from(1_800_000_000u64),
            },
        ]
    );
}

#[tokio::test]
async fn immediate_delivery_sends_zero_timestamp() {
    let (client, ledger) = setup(Script::default());
    client.create_gift_card(&request("5")).await.unwrap();

    let Some(Call::Create { delivery_timestamp, .. }) = ledger.calls().pop() else {
        panic!("create was not called");
    };
    assert_eq!(delivery_timestamp, U256::ZERO);
}

#[tokio::test]
async fn missing_event_yields_no_id() {
    let (client, _) = setup(Script { created_id: None, ..Default::default() });
    let result = client.create_gift_card(&request("1")).await.unwrap();
    assert_eq!(result, TransactionResult::new(CREATE_TX));
}

#[tokio::test]
async fn failed_create_reports_dangling_approval() {
    let (client, ledger) = setup(Script { revert_create: true, ..Default::default() });

    let err = client.create_gift_card(&request("10")).await.unwrap_err();
    assert_eq!(err.dangling_approval(), Some(APPROVE_TX));
    let LedgerError::PartialCreate { source, .. } = err else { panic!("expected a partial create") };
    assert!(matches!(*source, LedgerError::Reverted { tx_hash } if tx_hash == CREATE_TX));
    assert_eq!(ledger.calls().len(), 2);
}

#[tokio::test]
async fn reverted_approval_skips_create() {
    let (client, ledger) = setup(Script { revert_approve: true, ..Default::default() });

    let err = client.create_gift_card(&request("10")).await.unwrap_err();
    assert!(matches!(err, LedgerError::Reverted { tx_hash } if tx_hash == APPROVE_TX));
    assert_eq!(ledger.calls(), vec![Call::Approve { spender: FLEXIGIFT, amount: U256::from(10_000_000u64) }]);
}

#[tokio::test]
async fn invalid_requests_never_reach_the_ledger() {
    let (client, ledger) = setup(Script::default());

    let err = client.create_gift_card(&request("0")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(AmountError::NotPositive)));

    let err = client.create_gift_card(&request("ten")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(AmountError::Malformed(_))));

    let mut long = request("1");
    long.message = "é".repeat(MAX_MESSAGE_LEN);
    client.create_gift_card(&long).await.unwrap();
    long.message.push('!');
    let err = client.create_gift_card(&long).await.unwrap_err();
    assert!(matches!(err, LedgerError::MessageTooLong(281)));

    let mut none = request("1");
    none.merchant_indices.clear();
    assert!(matches!(client.create_gift_card(&none).await, Err(LedgerError::NoMerchants)));

    let mut unknown = request("1");
    unknown.merchant_indices.push(U256::from(MERCHANTS));
    let err = client.create_gift_card(&unknown).await.unwrap_err();
    assert!(matches!(err, LedgerError::UnknownMerchant { index, count: MERCHANTS } if index == U256::from(5)));

    // Only the one valid request went through.
    assert_eq!(ledger.calls().len(), 2);
}

#[tokio::test]
async fn disconnected_client_fails_fast() {
    let client = LedgerClient::<MockLedger>::disconnected(MERCHANTS);
    assert!(!client.is_connected());
    let err = client.create_gift_card(&request("1")).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotConnected));
    assert_eq!(err.to_string(), "wallet not connected");
}

#[tokio::test]
async fn overlapping_transactions_are_rejected() {
    let (client, ledger) = setup(Script { gate_approve: true, ..Default::default() });

    let request = request("3");
    let create = client.create_gift_card(&request);
    tokio::pin!(create);
    tokio::select! {
        result = &mut create => panic!("create finished early: {result:?}"),
        () = ledger.approve_entered() => {}
    }

    // Nothing is created while the approval is pending.
    assert_eq!(
        ledger.calls(),
        vec![Call::Approve { spender: FLEXIGIFT, amount: U256::from(3_000_000u64) }]
    );

    let err = client.refund_gift_card(U256::from(1)).await.unwrap_err();
    assert!(matches!(err, LedgerError::Busy));
    // Reads are not serialized.
    assert_eq!(client.usdc_balance(FLEXIGIFT).await, "0.00");

    ledger.release();
    let result = create.await.unwrap();
    assert_eq!(result.gift_card_id, Some(U256::from(42)));

    client.refund_gift_card(U256::from(1)).await.unwrap();
    assert_eq!(ledger.calls().len(), 3);
}
