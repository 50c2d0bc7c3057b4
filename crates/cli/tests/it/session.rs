use alloy_primitives::{Address, address};
use flexigift_cli::{
    cmd::Context,
    opts::{RpcOpts, WalletArgs},
};
use flexigift_config::{ARBITRUM_SEPOLIA_CHAIN_ID, figment::Jail};
use flexigift_ledger::LedgerError;
use flexigift_wallets::{SessionError, WalletOpts};
use similar_asserts::assert_eq;

const PK: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ADDR: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

fn args(private_key: Option<&str>) -> WalletArgs {
    WalletArgs {
        // Nothing listens there: every RPC call fails fast.
        rpc: RpcOpts { url: Some("http://127.0.0.1:1".to_string()), ..Default::default() },
        wallet: WalletOpts { private_key: private_key.map(str::to_string), ..Default::default() },
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
}

#[test]
fn connects_local_wallet() {
    Jail::expect_with(|_| {
        block_on(async {
            let ctx = Context::connect(&args(Some(PK))).await.unwrap();
            assert_eq!(ctx.address(), Some(ADDR));

            let state = ctx.session.state();
            assert!(state.is_connected());
            assert_eq!(state.chain_id, Some(ARBITRUM_SEPOLIA_CHAIN_ID));
            assert!(ctx.client.is_connected());

            // The node is unreachable.
            assert_eq!(ctx.client.usdc_balance(ADDR).await, "0.00");
            let err = ctx.client.get_gift_card(alloy_primitives::U256::from(1)).await.unwrap_err();
            assert!(!matches!(err, LedgerError::NotConnected), "{err}");
        });
        Ok(())
    });
}

#[test]
fn missing_wallet_points_to_install_page() {
    Jail::expect_with(|_| {
        block_on(async {
            let err = Context::connect(&args(None)).await.err().unwrap();
            let err = err.downcast::<SessionError>().unwrap();
            assert_eq!(
                err,
                SessionError::ProviderMissing {
                    install_url: "https://metamask.io/download/".to_string()
                }
            );
        });
        Ok(())
    });
}
