use crate::{
    abi::{IERC20, IFlexiGift},
    error::Result,
    types::SubmittedTx,
};
use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use async_trait::async_trait;
use flexigift_config::ContractAddresses;

/// The raw on-chain surface of the gift card contract and its payment token.
///
/// Every state-changing call resolves once the transaction is mined.
#[async_trait]
pub trait GiftCardLedger: Send + Sync {
    /// Address of the gift card contract, which spends the approved USDC.
    fn gift_card_address(&self) -> Address;

    async fn approve(&self, spender: Address, amount: U256) -> Result<SubmittedTx>;

    async fn create_gift_card(
        &self,
        amount: U256,
        expiry_days: U256,
        merchant_indices: Vec<U256>,
        message: String,
        delivery_timestamp: U256,
    ) -> Result<SubmittedTx>;

    async fn redeem_gift_card(
        &self,
        id: U256,
        amount: U256,
        merchant_index: U256,
    ) -> Result<SubmittedTx>;

    async fn refund_gift_card(&self, id: U256) -> Result<SubmittedTx>;

    async fn deliver_gift_card(&self, id: U256) -> Result<SubmittedTx>;

    async fn cancel_scheduled_delivery(&self, id: U256) -> Result<SubmittedTx>;

    async fn gift_card(&self, id: U256) -> Result<IFlexiGift::GiftCard>;

    async fn usdc_balance(&self, owner: Address) -> Result<U256>;

    async fn merchant_name(&self, index: U256) -> Result<String>;
}

/// [`GiftCardLedger`] backed by an alloy [`Provider`].
///
/// The provider must carry a wallet for the state-changing calls to be signed.
#[derive(Clone, Debug)]
pub struct AlloyLedger<P> {
    flexigift: IFlexiGift::IFlexiGiftInstance<P>,
    usdc: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> AlloyLedger<P> {
    pub fn new(provider: P, flexigift: Address, usdc: Address) -> Self {
        Self {
            flexigift: IFlexiGift::new(flexigift, provider.clone()),
            usdc: IERC20::new(usdc, provider),
        }
    }

    /// Binds the contracts configured in `contracts`.
    pub fn from_contracts(provider: P, contracts: &ContractAddresses) -> Self {
        Self::new(provider, contracts.flexigift, contracts.usdc)
    }

    pub fn usdc_address(&self) -> Address {
        *self.usdc.address()
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> GiftCardLedger for AlloyLedger<P> {
    fn gift_card_address(&self) -> Address {
        *self.flexigift.address()
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<SubmittedTx> {
        let pending = self.usdc.approve(spender, amount).send().await?;
        confirm("approve", pending).await
    }

    async fn create_gift_card(
        &self,
        amount: U256,
        expiry_days: U256,
        merchant_indices: Vec<U256>,
        message: String,
        delivery_timestamp: U256,
    ) -> Result<SubmittedTx> {
        let pending = self
            .flexigift
            .createGiftCard(amount, expiry_days, merchant_indices, message, delivery_timestamp)
            .send()
            .await?;
        confirm("createGiftCard", pending).await
    }

    async fn redeem_gift_card(
        &self,
        id: U256,
        amount: U256,
        merchant_index: U256,
    ) -> Result<SubmittedTx> {
        let pending = self.flexigift.redeemGiftCard(id, amount, merchant_index).send().await?;
        confirm("redeemGiftCard", pending).await
    }

    async fn refund_gift_card(&self, id: U256) -> Result<SubmittedTx> {
        let pending = self.flexigift.refundGiftCard(id).send().await?;
        confirm("refundGiftCard", pending).await
    }

    async fn deliver_gift_card(&self, id: U256) -> Result<SubmittedTx> {
        let pending = self.flexigift.deliverGiftCard(id).send().await?;
        confirm("deliverGiftCard", pending).await
    }

    async fn cancel_scheduled_delivery(&self, id: U256) -> Result<SubmittedTx> {
        let pending = self.flexigift.cancelScheduledDelivery(id).send().await?;
        confirm("cancelScheduledDelivery", pending).await
    }

    async fn gift_card(&self, id: U256) -> Result<IFlexiGift::GiftCard> {
        Ok(self.flexigift.getGiftCard(id).call().await?)
    }

    async fn usdc_balance(&self, owner: Address) -> Result<U256> {
        Ok(self.usdc.balanceOf(owner).call().await?)
    }

    async fn merchant_name(&self, index: U256) -> Result<String> {
        Ok(self.flexigift.getMerchantName(index).call().await?)
    }
}

async fn confirm(
    function: &'static str,
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<SubmittedTx> {
    debug!(function, tx_hash = %pending.tx_hash(), "transaction submitted");
    let receipt = pending.get_receipt().await?;
    trace!(?receipt, "transaction mined");
    Ok(SubmittedTx {
        hash: receipt.transaction_hash,
        success: receipt.status(),
        logs: receipt.inner.logs().iter().map(|log| log.inner.clone()).collect(),
    })
}
