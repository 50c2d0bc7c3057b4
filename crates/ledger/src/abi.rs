//! Solidity bindings for the contracts the client calls.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    interface IFlexiGift {
        #[derive(Debug, PartialEq, Eq)]
        struct GiftCard {
            uint256 id;
            address giver;
            uint256 amount;
            uint256 remainingBalance;
            uint256 expiryTimestamp;
            bool isActive;
            uint256 createdAt;
            string message;
            uint256 deliveryTimestamp;
            bool isDelivered;
        }

        function createGiftCard(
            uint256 amount,
            uint256 expiryDays,
            uint256[] memory merchantIndices,
            string memory message,
            uint256 deliveryTimestamp
        ) external returns (uint256);
        function redeemGiftCard(uint256 giftCardId, uint256 amount, uint256 merchantIndex) external;
        function refundGiftCard(uint256 giftCardId) external;
        function deliverGiftCard(uint256 giftCardId) external;
        function cancelScheduledDelivery(uint256 giftCardId) external;
        function getGiftCard(uint256 giftCardId) external view returns (GiftCard memory);
        function getMerchantName(uint256 merchantId) external view returns (string memory);

        #[derive(Debug, PartialEq, Eq)]
        event GiftCardCreated(
            uint256 indexed giftCardId,
            address indexed giver,
            uint256 amount,
            uint256 expiryTimestamp,
            string message,
            uint256 deliveryTimestamp
        );
        #[derive(Debug, PartialEq, Eq)]
        event GiftCardRedeemed(
            uint256 indexed giftCardId,
            address indexed recipient,
            uint256 amount,
            uint256 remainingBalance
        );
        #[derive(Debug, PartialEq, Eq)]
        event GiftCardRefunded(uint256 indexed giftCardId, address indexed giver, uint256 refundAmount);
        #[derive(Debug, PartialEq, Eq)]
        event GiftCardDelivered(uint256 indexed giftCardId, uint256 deliveredAt);
        #[derive(Debug, PartialEq, Eq)]
        event ScheduledDeliveryCancelled(uint256 indexed giftCardId, address indexed giver);
    }

    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}
