//! Observable records emitted after pool state mutations.
//!
//! Every committed operation emits a [`PoolEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::pool::{LiquidityReceipt, SwapReceipt};

/// Reason why a price update occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceChangeReason {
    /// Price changed due to a swap execution.
    SwapExecuted,
    /// Price changed due to liquidity being added.
    LiquidityAdded,
    /// Price changed due to liquidity being removed.
    LiquidityRemoved,
}

/// Domain event emitted after every committed mutation.
///
/// Amounts are stored as decimal `String`s to preserve 256-bit precision
/// when serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PoolEvent {
    /// Emitted once when the pool is created.
    PoolCreated {
        /// First traded asset.
        asset_a: Address,
        /// Second traded asset.
        asset_b: Address,
        /// Principal that created the pool.
        creator: Address,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after liquidity is added.
    LiquidityAdded {
        /// Depositing principal.
        caller: Address,
        /// Amount of asset A deposited.
        amount_a: String,
        /// Amount of asset B deposited.
        amount_b: String,
        /// Reserve of asset A after the deposit.
        reserve_a: String,
        /// Reserve of asset B after the deposit.
        reserve_b: String,
        /// Timestamp of the change.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after liquidity is removed.
    LiquidityRemoved {
        /// Withdrawing principal.
        caller: Address,
        /// Amount of asset A withdrawn.
        amount_a: String,
        /// Amount of asset B withdrawn.
        amount_b: String,
        /// Reserve of asset A after the withdrawal.
        reserve_a: String,
        /// Reserve of asset B after the withdrawal.
        reserve_b: String,
        /// Timestamp of the change.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful swap.
    TokensSwapped {
        /// Swapping principal.
        caller: Address,
        /// Asset sold to the pool.
        asset_in: Address,
        /// Input amount (string-encoded U256).
        amount_in: String,
        /// Asset bought from the pool.
        asset_out: Address,
        /// Output amount (string-encoded U256).
        amount_out: String,
        /// Fee withheld from the input.
        fee: String,
        /// Execution timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after any operation that moves the price of asset A.
    PriceUpdated {
        /// Price of asset A in asset B before the operation, if defined.
        old_price: Option<String>,
        /// Price of asset A in asset B after the operation, if defined.
        new_price: Option<String>,
        /// Price change in basis points.
        price_change_bps: i64,
        /// Why the price changed.
        reason: PriceChangeReason,
        /// Timestamp of the price update.
        timestamp: DateTime<Utc>,
    },
}

impl PoolEvent {
    /// Builds a `LiquidityAdded` event from a receipt.
    #[must_use]
    pub fn liquidity_added(receipt: &LiquidityReceipt, timestamp: DateTime<Utc>) -> Self {
        Self::LiquidityAdded {
            caller: receipt.caller,
            amount_a: receipt.amount_a.to_string(),
            amount_b: receipt.amount_b.to_string(),
            reserve_a: receipt.reserve_a.to_string(),
            reserve_b: receipt.reserve_b.to_string(),
            timestamp,
        }
    }

    /// Builds a `LiquidityRemoved` event from a receipt.
    #[must_use]
    pub fn liquidity_removed(receipt: &LiquidityReceipt, timestamp: DateTime<Utc>) -> Self {
        Self::LiquidityRemoved {
            caller: receipt.caller,
            amount_a: receipt.amount_a.to_string(),
            amount_b: receipt.amount_b.to_string(),
            reserve_a: receipt.reserve_a.to_string(),
            reserve_b: receipt.reserve_b.to_string(),
            timestamp,
        }
    }

    /// Builds a `TokensSwapped` event from a receipt.
    #[must_use]
    pub fn tokens_swapped(receipt: &SwapReceipt, timestamp: DateTime<Utc>) -> Self {
        Self::TokensSwapped {
            caller: receipt.caller,
            asset_in: receipt.asset_in,
            amount_in: receipt.amount_in.to_string(),
            asset_out: receipt.asset_out,
            amount_out: receipt.amount_out.to_string(),
            fee: receipt.fee.to_string(),
            timestamp,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::LiquidityAdded { .. } => "liquidity_added",
            Self::LiquidityRemoved { .. } => "liquidity_removed",
            Self::TokensSwapped { .. } => "tokens_swapped",
            Self::PriceUpdated { .. } => "price_updated",
        }
    }

    /// Returns the event timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::PoolCreated { timestamp, .. }
            | Self::LiquidityAdded { timestamp, .. }
            | Self::LiquidityRemoved { timestamp, .. }
            | Self::TokensSwapped { timestamp, .. }
            | Self::PriceUpdated { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    fn swap_receipt() -> SwapReceipt {
        SwapReceipt {
            caller: Address::repeat_byte(0x02),
            asset_in: Address::repeat_byte(0xaa),
            amount_in: U256::from(10u64),
            asset_out: Address::repeat_byte(0xbb),
            amount_out: U256::from(18u64),
            fee: U256::from(1u64),
            reserve_a: U256::from(110u64),
            reserve_b: U256::from(182u64),
        }
    }

    #[test]
    fn pool_created_event_type() {
        let event = PoolEvent::PoolCreated {
            asset_a: Address::repeat_byte(0xaa),
            asset_b: Address::repeat_byte(0xbb),
            creator: Address::repeat_byte(0x01),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "pool_created");
    }

    #[test]
    fn tokens_swapped_serializes_decimal_amounts() {
        let event = PoolEvent::tokens_swapped(&swap_receipt(), Utc::now());
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("\"event_type\":\"tokens_swapped\""));
        assert!(json_str.contains("\"amount_out\":\"18\""));
        assert!(
            json_str
                .to_lowercase()
                .contains("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        );
    }

    #[test]
    fn liquidity_events_carry_reserves() {
        let receipt = LiquidityReceipt {
            caller: Address::repeat_byte(0x01),
            amount_a: U256::from(100u64),
            amount_b: U256::from(200u64),
            reserve_a: U256::from(100u64),
            reserve_b: U256::from(200u64),
        };
        let now = Utc::now();
        let added = PoolEvent::liquidity_added(&receipt, now);
        let removed = PoolEvent::liquidity_removed(&receipt, now);
        assert_eq!(added.event_type_str(), "liquidity_added");
        assert_eq!(removed.event_type_str(), "liquidity_removed");
        assert_eq!(removed.timestamp(), now);

        let value = serde_json::to_value(&added).unwrap_or_default();
        assert_eq!(value.get("reserve_b").and_then(|v| v.as_str()), Some("200"));
    }
}
