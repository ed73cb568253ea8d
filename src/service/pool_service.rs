//! Pool service: serializes pool operations and emits events.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::math;
use crate::domain::pool_event::{PoolEvent, PriceChangeReason};
use crate::domain::{
    AssetId, EventBus, LiquidityReceipt, PoolEntry, PoolSnapshot, Principal, SwapDirection,
    SwapReceipt,
};
use crate::error::GatewayError;

/// Dry-run result of a swap against the current reserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    /// Direction the trade would take.
    pub direction: SwapDirection,
    /// Asset sold to the pool.
    pub asset_in: AssetId,
    /// Asset bought from the pool.
    pub asset_out: AssetId,
    /// Amount sold.
    pub amount_in: U256,
    /// Amount that would be received.
    pub amount_out: U256,
    /// Part of `amount_in` withheld as fee.
    pub fee: U256,
    /// Price of `asset_in` in `asset_out` before the trade.
    pub price_before: Option<U256>,
    /// Price of `asset_in` in `asset_out` after the trade.
    pub price_after: Option<U256>,
    /// Relative price move caused by the trade, in basis points.
    pub price_impact_bps: i64,
}

/// Metadata and pool holdings of one of the traded tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token address.
    pub asset: AssetId,
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
    /// Total amount in existence.
    pub total_supply: U256,
    /// Balance held by the pool custody account.
    pub pool_balance: U256,
}

/// Orchestration layer for all pool operations.
///
/// The single [`PoolEntry`] sits behind a [`RwLock`]. Every mutation holds
/// the write lock for its whole duration, so operations never interleave and
/// readers only see committed state. Each mutation follows the pattern:
/// acquire lock, call the engine, update metadata, release, emit events.
#[derive(Debug, Clone)]
pub struct PoolService {
    entry: Arc<RwLock<PoolEntry>>,
    event_bus: EventBus,
}

impl PoolService {
    /// Wraps `entry` and announces the pool on `event_bus`.
    #[must_use]
    pub fn open(entry: PoolEntry, event_bus: EventBus) -> Self {
        let (asset_a, asset_b, creator) = (
            entry.pool.asset_a(),
            entry.pool.asset_b(),
            entry.pool.creator(),
        );
        let _ = event_bus.publish(PoolEvent::PoolCreated {
            asset_a,
            asset_b,
            creator,
            timestamp: entry.created_at,
        });
        tracing::info!(%asset_a, %asset_b, %creator, "pool created");

        Self {
            entry: Arc::new(RwLock::new(entry)),
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Deposits both assets from `caller`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the engine rejection.
    pub async fn add_liquidity(
        &self,
        caller: Principal,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<LiquidityReceipt, GatewayError> {
        let mut guard = self.entry.write().await;
        let entry = &mut *guard;
        let price_before = entry.price_a();

        let receipt = entry
            .pool
            .add_liquidity(&mut entry.ledgers, caller, amount_a, amount_b)
            .inspect_err(|e| tracing::warn!(%caller, error = %e, "add liquidity rejected"))?;

        entry.touch();
        let price_after = entry.price_a();
        drop(guard);

        tracing::info!(
            %caller,
            amount_a = %receipt.amount_a,
            amount_b = %receipt.amount_b,
            "liquidity added"
        );
        let _ = self
            .event_bus
            .publish(PoolEvent::liquidity_added(&receipt, Utc::now()));
        self.publish_price(price_before, price_after, PriceChangeReason::LiquidityAdded);

        Ok(receipt)
    }

    /// Withdraws the given amounts to `caller`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the engine rejection.
    pub async fn remove_liquidity(
        &self,
        caller: Principal,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<LiquidityReceipt, GatewayError> {
        let mut guard = self.entry.write().await;
        let entry = &mut *guard;
        let price_before = entry.price_a();

        let receipt = entry
            .pool
            .remove_liquidity(&mut entry.ledgers, caller, amount_a, amount_b)
            .inspect_err(|e| tracing::warn!(%caller, error = %e, "remove liquidity rejected"))?;

        entry.touch();
        let price_after = entry.price_a();
        drop(guard);

        tracing::info!(
            %caller,
            amount_a = %receipt.amount_a,
            amount_b = %receipt.amount_b,
            "liquidity removed"
        );
        let _ = self
            .event_bus
            .publish(PoolEvent::liquidity_removed(&receipt, Utc::now()));
        self.publish_price(
            price_before,
            price_after,
            PriceChangeReason::LiquidityRemoved,
        );

        Ok(receipt)
    }

    /// Sells `amount_in` of `asset_in` for the other asset.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if `asset_in` is not traded here or the
    /// engine rejects the swap.
    pub async fn swap(
        &self,
        caller: Principal,
        asset_in: AssetId,
        amount_in: U256,
    ) -> Result<SwapReceipt, GatewayError> {
        let mut guard = self.entry.write().await;
        let entry = &mut *guard;
        let direction = SwapDirection::selling(entry.pool.side_of(asset_in)?);
        let price_before = entry.price_a();

        let receipt = entry
            .pool
            .swap(&mut entry.ledgers, caller, direction, amount_in)
            .inspect_err(|e| tracing::warn!(%caller, %asset_in, error = %e, "swap rejected"))?;

        entry.record_swap(direction, amount_in);
        let price_after = entry.price_a();
        drop(guard);

        tracing::info!(
            %caller,
            asset_in = %receipt.asset_in,
            amount_in = %receipt.amount_in,
            amount_out = %receipt.amount_out,
            "tokens swapped"
        );
        let _ = self
            .event_bus
            .publish(PoolEvent::tokens_swapped(&receipt, Utc::now()));
        self.publish_price(price_before, price_after, PriceChangeReason::SwapExecuted);

        Ok(receipt)
    }

    /// Computes what selling `amount_in` of `asset_in` would yield, without
    /// touching any state.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`PoolService::swap`].
    pub async fn quote(&self, asset_in: AssetId, amount_in: U256) -> Result<SwapQuote, GatewayError> {
        let entry = self.entry.read().await;
        let pool = &entry.pool;
        let input = pool.side_of(asset_in)?;
        let direction = SwapDirection::selling(input);
        let amount_out = pool.quote(direction, amount_in)?;

        let reserve_in = pool.reserve(input);
        let reserve_out = pool.reserve(input.other());
        let price_before = math::spot_price(reserve_in, reserve_out)?;
        let price_after = match (
            reserve_in.checked_add(amount_in),
            reserve_out.checked_sub(amount_out),
        ) {
            (Some(r_in), Some(r_out)) => math::spot_price(r_in, r_out)?,
            _ => None,
        };
        let price_impact_bps = match (price_before, price_after) {
            (Some(before), Some(after)) => math::price_change_bps(before, after),
            _ => 0,
        };

        Ok(SwapQuote {
            direction,
            asset_in,
            asset_out: pool.asset(input.other()),
            amount_in,
            amount_out,
            fee: math::fee_amount(amount_in),
            price_before,
            price_after,
            price_impact_bps,
        })
    }

    /// Price of `asset` in the other asset, scaled by [`math::SCALE`].
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the asset is unknown or the pool is
    /// empty on that side.
    pub async fn price(&self, asset: AssetId) -> Result<U256, GatewayError> {
        let entry = self.entry.read().await;
        Ok(entry.pool.get_price(asset)?)
    }

    /// Current reserves of asset A and asset B.
    pub async fn reserves(&self) -> (U256, U256) {
        let entry = self.entry.read().await;
        (entry.pool.reserve_a(), entry.pool.reserve_b())
    }

    /// Read-only view of the pool and its metadata.
    pub async fn snapshot(&self) -> PoolSnapshot {
        let entry = self.entry.read().await;
        PoolSnapshot::from(&*entry)
    }

    /// Metadata of one of the pool's tokens.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Pool`] if `asset` is not traded here.
    pub async fn token_info(&self, asset: AssetId) -> Result<TokenInfo, GatewayError> {
        let entry = self.entry.read().await;
        let ledger = entry.ledgers.get(entry.pool.side_of(asset)?);
        Ok(TokenInfo {
            asset,
            name: ledger.name().to_string(),
            symbol: ledger.symbol().to_string(),
            decimals: ledger.decimals(),
            total_supply: ledger.total_supply(),
            pool_balance: ledger.balance_of(entry.pool.custodian()),
        })
    }

    /// Balance of `owner` and its allowance towards the pool.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Pool`] if `asset` is not traded here.
    pub async fn balance_of(
        &self,
        asset: AssetId,
        owner: Address,
    ) -> Result<(U256, U256), GatewayError> {
        let entry = self.entry.read().await;
        let ledger = entry.ledgers.get(entry.pool.side_of(asset)?);
        Ok((
            ledger.balance_of(owner),
            ledger.allowance(owner, entry.pool.custodian()),
        ))
    }

    /// Lets `spender` (the pool custody account when `None`) move up to
    /// `amount` of `caller`'s `asset`. Returns the spender.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the caller is the custody account, the
    /// asset is unknown or the ledger refuses the approval.
    pub async fn approve(
        &self,
        caller: Principal,
        asset: AssetId,
        spender: Option<Address>,
        amount: U256,
    ) -> Result<Address, GatewayError> {
        let mut guard = self.entry.write().await;
        let entry = &mut *guard;
        entry.pool.check_caller(caller)?;
        let spender = spender.unwrap_or_else(|| entry.pool.custodian());
        let side = entry.pool.side_of(asset)?;
        entry.ledgers.get_mut(side).approve(caller, spender, amount)?;
        drop(guard);

        tracing::info!(%caller, %asset, %spender, %amount, "allowance set");
        Ok(spender)
    }

    /// Moves `amount` of `asset` from `caller` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the caller is the custody account, the
    /// asset is unknown or the ledger rejects the transfer.
    pub async fn transfer_tokens(
        &self,
        caller: Principal,
        asset: AssetId,
        recipient: Address,
        amount: U256,
    ) -> Result<(), GatewayError> {
        let mut guard = self.entry.write().await;
        let entry = &mut *guard;
        entry.pool.check_caller(caller)?;
        let side = entry.pool.side_of(asset)?;
        entry
            .ledgers
            .get_mut(side)
            .transfer(caller, recipient, amount)
            .inspect_err(|e| tracing::warn!(%caller, %asset, error = %e, "transfer rejected"))?;
        drop(guard);

        tracing::info!(%caller, %asset, %recipient, %amount, "tokens transferred");
        Ok(())
    }

    fn publish_price(&self, old: Option<U256>, new: Option<U256>, reason: PriceChangeReason) {
        let price_change_bps = match (old, new) {
            (Some(old), Some(new)) => math::price_change_bps(old, new),
            _ => 0,
        };
        let _ = self.event_bus.publish(PoolEvent::PriceUpdated {
            old_price: old.map(|p| p.to_string()),
            new_price: new.map(|p| p.to_string()),
            price_change_bps,
            reason,
            timestamp: Utc::now(),
        });
    }
}
