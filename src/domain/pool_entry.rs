//! Pool entry combining the engine state with its ledgers and metadata.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::ledger::LedgerPair;
use super::pool::{Pool, SwapDirection};
use crate::error::PoolError;

/// Aggregate wrapping a [`Pool`] with the ledgers it settles against and
/// host-side metadata.
///
/// The `pool` field holds the live reserve state. The remaining fields
/// track operational metadata and are updated by the service after every
/// committed mutation.
#[derive(Debug)]
pub struct PoolEntry {
    /// The pool engine state.
    pub pool: Pool,

    /// Balance ledgers for asset A and asset B.
    pub ledgers: LedgerPair,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,

    /// Timestamp of last state mutation.
    pub last_modified_at: DateTime<Utc>,

    /// Number of swaps executed on this pool.
    pub swap_count: u64,

    /// Cumulative amount of asset A sold to the pool.
    pub volume_a: U256,

    /// Cumulative amount of asset B sold to the pool.
    pub volume_b: U256,
}

impl PoolEntry {
    /// Binds `pool` to `ledgers`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidAsset`] if the ledgers do not account for
    /// the pool's assets on the matching sides.
    pub fn new(pool: Pool, ledgers: LedgerPair) -> Result<Self, PoolError> {
        pool.check_ledgers(&ledgers)?;
        let now = Utc::now();
        Ok(Self {
            pool,
            ledgers,
            created_at: now,
            last_modified_at: now,
            swap_count: 0,
            volume_a: U256::ZERO,
            volume_b: U256::ZERO,
        })
    }

    /// Records a committed swap of `amount_in` in `direction`.
    pub fn record_swap(&mut self, direction: SwapDirection, amount_in: U256) {
        self.swap_count = self.swap_count.saturating_add(1);
        match direction {
            SwapDirection::AToB => self.volume_a = self.volume_a.saturating_add(amount_in),
            SwapDirection::BToA => self.volume_b = self.volume_b.saturating_add(amount_in),
        }
        self.touch();
    }

    /// Marks the entry as modified now.
    pub fn touch(&mut self) {
        self.last_modified_at = Utc::now();
    }

    /// Price of asset A in asset B, or `None` while it is undefined.
    #[must_use]
    pub fn price_a(&self) -> Option<U256> {
        self.pool.get_price(self.pool.asset_a()).ok()
    }
}

/// Read-only view of the pool, for query endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PoolSnapshot {
    /// First traded asset.
    #[schema(value_type = String)]
    pub asset_a: Address,
    /// Second traded asset.
    #[schema(value_type = String)]
    pub asset_b: Address,
    /// Principal that created the pool.
    #[schema(value_type = String)]
    pub creator: Address,
    /// Account holding the pool's balances.
    #[schema(value_type = String)]
    pub custodian: Address,
    /// Reserve of asset A (string-encoded U256).
    pub reserve_a: String,
    /// Reserve of asset B (string-encoded U256).
    pub reserve_b: String,
    /// Price of asset A in asset B scaled by 10^18, if defined.
    pub price_a: Option<String>,
    /// Price of asset B in asset A scaled by 10^18, if defined.
    pub price_b: Option<String>,
    /// Product of the reserves.
    pub k: String,
    /// Number of swaps executed.
    pub swap_count: u64,
    /// Cumulative asset A sold to the pool.
    pub volume_a: String,
    /// Cumulative asset B sold to the pool.
    pub volume_b: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub last_modified_at: DateTime<Utc>,
}

impl From<&PoolEntry> for PoolSnapshot {
    fn from(entry: &PoolEntry) -> Self {
        let pool = &entry.pool;
        let price = |asset| pool.get_price(asset).ok().map(|p| p.to_string());
        Self {
            asset_a: pool.asset_a(),
            asset_b: pool.asset_b(),
            creator: pool.creator(),
            custodian: pool.custodian(),
            reserve_a: pool.reserve_a().to_string(),
            reserve_b: pool.reserve_b().to_string(),
            price_a: price(pool.asset_a()),
            price_b: price(pool.asset_b()),
            k: pool.k().to_string(),
            swap_count: entry.swap_count,
            volume_a: entry.volume_a.to_string(),
            volume_b: entry.volume_b.to_string(),
            created_at: entry.created_at,
            last_modified_at: entry.last_modified_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::token_ledger::TokenLedger;

    fn make_entry() -> PoolEntry {
        let a = Address::repeat_byte(0xaa);
        let b = Address::repeat_byte(0xbb);
        let Ok(pool) = Pool::create(a, b, Address::repeat_byte(0x01), Address::repeat_byte(0x0f))
        else {
            panic!("valid pool");
        };
        let ledgers = LedgerPair::new(
            Box::new(TokenLedger::new(a, "TokenA", "TKA")),
            Box::new(TokenLedger::new(b, "TokenB", "TKB")),
        );
        let Ok(entry) = PoolEntry::new(pool, ledgers) else {
            panic!("valid entry");
        };
        entry
    }

    #[test]
    fn new_entry_has_no_activity() {
        let entry = make_entry();
        assert_eq!(entry.swap_count, 0);
        assert_eq!(entry.created_at, entry.last_modified_at);
        assert_eq!(entry.price_a(), None);
    }

    #[test]
    fn record_swap_tracks_volume_per_asset() {
        let mut entry = make_entry();
        entry.record_swap(SwapDirection::AToB, U256::from(10u64));
        entry.record_swap(SwapDirection::BToA, U256::from(4u64));
        entry.record_swap(SwapDirection::AToB, U256::from(5u64));
        assert_eq!(entry.swap_count, 3);
        assert_eq!(entry.volume_a, U256::from(15u64));
        assert_eq!(entry.volume_b, U256::from(4u64));
        assert!(entry.last_modified_at >= entry.created_at);
    }

    #[test]
    fn snapshot_of_empty_pool_has_no_prices() {
        let entry = make_entry();
        let snapshot = PoolSnapshot::from(&entry);
        assert_eq!(snapshot.reserve_a, "0");
        assert_eq!(snapshot.k, "0");
        assert!(snapshot.price_a.is_none());
        assert!(snapshot.price_b.is_none());
    }
}
