//! Domain layer: pool engine, ledgers, settlement, and event system.
//!
//! This module contains the constant-product pool engine, the balance
//! ledger seam and its in-memory token implementation, the settlement
//! journal that keeps every operation fail-atomic, and the event bus that
//! broadcasts committed state changes.

pub mod event_bus;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod pool_entry;
pub mod pool_event;
pub mod settlement;
pub mod token_ledger;

pub use event_bus::{EventBus, EventFeed, FeedItem, SequencedEvent};
pub use ledger::{AssetId, BalanceLedger, LedgerPair, PoolSide, Principal};
pub use pool::{LiquidityReceipt, Pool, SwapDirection, SwapReceipt};
pub use pool_entry::{PoolEntry, PoolSnapshot};
pub use pool_event::PoolEvent;
pub use token_ledger::TokenLedger;
