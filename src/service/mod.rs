//! Service layer: business logic orchestration.
//!
//! [`PoolService`] serializes pool operations, delegates computation to
//! the engine in [`crate::domain`], and emits events through the
//! [`super::domain::EventBus`].

pub mod pool_service;

pub use pool_service::{PoolService, SwapQuote, TokenInfo};
