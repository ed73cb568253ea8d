//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::config::{DexConfig, TokenConfig};
use crate::domain::{EventBus, LedgerPair, Pool, PoolEntry, TokenLedger};
use crate::service::PoolService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pool service for all business logic.
    pub pool_service: Arc<PoolService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Per-request timeout applied to the REST routes.
    pub request_timeout: Duration,
}

impl AppState {
    /// Bootstraps the two token ledgers and the pool described by `config`.
    ///
    /// The creator receives `config.initial_supply` of each token.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokens cannot be minted or the pool
    /// parameters are invalid.
    pub fn from_config(config: &DexConfig) -> anyhow::Result<Self> {
        let token_a = mint_token(&config.token_a, config)?;
        let token_b = mint_token(&config.token_b, config)?;

        let pool = Pool::create(
            config.token_a.address,
            config.token_b.address,
            config.creator,
            config.pool_address,
        )
        .context("invalid pool parameters")?;
        let entry = PoolEntry::new(pool, LedgerPair::new(Box::new(token_a), Box::new(token_b)))
            .context("ledgers do not match pool assets")?;

        let event_bus = EventBus::new(config.event_bus_capacity);
        let pool_service = Arc::new(PoolService::open(entry, event_bus.clone()));

        Ok(Self {
            pool_service,
            event_bus,
            request_timeout: config.request_timeout,
        })
    }
}

fn mint_token(token: &TokenConfig, config: &DexConfig) -> anyhow::Result<TokenLedger> {
    let mut ledger = TokenLedger::new(token.address, &token.name, &token.symbol);
    ledger
        .mint(config.creator, config.initial_supply)
        .with_context(|| format!("minting initial {} supply", token.symbol))?;
    Ok(ledger)
}
