//! # simple-dex
//!
//! Two-asset constant-product liquidity pool with a 0.3% swap fee, hosted
//! behind a REST API and a WebSocket event feed.
//!
//! The pool engine in [`domain`] owns only the reserve state. Balances live
//! in two [`domain::BalanceLedger`]s; every operation stages its transfers
//! in a settlement journal and commits new reserves only after all of them
//! succeed, so a rejected operation changes nothing.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── PoolService (service/)      one RwLock = one transaction
//!     ├── EventBus (domain/)
//!     │
//!     ├── Pool engine (domain/pool)   x · y = k, fee 997/1000
//!     ├── Settlement (domain/)
//!     │
//!     └── BalanceLedger × 2           in-memory ERC-20 style tokens
//! ```
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use simple_dex::domain::{BalanceLedger, LedgerPair, Pool, TokenLedger};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (a, b) = (Address::repeat_byte(0xaa), Address::repeat_byte(0xbb));
//! let (alice, custody) = (Address::repeat_byte(0x01), Address::repeat_byte(0x0f));
//!
//! let mut token_a = TokenLedger::new(a, "TokenA", "TKA");
//! let mut token_b = TokenLedger::new(b, "TokenB", "TKB");
//! token_a.mint(alice, U256::from(1_000u64))?;
//! token_b.mint(alice, U256::from(1_000u64))?;
//! token_a.approve(alice, custody, U256::MAX)?;
//! token_b.approve(alice, custody, U256::MAX)?;
//! let mut ledgers = LedgerPair::new(Box::new(token_a), Box::new(token_b));
//!
//! let mut pool = Pool::create(a, b, alice, custody)?;
//! pool.add_liquidity(&mut ledgers, alice, U256::from(100u64), U256::from(200u64))?;
//! let receipt = pool.swap_a_for_b(&mut ledgers, alice, U256::from(10u64))?;
//! assert_eq!(receipt.amount_out, U256::from(18u64));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
