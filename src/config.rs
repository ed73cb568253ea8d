//! Host configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset variables fall back to the
//! defaults below; malformed addresses and amounts abort startup.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, U256, address};
use anyhow::{Context, bail};

/// Default address of the first token.
pub const DEFAULT_TOKEN_A: Address = address!("0x00000000000000000000000000000000000000a1");
/// Default address of the second token.
pub const DEFAULT_TOKEN_B: Address = address!("0x00000000000000000000000000000000000000b1");
/// Default pool custody account.
pub const DEFAULT_POOL_ADDRESS: Address = address!("0x00000000000000000000000000000000000000d0");
/// Default pool creator, who also receives the initial token supply.
pub const DEFAULT_CREATOR: Address = address!("0x00000000000000000000000000000000000000c0");

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format {other:?}, expected \"text\" or \"json\""),
        }
    }
}

/// Name, symbol and address of one pool token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Token address.
    pub address: Address,
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
}

/// Top-level host configuration.
///
/// Loaded once at startup via [`DexConfig::from_env`].
#[derive(Debug, Clone)]
pub struct DexConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// First pool token.
    pub token_a: TokenConfig,

    /// Second pool token.
    pub token_b: TokenConfig,

    /// Account holding the pool's balances.
    pub pool_address: Address,

    /// Principal recorded as pool creator and minted the initial supply.
    pub creator: Address,

    /// Amount of each token minted to the creator, in smallest units.
    pub initial_supply: U256,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Upper bound on the time spent serving one HTTP request.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            token_a: TokenConfig {
                address: DEFAULT_TOKEN_A,
                name: "TokenA".to_string(),
                symbol: "TKA".to_string(),
            },
            token_b: TokenConfig {
                address: DEFAULT_TOKEN_B,
                name: "TokenB".to_string(),
                symbol: "TKB".to_string(),
            },
            pool_address: DEFAULT_POOL_ADDRESS,
            creator: DEFAULT_CREATOR,
            initial_supply: default_initial_supply(),
            event_bus_capacity: 10_000,
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Text,
        }
    }
}

impl DexConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = parse_or(&lookup, "LISTEN_ADDR", defaults.listen_addr)?;
        let token_a = TokenConfig {
            address: parse_or(&lookup, "TOKEN_A_ADDRESS", defaults.token_a.address)?,
            name: lookup("TOKEN_A_NAME").unwrap_or(defaults.token_a.name),
            symbol: lookup("TOKEN_A_SYMBOL").unwrap_or(defaults.token_a.symbol),
        };
        let token_b = TokenConfig {
            address: parse_or(&lookup, "TOKEN_B_ADDRESS", defaults.token_b.address)?,
            name: lookup("TOKEN_B_NAME").unwrap_or(defaults.token_b.name),
            symbol: lookup("TOKEN_B_SYMBOL").unwrap_or(defaults.token_b.symbol),
        };
        let pool_address = parse_or(&lookup, "POOL_ADDRESS", defaults.pool_address)?;
        let creator = parse_or(&lookup, "POOL_CREATOR", defaults.creator)?;
        let initial_supply = parse_or(&lookup, "TOKEN_INITIAL_SUPPLY", defaults.initial_supply)?;
        let event_bus_capacity =
            parse_or(&lookup, "EVENT_BUS_CAPACITY", defaults.event_bus_capacity)?;
        let request_timeout = Duration::from_secs(parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?);
        let log_format = parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?;

        if token_a.address == token_b.address {
            bail!(
                "TOKEN_A_ADDRESS and TOKEN_B_ADDRESS must differ, both are {}",
                token_a.address
            );
        }
        if creator == pool_address {
            bail!("POOL_CREATOR must differ from the custody account POOL_ADDRESS");
        }
        if request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT_SECS must be positive");
        }

        Ok(Self {
            listen_addr,
            token_a,
            token_b,
            pool_address,
            creator,
            initial_supply,
            event_bus_capacity,
            request_timeout,
            log_format,
        })
    }
}

/// 1,000,000 whole tokens at 18 decimals.
fn default_initial_supply() -> U256 {
    U256::from(1_000_000u64) * U256::from(10u64).pow(U256::from(18u64))
}

/// Parses `key` as `T` when present, returning `default` when unset.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
