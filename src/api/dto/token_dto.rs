//! Token ledger DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::TokenInfo;

/// Response body for `GET /tokens/{asset}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Token address.
    pub address: String,
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
    /// Total supply (string-encoded).
    pub total_supply: String,
    /// Balance held by the pool (string-encoded).
    pub pool_balance: String,
}

impl From<TokenInfo> for TokenResponse {
    fn from(info: TokenInfo) -> Self {
        Self {
            address: info.asset.to_string(),
            name: info.name,
            symbol: info.symbol,
            decimals: info.decimals,
            total_supply: info.total_supply.to_string(),
            pool_balance: info.pool_balance.to_string(),
        }
    }
}

/// Response body for `GET /tokens/{asset}/balances/{owner}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Token address.
    pub asset: String,
    /// Account queried.
    pub owner: String,
    /// Balance (string-encoded).
    pub balance: String,
    /// Amount the pool may still pull from `owner`.
    pub pool_allowance: String,
}

/// Request body for `POST /tokens/{asset}/approve`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveRequest {
    /// Account allowed to spend; defaults to the pool.
    #[serde(default)]
    pub spender: Option<String>,
    /// New allowance (string-encoded U256).
    pub amount: String,
}

/// Response body for `POST /tokens/{asset}/approve`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApproveResponse {
    /// Token address.
    pub asset: String,
    /// Approving account.
    pub owner: String,
    /// Authorized spender.
    pub spender: String,
    /// Allowance granted.
    pub amount: String,
}

/// Request body for `POST /tokens/{asset}/transfer`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Receiving account.
    pub to: String,
    /// Amount (string-encoded U256).
    pub amount: String,
}

/// Response body for `POST /tokens/{asset}/transfer`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    /// Token address.
    pub asset: String,
    /// Sending account.
    pub from: String,
    /// Receiving account.
    pub to: String,
    /// Amount moved.
    pub amount: String,
}
