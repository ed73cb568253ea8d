//! Liquidity operation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::LiquidityReceipt;

/// Request body for `POST /pool/liquidity/add` and
/// `POST /pool/liquidity/remove`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LiquidityRequest {
    /// Amount of asset A (string-encoded U256).
    pub amount_a: String,
    /// Amount of asset B (string-encoded U256).
    pub amount_b: String,
}

/// Response body for both liquidity operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct LiquidityResponse {
    /// Principal that moved the liquidity.
    pub caller: String,
    /// Amount of asset A moved.
    pub amount_a: String,
    /// Amount of asset B moved.
    pub amount_b: String,
    /// Reserve of asset A afterwards.
    pub reserve_a: String,
    /// Reserve of asset B afterwards.
    pub reserve_b: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

impl From<LiquidityReceipt> for LiquidityResponse {
    fn from(receipt: LiquidityReceipt) -> Self {
        Self {
            caller: receipt.caller.to_string(),
            amount_a: receipt.amount_a.to_string(),
            amount_b: receipt.amount_b.to_string(),
            reserve_a: receipt.reserve_a.to_string(),
            reserve_b: receipt.reserve_b.to_string(),
            executed_at: Utc::now(),
        }
    }
}
