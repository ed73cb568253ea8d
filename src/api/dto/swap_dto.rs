//! Swap and quote DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SwapReceipt;
use crate::service::SwapQuote;

/// Request body for `POST /pool/swap` and `POST /pool/quote`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SwapRequest {
    /// Address of the asset sold to the pool.
    pub asset_in: String,
    /// Exact input amount (string-encoded U256).
    pub amount_in: String,
}

/// Response body for `POST /pool/swap`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SwapResponse {
    /// Unique swap identifier.
    pub swap_id: String,
    /// Swapping principal.
    pub caller: String,
    /// Input asset address.
    pub asset_in: String,
    /// Output asset address.
    pub asset_out: String,
    /// Input amount (string-encoded).
    pub amount_in: String,
    /// Output amount (string-encoded).
    pub amount_out: String,
    /// Fee withheld from the input (string-encoded).
    pub fee: String,
    /// Reserve of asset A after the swap.
    pub reserve_a: String,
    /// Reserve of asset B after the swap.
    pub reserve_b: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

impl From<SwapReceipt> for SwapResponse {
    fn from(receipt: SwapReceipt) -> Self {
        Self {
            swap_id: uuid::Uuid::new_v4().to_string(),
            caller: receipt.caller.to_string(),
            asset_in: receipt.asset_in.to_string(),
            asset_out: receipt.asset_out.to_string(),
            amount_in: receipt.amount_in.to_string(),
            amount_out: receipt.amount_out.to_string(),
            fee: receipt.fee.to_string(),
            reserve_a: receipt.reserve_a.to_string(),
            reserve_b: receipt.reserve_b.to_string(),
            executed_at: Utc::now(),
        }
    }
}

/// Response body for `POST /pool/quote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Input asset address.
    pub asset_in: String,
    /// Output asset address.
    pub asset_out: String,
    /// Input amount (string-encoded).
    pub amount_in: String,
    /// Quoted output amount (string-encoded).
    pub amount_out: String,
    /// Fee amount (string-encoded).
    pub fee: String,
    /// Price of the input asset before the trade, scaled by 10^18.
    pub spot_price: Option<String>,
    /// Price of the input asset after the trade, scaled by 10^18.
    pub price_after: Option<String>,
    /// Estimated price impact in basis points.
    pub price_impact_bps: i64,
    /// Quote timestamp.
    pub quoted_at: DateTime<Utc>,
}

impl From<SwapQuote> for QuoteResponse {
    fn from(quote: SwapQuote) -> Self {
        Self {
            asset_in: quote.asset_in.to_string(),
            asset_out: quote.asset_out.to_string(),
            amount_in: quote.amount_in.to_string(),
            amount_out: quote.amount_out.to_string(),
            fee: quote.fee.to_string(),
            spot_price: quote.price_before.map(|p| p.to_string()),
            price_after: quote.price_after.map(|p| p.to_string()),
            price_impact_bps: quote.price_impact_bps,
            quoted_at: Utc::now(),
        }
    }
}
