//! Pool query DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Response body for `GET /pool/reserves`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservesResponse {
    /// First traded asset.
    pub asset_a: String,
    /// Second traded asset.
    pub asset_b: String,
    /// Reserve of asset A (string-encoded U256).
    pub reserve_a: String,
    /// Reserve of asset B (string-encoded U256).
    pub reserve_b: String,
}

/// Response body for `GET /pool/price/{asset}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PriceResponse {
    /// Asset being priced.
    pub asset: String,
    /// Asset the price is denominated in.
    pub quote_asset: String,
    /// Price scaled by `scale` (string-encoded U256).
    pub price: String,
    /// Fixed-point scale of `price`.
    pub scale: String,
}
