//! Pool query handlers: state, reserves, price.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PriceResponse, ReservesResponse, parse_address};
use crate::app_state::AppState;
use crate::domain::PoolSnapshot;
use crate::domain::math::SCALE;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /pool` — Get pool details.
#[utoipa::path(
    get,
    path = "/api/v1/pool",
    tag = "Pool",
    summary = "Get pool details",
    description = "Returns assets, reserves, prices, the k-invariant and activity counters.",
    responses(
        (status = 200, description = "Pool details", body = PoolSnapshot),
    )
)]
pub async fn get_pool(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.pool_service.snapshot().await)
}

/// `GET /pool/reserves` — Current reserves.
#[utoipa::path(
    get,
    path = "/api/v1/pool/reserves",
    tag = "Pool",
    summary = "Get reserves",
    description = "Returns the committed reserve of each asset.",
    responses(
        (status = 200, description = "Reserves", body = ReservesResponse),
    )
)]
pub async fn get_reserves(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.pool_service.snapshot().await;
    Json(ReservesResponse {
        asset_a: snapshot.asset_a.to_string(),
        asset_b: snapshot.asset_b.to_string(),
        reserve_a: snapshot.reserve_a,
        reserve_b: snapshot.reserve_b,
    })
}

/// `GET /pool/price/{asset}` — Price of one asset in the other.
///
/// # Errors
///
/// Returns [`GatewayError`] if the asset is malformed or unknown, or the
/// pool holds none of it.
#[utoipa::path(
    get,
    path = "/api/v1/pool/price/{asset}",
    tag = "Pool",
    summary = "Get asset price",
    description = "Price of `asset` denominated in the other asset, as a fixed-point value scaled by 10^18.",
    params(
        ("asset" = String, Path, description = "Asset address"),
    ),
    responses(
        (status = 200, description = "Price", body = PriceResponse),
        (status = 400, description = "Malformed or unknown asset", body = ErrorResponse),
        (status = 409, description = "Pool is empty", body = ErrorResponse),
    )
)]
pub async fn get_price(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_address("asset", &asset)?;
    let price = state.pool_service.price(asset).await?;

    let snapshot = state.pool_service.snapshot().await;
    let quote_asset = if asset == snapshot.asset_a {
        snapshot.asset_b
    } else {
        snapshot.asset_a
    };

    Ok(Json(PriceResponse {
        asset: asset.to_string(),
        quote_asset: quote_asset.to_string(),
        price: price.to_string(),
        scale: SCALE.to_string(),
    }))
}

/// Pool query routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pool", get(get_pool))
        .route("/pool/reserves", get(get_reserves))
        .route("/pool/price/{asset}", get(get_price))
}
