//! Liquidity operation handlers: add, remove.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{LiquidityRequest, LiquidityResponse, parse_amount};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /pool/liquidity/add` — Deposit both assets.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed amounts or when the engine
/// rejects the deposit.
#[utoipa::path(
    post,
    path = "/api/v1/pool/liquidity/add",
    tag = "Liquidity",
    summary = "Add liquidity",
    description = "Pulls `amount_a` and `amount_b` from the caller into the pool. The caller must have approved the pool on both tokens.",
    params(
        ("x-caller" = String, Header, description = "Caller address"),
    ),
    request_body = LiquidityRequest,
    responses(
        (status = 200, description = "Liquidity added", body = LiquidityResponse),
        (status = 400, description = "Invalid amounts", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 422, description = "Transfer rejected", body = ErrorResponse),
    )
)]
pub async fn add_liquidity(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<LiquidityRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let amount_a = parse_amount("amount_a", &req.amount_a)?;
    let amount_b = parse_amount("amount_b", &req.amount_b)?;

    let receipt = state
        .pool_service
        .add_liquidity(caller, amount_a, amount_b)
        .await?;

    Ok(Json(LiquidityResponse::from(receipt)))
}

/// `POST /pool/liquidity/remove` — Withdraw assets from the reserves.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed amounts or when the engine
/// rejects the withdrawal.
#[utoipa::path(
    post,
    path = "/api/v1/pool/liquidity/remove",
    tag = "Liquidity",
    summary = "Remove liquidity",
    description = "Pays `amount_a` and `amount_b` out of the reserves to the caller.",
    params(
        ("x-caller" = String, Header, description = "Caller address"),
    ),
    request_body = LiquidityRequest,
    responses(
        (status = 200, description = "Liquidity removed", body = LiquidityResponse),
        (status = 400, description = "Invalid amounts", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 422, description = "Not enough liquidity", body = ErrorResponse),
    )
)]
pub async fn remove_liquidity(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<LiquidityRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let amount_a = parse_amount("amount_a", &req.amount_a)?;
    let amount_b = parse_amount("amount_b", &req.amount_b)?;

    let receipt = state
        .pool_service
        .remove_liquidity(caller, amount_a, amount_b)
        .await?;

    Ok(Json(LiquidityResponse::from(receipt)))
}

/// Liquidity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pool/liquidity/add", post(add_liquidity))
        .route("/pool/liquidity/remove", post(remove_liquidity))
}
