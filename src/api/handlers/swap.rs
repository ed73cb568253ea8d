//! Swap and quote endpoint handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{QuoteResponse, SwapRequest, SwapResponse, parse_address, parse_amount};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /pool/swap` — Execute a swap.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid parameters, insufficient output, or
/// a rejected transfer.
#[utoipa::path(
    post,
    path = "/api/v1/pool/swap",
    tag = "Swaps",
    summary = "Execute a swap",
    description = "Sells exactly `amount_in` of `asset_in` for the other asset at the fee-adjusted constant-product price.",
    params(
        ("x-caller" = String, Header, description = "Caller address"),
    ),
    request_body = SwapRequest,
    responses(
        (status = 200, description = "Swap executed", body = SwapResponse),
        (status = 400, description = "Invalid swap parameters", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 422, description = "Insufficient output or transfer rejected", body = ErrorResponse),
    )
)]
pub async fn execute_swap(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<SwapRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset_in = parse_address("asset_in", &req.asset_in)?;
    let amount_in = parse_amount("amount_in", &req.amount_in)?;

    let receipt = state
        .pool_service
        .swap(caller, asset_in, amount_in)
        .await?;

    Ok(Json(SwapResponse::from(receipt)))
}

/// `POST /pool/quote` — Get swap quote (read-only).
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid parameters or when the swap would
/// be rejected.
#[utoipa::path(
    post,
    path = "/api/v1/pool/quote",
    tag = "Swaps",
    summary = "Get swap quote",
    description = "Returns the output a swap would produce without executing it. The pool state is not modified.",
    request_body = SwapRequest,
    responses(
        (status = 200, description = "Quote computed", body = QuoteResponse),
        (status = 400, description = "Invalid swap parameters", body = ErrorResponse),
        (status = 422, description = "Insufficient output", body = ErrorResponse),
    )
)]
pub async fn quote_swap(
    State(state): State<AppState>,
    Json(req): Json<SwapRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset_in = parse_address("asset_in", &req.asset_in)?;
    let amount_in = parse_amount("amount_in", &req.amount_in)?;

    let quote = state.pool_service.quote(asset_in, amount_in).await?;

    Ok(Json(QuoteResponse::from(quote)))
}

/// Swap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pool/swap", post(execute_swap))
        .route("/pool/quote", post(quote_swap))
}
