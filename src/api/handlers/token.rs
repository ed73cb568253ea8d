//! Token ledger handlers: metadata, balances, approvals, transfers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{
    ApproveRequest, ApproveResponse, BalanceResponse, TokenResponse, TransferRequest,
    TransferResponse, parse_address, parse_amount,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /tokens/{asset}` — Token metadata.
///
/// # Errors
///
/// Returns [`GatewayError`] if the asset is malformed or not traded here.
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{asset}",
    tag = "Tokens",
    summary = "Get token metadata",
    params(
        ("asset" = String, Path, description = "Token address"),
    ),
    responses(
        (status = 200, description = "Token metadata", body = TokenResponse),
        (status = 400, description = "Malformed or unknown asset", body = ErrorResponse),
    )
)]
pub async fn get_token(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_address("asset", &asset)?;
    let info = state.pool_service.token_info(asset).await?;
    Ok(Json(TokenResponse::from(info)))
}

/// `GET /tokens/{asset}/balances/{owner}` — Balance and pool allowance.
///
/// # Errors
///
/// Returns [`GatewayError`] if an address is malformed or the asset is not
/// traded here.
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{asset}/balances/{owner}",
    tag = "Tokens",
    summary = "Get balance",
    params(
        ("asset" = String, Path, description = "Token address"),
        ("owner" = String, Path, description = "Account address"),
    ),
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 400, description = "Malformed or unknown address", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path((asset, owner)): Path<(String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_address("asset", &asset)?;
    let owner = parse_address("owner", &owner)?;
    let (balance, allowance) = state.pool_service.balance_of(asset, owner).await?;

    Ok(Json(BalanceResponse {
        asset: asset.to_string(),
        owner: owner.to_string(),
        balance: balance.to_string(),
        pool_allowance: allowance.to_string(),
    }))
}

/// `POST /tokens/{asset}/approve` — Set an allowance.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed input or a ledger rejection.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/{asset}/approve",
    tag = "Tokens",
    summary = "Approve spender",
    description = "Sets the allowance of `spender` (the pool by default) over the caller's balance.",
    params(
        ("asset" = String, Path, description = "Token address"),
        ("x-caller" = String, Header, description = "Caller address"),
    ),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Allowance set", body = ApproveResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_address("asset", &asset)?;
    let spender = req
        .spender
        .as_deref()
        .map(|raw| parse_address("spender", raw))
        .transpose()?;
    let amount = parse_amount("amount", &req.amount)?;

    let spender = state
        .pool_service
        .approve(caller, asset, spender, amount)
        .await?;

    Ok(Json(ApproveResponse {
        asset: asset.to_string(),
        owner: caller.to_string(),
        spender: spender.to_string(),
        amount: amount.to_string(),
    }))
}

/// `POST /tokens/{asset}/transfer` — Move tokens between accounts.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed input or a ledger rejection.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/{asset}/transfer",
    tag = "Tokens",
    summary = "Transfer tokens",
    params(
        ("asset" = String, Path, description = "Token address"),
        ("x-caller" = String, Header, description = "Caller address"),
    ),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer done", body = TransferResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 422, description = "Insufficient balance", body = ErrorResponse),
    )
)]
pub async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
    Json(req): Json<TransferRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let asset = parse_address("asset", &asset)?;
    let to = parse_address("to", &req.to)?;
    let amount = parse_amount("amount", &req.amount)?;

    state
        .pool_service
        .transfer_tokens(caller, asset, to, amount)
        .await?;

    Ok(Json(TransferResponse {
        asset: asset.to_string(),
        from: caller.to_string(),
        to: to.to_string(),
        amount: amount.to_string(),
    }))
}

/// Token routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tokens/{asset}", get(get_token))
        .route("/tokens/{asset}/balances/{owner}", get(get_balance))
        .route("/tokens/{asset}/approve", post(approve))
        .route("/tokens/{asset}/transfer", post(transfer))
}
