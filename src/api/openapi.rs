//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    ApproveRequest, ApproveResponse, BalanceResponse, FeeScheduleResponse, LiquidityRequest,
    LiquidityResponse, PriceResponse, QuoteResponse, ReservesResponse, SwapRequest, SwapResponse,
    TokenResponse, TransferRequest, TransferResponse,
};
use crate::api::handlers::{liquidity, pool, swap, system, token};
use crate::domain::PoolSnapshot;
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "simple-dex",
        description = "Two-asset constant-product pool with a 0.3% swap fee."
    ),
    paths(
        pool::get_pool,
        pool::get_reserves,
        pool::get_price,
        liquidity::add_liquidity,
        liquidity::remove_liquidity,
        swap::execute_swap,
        swap::quote_swap,
        token::get_token,
        token::get_balance,
        token::approve,
        token::transfer,
        system::health_handler,
        system::fees_handler,
    ),
    components(schemas(
        PoolSnapshot,
        ReservesResponse,
        PriceResponse,
        LiquidityRequest,
        LiquidityResponse,
        SwapRequest,
        SwapResponse,
        QuoteResponse,
        TokenResponse,
        BalanceResponse,
        ApproveRequest,
        ApproveResponse,
        TransferRequest,
        TransferResponse,
        FeeScheduleResponse,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Pool", description = "Pool state queries"),
        (name = "Liquidity", description = "Deposits and withdrawals"),
        (name = "Swaps", description = "Swaps and quotes"),
        (name = "Tokens", description = "Token ledgers backing the pool"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;
