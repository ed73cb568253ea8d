//! Error types for the pool engine and the HTTP gateway.
//!
//! [`PoolError`] is raised by the engine when an operation would violate a
//! pool invariant; every variant leaves the pool untouched. [`GatewayError`]
//! wraps it for the HTTP layer and maps each variant to a status code and a
//! structured JSON error response.

use alloy_primitives::Address;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ledger::LedgerError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4003,
///     "message": "Insufficient output amount",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`GatewayError::error_code`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Reasons a pool operation is refused.
///
/// Detected synchronously inside the operation, before any reserve is
/// committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A caller-supplied amount is zero or otherwise out of domain.
    #[error("Amounts must be greater than 0")]
    InvalidAmount,

    /// A withdrawal exceeds the available reserves.
    #[error("Not enough liquidity")]
    InsufficientLiquidity,

    /// A swap would yield zero output or more than the output reserve.
    #[error("Insufficient output amount")]
    InsufficientOutput,

    /// The asset is neither of the two assets configured for the pool.
    #[error("unknown asset: {0}")]
    UnknownAsset(Address),

    /// A balance ledger declined to move value.
    #[error("transfer of {asset} rejected: {source}")]
    TransferRejected {
        /// Asset whose ledger rejected the movement.
        asset: Address,
        /// Ledger-side reason.
        source: LedgerError,
    },

    /// A price was requested while the denominator reserve is zero.
    #[error("price undefined: reserve of {0} is zero")]
    EmptyPool(Address),

    /// An asset identifier given at creation is malformed or duplicated.
    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    /// A principal given at creation is malformed.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(Address),

    /// A checked 256-bit computation overflowed.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                   |
/// |-----------|------------------|-------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request / 401         |
/// | 4000–4999 | Pool-Specific    | 422 Unprocessable / 409       |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request carried no caller identity.
    #[error("missing caller identity: set the x-caller header")]
    MissingCaller,

    /// Error propagated from the pool engine.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Error propagated directly from a balance ledger.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::MissingCaller => 1002,
            Self::Pool(err) => match err {
                PoolError::InvalidAmount => 1101,
                PoolError::InvalidAsset(_) => 1102,
                PoolError::InvalidPrincipal(_) => 1103,
                PoolError::UnknownAsset(_) => 1104,
                PoolError::InsufficientLiquidity => 4001,
                PoolError::TransferRejected { .. } => 4002,
                PoolError::InsufficientOutput => 4003,
                PoolError::EmptyPool(_) => 4004,
                PoolError::ArithmeticOverflow => 4005,
            },
            Self::Ledger(_) => 4010,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCaller => StatusCode::UNAUTHORIZED,
            Self::Pool(err) => match err {
                PoolError::InvalidAmount
                | PoolError::InvalidAsset(_)
                | PoolError::InvalidPrincipal(_)
                | PoolError::UnknownAsset(_) => StatusCode::BAD_REQUEST,
                PoolError::EmptyPool(_) => StatusCode::CONFLICT,
                PoolError::InsufficientLiquidity
                | PoolError::InsufficientOutput
                | PoolError::TransferRejected { .. }
                | PoolError::ArithmeticOverflow => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::Ledger(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            Self::Pool(PoolError::TransferRejected { source, .. }) => Some(source.to_string()),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
