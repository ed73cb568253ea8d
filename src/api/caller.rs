//! Caller identity extractor.
//!
//! Every mutating endpoint acts on behalf of the principal named in the
//! `x-caller` header.

use alloy_primitives::Address;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::dto::parse_address;
use crate::error::GatewayError;

/// Header carrying the caller's address.
pub const CALLER_HEADER: &str = "x-caller";

/// The principal invoking a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(CALLER_HEADER) else {
            return Err(GatewayError::MissingCaller);
        };
        let raw = value.to_str().map_err(|_| {
            GatewayError::InvalidRequest(format!("{CALLER_HEADER} is not valid text"))
        })?;
        let address = parse_address(CALLER_HEADER, raw)?;
        if address.is_zero() {
            return Err(GatewayError::InvalidRequest(format!(
                "{CALLER_HEADER} must not be the zero address"
            )));
        }
        Ok(Self(address))
    }
}
