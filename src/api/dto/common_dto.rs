//! Shared parsing helpers and DTO types used across multiple endpoints.

use alloy_primitives::{Address, U256};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Parses a string-encoded amount (decimal, or `0x`-prefixed hex).
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field` if the value is
/// empty or not a 256-bit unsigned integer.
pub fn parse_amount(field: &str, raw: &str) -> Result<U256, GatewayError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidRequest(format!("{field} is empty")));
    }
    trimmed
        .parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid {field}: {raw}")))
}

/// Parses a hex-encoded 20-byte address.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field` if the value is
/// not a valid address.
pub fn parse_address(field: &str, raw: &str) -> Result<Address, GatewayError> {
    raw.trim()
        .parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid {field}: {raw}")))
}

/// Fee schedule reported by `GET /config/fees`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeeScheduleResponse {
    /// Numerator of the retained-input fraction (997).
    pub fee_numerator: String,
    /// Denominator of the retained-input fraction (1000).
    pub fee_denominator: String,
    /// Fee in basis points of the input amount.
    pub fee_bps: u32,
    /// Fixed-point scale applied to prices.
    pub price_scale: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_decimal_and_hex() {
        let Ok(dec) = parse_amount("amount", "1000") else {
            panic!("decimal must parse");
        };
        let Ok(hex) = parse_amount("amount", "0x3e8") else {
            panic!("hex must parse");
        };
        assert_eq!(dec, U256::from(1000u64));
        assert_eq!(dec, hex);
    }

    #[test]
    fn bad_amounts_name_the_field() {
        for raw in ["", "-1", "1.5", "abc"] {
            let Err(GatewayError::InvalidRequest(msg)) = parse_amount("amount_a", raw) else {
                panic!("{raw:?} must be rejected");
            };
            assert!(msg.contains("amount_a"));
        }
    }

    #[test]
    fn addresses_parse_with_or_without_checksum() {
        let lower = parse_address("owner", "0x5fbdb2315678afecb367f032d93f642f64180aa3");
        let mixed = parse_address("owner", "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert!(lower.is_ok());
        assert_eq!(lower.ok(), mixed.ok());
        assert!(parse_address("owner", "0x1234").is_err());
    }
}
