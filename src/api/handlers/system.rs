//! System endpoints: health check, fee schedule.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::FeeScheduleResponse;
use crate::app_state::AppState;
use crate::domain::math::{self, FEE_DENOMINATOR, FEE_NUMERATOR, SCALE};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/fees` — Swap fee schedule.
#[utoipa::path(
    get,
    path = "/config/fees",
    tag = "System",
    summary = "Get fee schedule",
    description = "Returns the fixed swap fee and the price scale used by all endpoints.",
    responses(
        (status = 200, description = "Fee schedule", body = FeeScheduleResponse),
    )
)]
pub async fn fees_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(fee_schedule()))
}

fn fee_schedule() -> FeeScheduleResponse {
    FeeScheduleResponse {
        fee_numerator: FEE_NUMERATOR.to_string(),
        fee_denominator: FEE_DENOMINATOR.to_string(),
        fee_bps: math::fee_bps(),
        price_scale: SCALE.to_string(),
    }
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/fees", get(fees_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_is_thirty_bps() {
        let schedule = fee_schedule();
        assert_eq!(schedule.fee_bps, 30);
        assert_eq!(schedule.fee_numerator, "997");
        assert_eq!(schedule.fee_denominator, "1000");
    }
}
