//! Simple REST API server example for the point wallet.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `GET /point/{id}` - Get a user's current balance
//! - `GET /point/{id}/histories` - Get a user's charge/use history
//! - `PATCH /point/{id}/charge` - Charge points
//! - `PATCH /point/{id}/use` - Use points
//!
//! ## Example Usage
//!
//! ```bash
//! # Charge
//! curl -X PATCH http://localhost:3000/point/1/charge \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": 1000}'
//!
//! # Use
//! curl -X PATCH http://localhost:3000/point/1/use \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": 300}'
//!
//! # Get balance
//! curl http://localhost:3000/point/1
//!
//! # Get history
//! curl http://localhost:3000/point/1/histories
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use point_wallet_rs::{
    Balance, HistoryRecord, PointError, PointService, TransactionKind, UserId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Request body for charge and use operations.
///
/// ```json
/// {"amount": 1000}
/// ```
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: i64,
}

/// Response body for balance information.
#[derive(Debug, Serialize)]
pub struct PointResponse {
    pub user_id: i64,
    pub amount: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<Balance> for PointResponse {
    fn from(balance: Balance) -> Self {
        Self {
            user_id: balance.user_id().0,
            amount: balance.amount(),
            updated_at: balance.updated_at(),
        }
    }
}

/// Response body for a single history record.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub id: u64,
    pub user_id: i64,
    pub amount: i64,
    pub kind: TransactionKind,
    pub updated_at: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryResponse {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: record.id().0,
            user_id: record.user_id().0,
            amount: record.amount(),
            kind: record.kind(),
            updated_at: record.updated_at(),
        }
    }
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the point service.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PointService>,
}

// === Error Handling ===

/// Wrapper for converting `PointError` into HTTP responses.
pub struct AppError(PointError);

impl From<PointError> for AppError {
    fn from(err: PointError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            PointError::InvalidUserId => (StatusCode::BAD_REQUEST, "INVALID_USER_ID"),
            PointError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            PointError::InvalidBalance => (StatusCode::BAD_REQUEST, "INVALID_BALANCE"),
            PointError::LimitExceeded => (StatusCode::UNPROCESSABLE_ENTITY, "LIMIT_EXCEEDED"),
            PointError::InsufficientFunds => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_FUNDS")
            }
            PointError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_FAILURE"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// GET /point/{id} - Get balance by user ID.
async fn get_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PointResponse>, AppError> {
    let balance = state.service.get_point(UserId(id))?;
    Ok(Json(balance.into()))
}

/// GET /point/{id}/histories - Get history records by user ID.
async fn get_histories(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<HistoryResponse>>, AppError> {
    let records = state.service.get_histories(UserId(id))?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// PATCH /point/{id}/charge - Charge points.
async fn charge(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<PointResponse>, AppError> {
    let balance = state.service.charge(UserId(id), request.amount)?;
    Ok(Json(balance.into()))
}

/// PATCH /point/{id}/use - Use points.
async fn use_points(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<PointResponse>, AppError> {
    let balance = state.service.use_points(UserId(id), request.amount)?;
    Ok(Json(balance.into()))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/point/{id}", get(get_point))
        .route("/point/{id}/histories", get(get_histories))
        .route("/point/{id}/charge", patch(charge))
        .route("/point/{id}/use", patch(use_points))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let state = AppState {
        service: Arc::new(PointService::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Point wallet API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  GET   /point/{{id}}           - Get balance by user ID");
    println!("  GET   /point/{{id}}/histories - Get history by user ID");
    println!("  PATCH /point/{{id}}/charge    - Charge points");
    println!("  PATCH /point/{{id}}/use       - Use points");

    axum::serve(listener, app).await.unwrap();
}
