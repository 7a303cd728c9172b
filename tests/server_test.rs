// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Integration tests for the REST API with concurrent requests.
//!
//! These tests verify that the HTTP surface keeps per-user balances
//! consistent while many requests are in flight.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use point_wallet_rs::{PointError, PointService, UserId};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

// === DTOs (duplicated from example for test isolation) ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointResponse {
    pub user_id: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Server Setup ===

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PointService>,
}

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

async fn get_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PointResponse>, AppError> {
    let balance = state.service.get_point(UserId(id))?;
    Ok(Json(PointResponse {
        user_id: balance.user_id().0,
        amount: balance.amount(),
    }))
}

async fn charge(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<PointResponse>, AppError> {
    let balance = state.service.charge(UserId(id), request.amount)?;
    Ok(Json(PointResponse {
        user_id: balance.user_id().0,
        amount: balance.amount(),
    }))
}

async fn use_points(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<PointResponse>, AppError> {
    let balance = state.service.use_points(UserId(id), request.amount)?;
    Ok(Json(PointResponse {
        user_id: balance.user_id().0,
        amount: balance.amount(),
    }))
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/point/{id}", get(get_point))
        .route("/point/{id}/charge", patch(charge))
        .route("/point/{id}/use", patch(use_points))
        .with_state(state)
}

/// Test server that binds to an ephemeral port.
struct TestServer {
    base_url: String,
    service: Arc<PointService>,
}

impl TestServer {
    async fn new() -> Self {
        let service = Arc::new(PointService::new());
        let state = AppState {
            service: service.clone(),
        };

        let app = create_router(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready by polling with retries
        let client = Client::new();
        let health_url = format!("{}/point/0", base_url);
        for _ in 0..50 {
            match client.get(&health_url).send().await {
                Ok(_) => break,
                Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(50)).await,
            }
        }

        TestServer { base_url, service }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// === Tests ===
// These tests are ignored in CI due to connection issues on some platforms.
// Run manually with: cargo test --test server_test -- --ignored

/// Smoke test covering every endpoint and the error mapping.
#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn endpoint_smoke_test() {
    let server = TestServer::new().await;
    let client = Client::new();

    // Absent user reads as zero
    let response = client.get(server.url("/point/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: PointResponse = response.json().await.unwrap();
    assert_eq!(body.amount, 0);

    // Charge
    let response = client
        .patch(server.url("/point/1/charge"))
        .json(&AmountRequest { amount: 1_000 })
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: PointResponse = response.json().await.unwrap();
    assert_eq!(body.amount, 1_000);

    // Use
    let response = client
        .patch(server.url("/point/1/use"))
        .json(&AmountRequest { amount: 300 })
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: PointResponse = response.json().await.unwrap();
    assert_eq!(body.amount, 700);

    // Overdraw maps to 422
    let response = client
        .patch(server.url("/point/1/use"))
        .json(&AmountRequest { amount: 10_000 })
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.code, "INSUFFICIENT_FUNDS");

    // Invalid amount maps to 400
    let response = client
        .patch(server.url("/point/1/charge"))
        .json(&AmountRequest { amount: 0 })
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Two history records were appended
    assert_eq!(server.service.get_histories(UserId(1)).unwrap().len(), 2);
}

/// Test concurrent charges to a single user.
/// The total should be exactly the sum of all charges.
#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn concurrent_charges_single_user() {
    let server = TestServer::new().await;
    let client = Client::new();

    const NUM_CHARGES: usize = 200;
    const AMOUNT_PER_CHARGE: i64 = 100;

    let start = Instant::now();
    let mut handles = Vec::with_capacity(NUM_CHARGES);

    for _ in 0..NUM_CHARGES {
        let client = client.clone();
        let url = server.url("/point/1/charge");

        handles.push(tokio::spawn(async move {
            let response = client
                .patch(&url)
                .json(&AmountRequest {
                    amount: AMOUNT_PER_CHARGE,
                })
                .send()
                .await
                .unwrap();
            response.status()
        }));
    }

    let results: Vec<_> = futures::future::join_all(handles).await;
    let elapsed = start.elapsed();

    let successful = results
        .iter()
        .filter(|r| r.as_ref().unwrap().is_success())
        .count();

    println!(
        "Single user: {} charges in {:?} ({:.0} req/s)",
        NUM_CHARGES,
        elapsed,
        NUM_CHARGES as f64 / elapsed.as_secs_f64()
    );

    assert_eq!(successful, NUM_CHARGES, "All charges should succeed");

    let balance = server.service.get_point(UserId(1)).unwrap();
    assert_eq!(balance.amount(), AMOUNT_PER_CHARGE * NUM_CHARGES as i64);
    assert_eq!(
        server.service.get_histories(UserId(1)).unwrap().len(),
        NUM_CHARGES
    );
}

/// Test concurrent charges to different users.
/// Each user should end with exactly the sum of their charges.
#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn concurrent_charges_multiple_users() {
    let server = TestServer::new().await;
    let client = Client::new();

    const NUM_USERS: i64 = 20;
    const CHARGES_PER_USER: usize = 20;
    const AMOUNT_PER_CHARGE: i64 = 10;

    let mut handles = Vec::with_capacity((NUM_USERS as usize) * CHARGES_PER_USER);

    for user in 1..=NUM_USERS {
        for _ in 0..CHARGES_PER_USER {
            let client = client.clone();
            let url = server.url(&format!("/point/{}/charge", user));

            handles.push(tokio::spawn(async move {
                let response = client
                    .patch(&url)
                    .json(&AmountRequest {
                        amount: AMOUNT_PER_CHARGE,
                    })
                    .send()
                    .await
                    .unwrap();
                response.status()
            }));
        }
    }

    let results: Vec<_> = futures::future::join_all(handles).await;
    let successful = results
        .iter()
        .filter(|r| r.as_ref().unwrap().is_success())
        .count();

    assert_eq!(successful, (NUM_USERS as usize) * CHARGES_PER_USER);

    for user in 1..=NUM_USERS {
        let balance = server.service.get_point(UserId(user)).unwrap();
        assert_eq!(
            balance.amount(),
            AMOUNT_PER_CHARGE * CHARGES_PER_USER as i64,
            "User {} should have the sum of their charges",
            user
        );
    }
}
