// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints.
//!
//! These are the only unauthenticated routes besides `/health`. Login is
//! where bearer tokens enter the world; everything else only consumes them.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    state::AppState,
    storage::{RegistrationError, UserRepository},
};

/// Request body for registration and login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    /// Email address; doubles as the account's identity name.
    pub email: String,
    /// Plaintext password; hashed before anything is persisted.
    pub password: String,
}

/// Response after successful registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

/// Response after successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// When the token expires.
    pub expiration: DateTime<Utc>,
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Validation failed; body lists every violated constraint")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let repo = UserRepository::new(&state.db);

    repo.register(&request.email, &request.password)
        .map_err(|e| match e {
            RegistrationError::Rejected(violations) => ApiError::validation(violations),
            RegistrationError::Storage(db) => db.into(),
            RegistrationError::Hashing(msg) => {
                tracing::error!(error = %msg, "password hashing failed");
                ApiError::internal("Internal server error")
            }
        })?;

    tracing::info!(email = %request.email, "user registered");

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// Log in and receive a bearer token.
///
/// The 401 body is identical for unknown emails and wrong passwords.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let repo = UserRepository::new(&state.db);

    let Some(identity) = repo.verify(&request.email, &request.password)? else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let issued = state.token_issuer.issue(&identity).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        ApiError::internal("Internal server error")
    })?;

    tracing::info!(email = %identity, "user logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expiration: issued.expires_at,
    }))
}
