// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a bearer token issued at login.
///
/// The token is self-contained: validity derives purely from the signature
/// and `exp`, nothing is persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the canonical identity name (the user's email).
    pub sub: String,

    /// Unique token identifier, freshly generated per login.
    pub jti: String,

    /// Issued at timestamp (Unix seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix seconds). Always issuance + 2 hours.
    pub exp: i64,

    /// Issuer, from configuration.
    pub iss: String,

    /// Audience, from configuration.
    pub aud: String,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the type handlers and repositories receive; `username` is the
/// ownership key for every downstream data operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical identity name (the `sub` claim).
    pub username: String,

    /// Unique token id (the `jti` claim).
    #[serde(skip)]
    pub token_id: String,

    /// Token expiration (Unix timestamp; informational once verified).
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}
