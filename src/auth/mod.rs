// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the order management API.
//!
//! ## Auth Flow
//!
//! 1. Client registers with email + password (`POST /auth/register`)
//! 2. Client logs in (`POST /auth/login`); the server verifies the
//!    credentials and issues an HS256 JWT valid for 2 hours
//! 3. Client sends `Authorization: Bearer <token>` on every request
//! 4. The [`Auth`] extractor verifies signature, expiry, issuer, and
//!    audience, and yields the identity (`sub` claim) that scopes every
//!    repository operation
//!
//! ## Security
//!
//! - Passwords are stored as Argon2id PHC hashes, never plaintext
//! - Tokens are stateless; no server-side session or revocation list
//! - Expiry comparison uses zero clock-skew leeway
//! - Login failures never reveal which part of the credentials was wrong

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod tokens;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use tokens::{IssuedToken, TokenIssuer, TokenVerifier};
