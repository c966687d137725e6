// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: user identities and password verification.
//!
//! A user record is an email plus an Argon2id password hash; records are
//! immutable after registration. The email (lowercased) is the table key,
//! so duplicate registration is a single keyed lookup away.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::auth::password::{check_password_policy, hash_password, verify_password};

use super::super::database::{DbError, OrderDatabase, USERS};

/// User identity persisted in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    /// Email as given at registration (canonical identity name).
    pub email: String,
    /// Argon2id PHC-format password hash.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Why a registration attempt did not produce a user.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// Input violated one or more constraints; carries the full list.
    #[error("registration rejected: {}", .0.join(" "))]
    Rejected(Vec<String>),

    /// Underlying storage fault.
    #[error(transparent)]
    Storage(#[from] DbError),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Structural email validation.
///
/// The `|` exclusion keeps identity names unambiguous as composite-index
/// key prefixes.
fn validate_email(email: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if email.is_empty() {
        violations.push("email is required.".to_string());
        return violations;
    }
    if email.chars().any(|c| c.is_whitespace()) {
        violations.push("email must not contain whitespace.".to_string());
    }
    if email.contains('|') {
        violations.push("email must not contain '|'.".to_string());
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') => {}
        _ => violations.push("email is not a valid address.".to_string()),
    }

    violations
}

/// Repository over the credential store table.
pub struct UserRepository<'a> {
    db: &'a OrderDatabase,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a OrderDatabase) -> Self {
        Self { db }
    }

    /// Register a new identity.
    ///
    /// Rejects malformed emails, policy-violating passwords, and duplicate
    /// emails (case-insensitive), reporting every violated constraint
    /// together. The duplicate check and the insert run in one write
    /// transaction, so two concurrent registrations of the same email
    /// cannot both succeed.
    pub fn register(&self, email: &str, password: &str) -> Result<(), RegistrationError> {
        let mut violations = validate_email(email);
        violations.extend(check_password_policy(password));

        let key = email.to_lowercase();

        let write_txn = self.db.begin_write().map_err(DbError::from)?;
        {
            let mut table = write_txn.open_table(USERS).map_err(DbError::from)?;

            if table.get(key.as_str()).map_err(DbError::from)?.is_some() {
                violations.push(format!("email '{email}' is already taken."));
            }
            if !violations.is_empty() {
                // Dropping the transaction aborts it.
                return Err(RegistrationError::Rejected(violations));
            }

            let user = StoredUser {
                email: email.to_string(),
                password_hash: hash_password(password)
                    .map_err(|e| RegistrationError::Hashing(e.to_string()))?,
                created_at: Utc::now(),
            };
            let json = serde_json::to_vec(&user).map_err(DbError::from)?;
            table
                .insert(key.as_str(), json.as_slice())
                .map_err(DbError::from)?;
        }
        write_txn.commit().map_err(DbError::from)?;
        Ok(())
    }

    /// Verify credentials; `None` on unknown email or wrong password.
    ///
    /// The two failure cases are indistinguishable to the caller, which is
    /// what login handlers need to avoid user enumeration.
    pub fn verify(&self, email: &str, password: &str) -> Result<Option<String>, DbError> {
        let key = email.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let Some(value) = table.get(key.as_str())? else {
            return Ok(None);
        };
        let user: StoredUser = serde_json::from_slice(value.value())?;

        if verify_password(&user.password_hash, password) {
            Ok(Some(user.email))
        } else {
            Ok(None)
        }
    }
}
