// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and the registration password policy.
//!
//! Hashes are Argon2id in PHC string format. Verification goes through the
//! argon2 crate's constant-time comparison; a lookup miss and a wrong
//! password are indistinguishable to callers of the credential store.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use super::AuthError;

/// Hash a plaintext password into a PHC-format Argon2id string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| AuthError::InternalError(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::InternalError(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::InternalError(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `false` for unparseable hashes rather than erroring; a corrupt
/// stored hash must read as "wrong password", not as a server fault.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

/// Check a candidate password against the registration policy.
///
/// Returns every violated constraint, not just the first. The policy
/// requires at least 4 characters with one uppercase letter, one lowercase
/// letter, one digit, and one non-alphanumeric character.
pub fn check_password_policy(password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < 4 {
        violations.push("password must be at least 4 characters long.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("password must contain at least one uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("password must contain at least one lowercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("password must contain at least one digit.".to_string());
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        violations.push(
            "password must contain at least one non-alphanumeric character.".to_string(),
        );
    }

    violations
}
