// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment exactly once at startup and
//! handed to the rest of the application as an immutable [`Config`] value.
//! Nothing reads environment variables per request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Symmetric HS256 signing key for bearer tokens | Required |
//! | `JWT_ISSUER` | `iss` claim stamped into and expected from tokens | `order-management-server` |
//! | `JWT_AUDIENCE` | `aud` claim stamped into and expected from tokens | `order-management-clients` |
//! | `DATA_DIR` | Directory holding the embedded order database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the token signing key.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the expected token issuer.
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";

/// Environment variable name for the expected token audience.
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Fatal configuration errors detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The signing key is absent or empty. Tokens cannot be issued or
    /// verified without it, so the process refuses to start.
    #[error("{JWT_SECRET_ENV} must be set to a non-empty signing key")]
    MissingSigningKey,

    /// The bind port is not a valid u16.
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

/// Immutable application configuration.
///
/// Constructed once in `main` via [`Config::from_env`] and injected into the
/// token issuer/verifier and storage layer. Holding the signing key here
/// (rather than re-reading the environment) keeps token handling pure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symmetric key used to sign and verify bearer tokens (HS256).
    pub signing_key: String,
    /// Value of the `iss` claim on issued tokens; validated on inbound tokens.
    pub issuer: String,
    /// Value of the `aud` claim on issued tokens; validated on inbound tokens.
    pub audience: String,
    /// Directory holding the embedded database file.
    pub data_dir: PathBuf,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSigningKey`] if `JWT_SECRET` is unset or
    /// empty. This is deliberately fatal: a server that cannot sign tokens
    /// must not come up only to fail per-request.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_key = env::var(JWT_SECRET_ENV).unwrap_or_default();
        if signing_key.is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }

        let port_raw = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw))?;

        Ok(Self {
            signing_key,
            issuer: env::var(JWT_ISSUER_ENV)
                .unwrap_or_else(|_| "order-management-server".to_string()),
            audience: env::var(JWT_AUDIENCE_ENV)
                .unwrap_or_else(|_| "order-management-clients".to_string()),
            data_dir: PathBuf::from(env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string())),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_variable() {
        let msg = ConfigError::MissingSigningKey.to_string();
        assert!(msg.contains("JWT_SECRET"));
    }

    #[test]
    fn invalid_port_carries_raw_value() {
        let msg = ConfigError::InvalidPort("eighty".to_string()).to_string();
        assert!(msg.contains("eighty"));
    }
}
