// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::config::Config;
use crate::storage::OrderDatabase;

/// Shared application state handed to every handler.
///
/// The token issuer and verifier are built once from [`Config`] at startup;
/// handlers never read configuration or environment themselves.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<OrderDatabase>,
    pub token_issuer: Arc<TokenIssuer>,
    pub token_verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(db: OrderDatabase, config: &Config) -> Self {
        Self {
            db: Arc::new(db),
            token_issuer: Arc::new(TokenIssuer::new(config)),
            token_verifier: Arc::new(TokenVerifier::new(config)),
        }
    }

    /// State over a throwaway database with a fixed test signing key.
    #[cfg(test)]
    pub(crate) fn for_tests(data_dir: &std::path::Path) -> crate::storage::DbResult<Self> {
        let config = Config {
            signing_key: "test-signing-key-0123456789abcdef".to_string(),
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
            data_dir: data_dir.to_path_buf(),
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let db = OrderDatabase::open(&data_dir.join("orders.redb"))?;
        Ok(Self::new(db, &config))
    }
}
