// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification (HS256).
//!
//! Both halves share the symmetric signing key from [`Config`] and are
//! constructed once at startup. Issuance happens at login; verification on
//! every authenticated request. Tokens are stateless: nothing is persisted,
//! validity derives from the signature and `exp` alone.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::Config;

use super::{AuthenticatedUser, AuthError, Claims};

/// Fixed token lifetime. Not configurable per call.
const TOKEN_LIFETIME_HOURS: i64 = 2;

/// A freshly issued token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT, ready for an `Authorization: Bearer` header.
    pub token: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Issues signed bearer tokens for verified identities.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.signing_key.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Issue a token for an already-verified identity name.
    ///
    /// The caller is responsible for having authenticated the identity; this
    /// method only constructs and signs the token. Each token carries a
    /// fresh `jti` so two logins in the same second still differ.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = Claims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}

/// Verifies inbound bearer tokens against the same key and algorithm.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry comparison; the default leeway would keep expired
        // tokens alive for another minute.
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            decoding_key: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
        }
    }

    /// Verify signature, expiry, issuer, and audience; extract the identity.
    ///
    /// On success the returned [`AuthenticatedUser::username`] becomes the
    /// ownership key for all downstream repository operations.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(AuthenticatedUser::from_claims(token_data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config() -> Config {
        Config {
            signing_key: "unit-test-signing-key-0123456789".to_string(),
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
            data_dir: std::env::temp_dir(),
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    fn issuer_and_verifier() -> (TokenIssuer, TokenVerifier) {
        let config = test_config();
        (TokenIssuer::new(&config), TokenVerifier::new(&config))
    }

    #[test]
    fn issued_token_round_trips() {
        let (issuer, verifier) = issuer_and_verifier();

        let issued = issuer.issue("a@x.com").unwrap();
        let user = verifier.verify(&issued.token).unwrap();

        assert_eq!(user.username, "a@x.com");
        assert_eq!(user.expires_at, issued.expires_at.timestamp());
    }

    #[test]
    fn expiry_is_two_hours_from_issuance() {
        let (issuer, _) = issuer_and_verifier();

        let before = Utc::now();
        let issued = issuer.issue("a@x.com").unwrap();
        let after = Utc::now();

        let lifetime = Duration::hours(TOKEN_LIFETIME_HOURS);
        assert!(issued.expires_at >= before + lifetime);
        assert!(issued.expires_at <= after + lifetime);
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let (issuer, verifier) = issuer_and_verifier();

        let a = issuer.issue("a@x.com").unwrap();
        let b = issuer.issue("a@x.com").unwrap();

        let user_a = verifier.verify(&a.token).unwrap();
        let user_b = verifier.verify(&b.token).unwrap();
        assert_ne!(user_a.token_id, user_b.token_id);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let (issuer, verifier) = issuer_and_verifier();
        let issued = issuer.issue("a@x.com").unwrap();

        // Rewrite the sub claim without re-signing.
        let parts: Vec<&str> = issued.token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let doctored = String::from_utf8(payload)
            .unwrap()
            .replace("a@x.com", "b@x.com");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(doctored.as_bytes()),
            parts[2]
        );

        let result = verifier.verify(&forged);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let (issuer, _) = issuer_and_verifier();
        let issued = issuer.issue("a@x.com").unwrap();

        let mut other = test_config();
        other.signing_key = "a-completely-different-signing-key".to_string();
        let verifier = TokenVerifier::new(&other);

        let result = verifier.verify(&issued.token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let config = test_config();
        let verifier = TokenVerifier::new(&config);

        // Hand-craft a correctly signed token whose exp is in the past.
        let now = Utc::now();
        let claims = Claims {
            sub: "a@x.com".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.signing_key.as_bytes()),
        )
        .unwrap();

        let result = verifier.verify(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn wrong_issuer_or_audience_is_rejected() {
        let (issuer, _) = issuer_and_verifier();
        let issued = issuer.issue("a@x.com").unwrap();

        let mut other = test_config();
        other.issuer = "someone-else".to_string();
        let result = TokenVerifier::new(&other).verify(&issued.token);
        assert!(matches!(result, Err(AuthError::InvalidIssuer)));

        let mut other = test_config();
        other.audience = "someone-else".to_string();
        let result = TokenVerifier::new(&other).verify(&issued.token);
        assert!(matches!(result, Err(AuthError::InvalidAudience)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let (_, verifier) = issuer_and_verifier();
        let result = verifier.verify("not.a.jwt");
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }
}
