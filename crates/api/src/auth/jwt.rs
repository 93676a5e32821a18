//! Access tokens.
//!
//! Login issues one HS256 token per session; there are no refresh tokens.
//! Tokens carry the username so handlers can stamp `created_by` without a
//! users lookup.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use maintrack_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim written into and required on every token.
pub const TOKEN_ISSUER: &str = "maintrack";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// `users.id` of the holder.
    pub sub: DbId,
    pub username: String,
    /// Role name as stored in `users.role`.
    pub role: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for signing and verification.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 60).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or a non-positive expiry.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|_| panic!("JWT_ACCESS_EXPIRY_MINS is not an integer: {raw}")),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };
        assert!(
            access_token_expiry_mins > 0,
            "JWT_ACCESS_EXPIRY_MINS must be positive"
        );

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        Duration::minutes(self.access_token_expiry_mins).num_seconds()
    }
}

/// A signed token plus its lifetime.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: i64,
}

pub fn issue_access_token(
    user_id: DbId,
    username: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<AccessToken, jsonwebtoken::errors::Error> {
    let issued_at = Utc::now().timestamp();
    let expires_in = config.expires_in_secs();
    let claims = Claims {
        sub: user_id,
        username: username.to_owned(),
        role: role.to_owned(),
        iss: TOKEN_ISSUER.to_owned(),
        exp: issued_at + expires_in,
        iat: issued_at,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(AccessToken { token, expires_in })
}

/// Verify signature, expiry and issuer, and return the claims.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_at(now: i64) -> Claims {
        Claims {
            sub: 3,
            username: "night-shift".into(),
            role: "technician".into(),
            iss: TOKEN_ISSUER.into(),
            exp: now + 600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let cfg = config("plant-floor-secret");
        let issued = issue_access_token(42, "alice", "manager", &cfg).unwrap();
        assert_eq!(issued.expires_in, 900);

        let claims = decode_access_token(&issued.token, &cfg).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "manager");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let mut claims = claims_at(now - 1_200);
        claims.exp = now - 300;
        let token = sign(&claims, "plant-floor-secret");
        assert!(decode_access_token(&token, &config("plant-floor-secret")).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let mut claims = claims_at(Utc::now().timestamp());
        claims.iss = "someone-else".into();
        let token = sign(&claims, "plant-floor-secret");
        assert!(decode_access_token(&token, &config("plant-floor-secret")).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let issued = issue_access_token(1, "carol", "viewer", &config("secret-a")).unwrap();
        assert!(decode_access_token(&issued.token, &config("secret-b")).is_err());
    }
}
