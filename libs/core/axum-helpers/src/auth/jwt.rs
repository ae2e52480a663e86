use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of tokens minted by [`JwtAuth::create_token`], in seconds.
pub const ACCESS_TOKEN_TTL: i64 = 3600;

/// Claims carried by a findr access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // User ID
    #[serde(default)]
    pub name: String, // Display name at issue time
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub jti: String,
}

/// Stateless HS256 verifier.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Mint a token for `user_id`. Used by tests and local tooling.
    pub fn create_token(
        &self,
        user_id: Uuid,
        name: &str,
        ttl_seconds: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<JwtClaims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-at-least-32-characters"))
    }

    #[test]
    fn test_create_and_verify_token() {
        let auth = auth();
        let user_id = Uuid::new_v4();

        let token = auth.create_token(user_id, "Ada", ACCESS_TOKEN_TTL).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.name, "Ada");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = auth();
        let token = auth.create_token(Uuid::new_v4(), "Ada", -3600).unwrap();
        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-also-32-characters"));
        let token = other.create_token(Uuid::new_v4(), "Eve", ACCESS_TOKEN_TTL).unwrap();
        assert!(auth().verify_token(&token).is_err());
    }
}
