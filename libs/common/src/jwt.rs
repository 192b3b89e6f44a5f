//! Session token service
//!
//! Tokens are HS256 JWTs signed with one process-wide secret. A session
//! token is minted at login; a refreshed token carries the same user id
//! and a shorter lifetime. Nothing is stored server-side.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::TokenError;

/// Default lifetime of a login token (24 hours)
pub const DEFAULT_SESSION_TOKEN_EXPIRY: u64 = 24 * 60 * 60;
/// Default lifetime of a refreshed token (1 hour)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: u64 = 60 * 60;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared signing secret
    pub secret: String,
    /// Login token expiration time in seconds
    pub session_token_expiry: u64,
    /// Refreshed token expiration time in seconds
    pub refresh_token_expiry: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("session_token_expiry", &self.session_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Configuration with the default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            session_token_expiry: DEFAULT_SESSION_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
        }
    }

    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC signing secret (required)
    /// - `JWT_SESSION_TOKEN_EXPIRY`: Login token expiry in seconds (default: 86400)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refreshed token expiry in seconds (default: 3600)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| {
            TokenError::Configuration("JWT_SECRET environment variable not set".to_string())
        })?;

        let session_token_expiry = std::env::var("JWT_SESSION_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TOKEN_EXPIRY);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            session_token_expiry,
            refresh_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl Claims {
    /// Lifetime the token was minted with, in seconds
    pub fn lifetime(&self) -> u64 {
        self.exp.saturating_sub(self.iat)
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Configuration(
                "JWT secret must not be empty".to_string(),
            ));
        }

        if config.refresh_token_expiry >= config.session_token_expiry {
            return Err(TokenError::Configuration(
                "refresh token expiry must be shorter than session token expiry".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Mint the login token for a user
    pub fn issue_session_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.sign(user_id, self.config.session_token_expiry)
    }

    /// Mint the shorter-lived token handed out by a refresh
    pub fn issue_refreshed_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.sign(user_id, self.config.refresh_token_expiry)
    }

    /// Validate a token's signature and expiry and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;
        Ok(token_data.claims)
    }

    /// Validate a token and return the user it was minted for
    pub fn authenticate(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate_token(token)?
            .user_id
            .ok_or(TokenError::MissingSubject)
    }

    fn sign(&self, user_id: Uuid, lifetime: u64) -> Result<String, TokenError> {
        let now = now_secs()?;
        let claims = Claims {
            user_id: Some(user_id),
            iat: now,
            exp: now + lifetime,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }
}

fn now_secs() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Configuration(format!("Failed to get current time: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig::new(secret)).unwrap()
    }

    #[test]
    fn session_token_round_trips_user_id() {
        let jwt = service("test-secret");
        let user_id = Uuid::new_v4();

        let token = jwt.issue_session_token(user_id).unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, Some(user_id));
        assert_eq!(claims.lifetime(), DEFAULT_SESSION_TOKEN_EXPIRY);
    }

    #[test]
    fn refreshed_token_is_shorter_lived() {
        let jwt = service("test-secret");
        let user_id = Uuid::new_v4();

        let session = jwt
            .validate_token(&jwt.issue_session_token(user_id).unwrap())
            .unwrap();
        let refreshed = jwt
            .validate_token(&jwt.issue_refreshed_token(user_id).unwrap())
            .unwrap();

        assert_eq!(refreshed.user_id, session.user_id);
        assert!(refreshed.lifetime() < session.lifetime());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = service("secret-a")
            .issue_session_token(Uuid::new_v4())
            .unwrap();

        let err = service("secret-b").validate_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn rejects_expired_token() {
        let now = now_secs().unwrap();
        let claims = Claims {
            user_id: Some(Uuid::new_v4()),
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = service("test-secret").validate_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn rejects_garbage() {
        let err = service("test-secret")
            .validate_token("not-a-jwt")
            .unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn authenticate_requires_user_id() {
        let now = now_secs().unwrap();
        let claims = Claims {
            user_id: None,
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = service("test-secret").authenticate(&token).unwrap_err();
        assert!(matches!(err, TokenError::MissingSubject));
    }

    #[test]
    fn rejects_inverted_lifetimes() {
        let mut config = JwtConfig::new("test-secret");
        config.refresh_token_expiry = config.session_token_expiry;

        assert!(matches!(
            JwtService::new(config),
            Err(TokenError::Configuration(_))
        ));
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "from-env");
            std::env::set_var("JWT_REFRESH_TOKEN_EXPIRY", "120");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "from-env");
        assert_eq!(config.session_token_expiry, DEFAULT_SESSION_TOKEN_EXPIRY);
        assert_eq!(config.refresh_token_expiry, 120);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_REFRESH_TOKEN_EXPIRY");
        }
    }
}
