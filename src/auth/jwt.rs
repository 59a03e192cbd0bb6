//! JWT token issuance and validation
//! Stateless access tokens signed with the configured HMAC secret

use crate::{auth::AuthError, config::SecurityConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by every access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the user's identifier, i.e. normalized email)
    pub sub: String,

    /// Numeric user id in the store
    pub uid: i64,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Token handed back to the client after login
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64, // seconds until the token expires
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    access_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from the security config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        let secret = config.jwt_secret.expose_secret();

        if secret.trim().is_empty() {
            return Err(AppError::Config("JWT secret is not configured".to_string()));
        }

        // Ensure secret is at least 32 bytes for HMAC
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let algorithm = config.algorithm()?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            access_token_exp_secs: config.access_token_exp_secs,
        })
    }

    /// Issue an access token for an already verified user
    pub fn issue(&self, subject: &str, user_id: i64) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.access_token_exp_secs as i64);

        let claims = Claims {
            sub: subject.to_string(),
            uid: user_id,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(
            |e| {
                tracing::error!("Failed to encode access token: {:?}", e);
                AppError::Internal(format!("Failed to encode access token: {}", e))
            },
        )?;

        Ok(IssuedToken {
            token,
            expires_in: self.access_token_exp_secs,
        })
    }

    /// Validate signature, algorithm and expiry, then decode the claims
    ///
    /// A token is only good strictly before `exp`; jsonwebtoken still accepts
    /// it during the expiry second itself, so that boundary is checked here.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("Token rejected: expired"),
                    ErrorKind::InvalidSignature => tracing::debug!("Token rejected: bad signature"),
                    ErrorKind::InvalidAlgorithm => {
                        tracing::debug!("Token rejected: algorithm mismatch")
                    }
                    kind => tracing::debug!(?kind, "Token rejected: malformed"),
                }
                AuthError::InvalidCredential
            })?;

        if claims.exp <= Utc::now().timestamp() {
            tracing::debug!("Token rejected: expired");
            return Err(AuthError::InvalidCredential);
        }

        Ok(claims)
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> u64 {
        self.access_token_exp_secs
    }
}
