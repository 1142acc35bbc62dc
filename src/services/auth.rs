use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed bearer credentials")]
    MissingCredentials,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Identity of an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: String,
    pub role: Option<String>,
}

/// Validates bearer credentials issued by the identity provider
pub trait AuthVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Caller, AuthError>;
}

/// Claims read from provider-issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub role: Option<String>,
}

/// Shared-secret JWT verification
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Verify HS256 tokens signed with `secret`
    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Require a specific `iss` claim
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    /// Require a specific `aud` claim
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    /// Build a verifier from auth settings
    pub fn from_settings(settings: &crate::config::AuthSettings) -> Self {
        let mut verifier = Self::hs256(settings.jwt_secret.as_bytes());
        if let Some(issuer) = &settings.issuer {
            verifier = verifier.with_issuer(issuer);
        }
        if let Some(audience) = &settings.audience {
            verifier = verifier.with_audience(audience);
        }
        verifier
    }
}

impl AuthVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(Caller {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .and_then(|value| value.trim().split_once(' '))
        .ok_or(AuthError::MissingCredentials)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}
