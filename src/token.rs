use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError};

/// Tokens are accepted for 24 hours after issuance; after that a fresh login
/// is required. There is no refresh mechanism and no server-side revocation.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims
///
/// The payload signed into every bearer token. Validity is determined solely
/// by the signature and the `exp` timestamp — tokens are stateless and are
/// never checked against the store.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user row id of the authenticated identity.
    pub sub: i64,
    /// The RBAC field carried into every protected request.
    pub role: String,
    /// Optional; not set by the login flow but decoded when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time, seconds since the epoch.
    pub exp: usize,
    /// Issued-at time, seconds since the epoch.
    pub iat: usize,
}

/// TokenService
///
/// Issues and verifies the HS256-signed identity assertions used by the login
/// flow and the `AuthUser` extractor. The signing secret comes from
/// configuration; both sides of the exchange must be built from the same
/// `AppConfig`.
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Produces a signed token for the given subject, expiring
    /// `TOKEN_TTL_HOURS` from now.
    pub fn issue(&self, subject_id: i64, role: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id,
            role: role.to_string(),
            email: None,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(ApiError::TokenIssue)
    }

    /// Decodes a token and checks signature and expiry.
    ///
    /// An expired-but-otherwise-valid token fails with `ExpiredToken`; every
    /// other decode failure (bad signature, malformed structure) fails with
    /// `InvalidToken`. Both reject the request with 401 at the API boundary.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(ApiError::ExpiredToken),
                _ => Err(ApiError::InvalidToken),
            },
        }
    }
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the subject id and role
/// recovered from a verified bearer token. Handlers take this as an argument
/// and perform their role checks against `role` before delegating to a
/// manager.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any protected handler. The flow is:
/// 1. Pull AppConfig from the application state (for the signing secret).
/// 2. Extract the `Authorization: Bearer` credential.
/// 3. Verify signature and expiry through the TokenService.
///
/// Rejection: `Unauthorized` when the header is missing or malformed,
/// `ExpiredToken`/`InvalidToken` from verification — all rendered as 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = TokenService::new(config.jwt_secret).verify(token)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}
