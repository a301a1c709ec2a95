//! Admin and user authentication.
//!
//! Admin routes accept either the shared `X-Admin-Secret` or a bearer JWT
//! carrying the `admin` role. User routes need any valid bearer JWT.
//! Tokens are RS256, checked against the issuer's JWKS, which is fetched
//! lazily and refetched when a token names an unknown key id, at most once
//! per `JWKS_REFETCH_INTERVAL`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use eventboard_core::{env_non_empty, ROLES_CLAIM};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::api_error::ApiError;
use crate::AppState;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";
const ADMIN_ROLE: &str = "admin";
pub const JWKS_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token header has no key id")]
    MissingKid,
    #[error("no signing key with id '{0}'")]
    UnknownKey(String),
    #[error("JWKS fetch failed: {0}")]
    Jwks(#[from] reqwest::Error),
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token has no subject")]
    MissingSubject,
}

/// Identity extracted from a verified token (or the admin secret).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
}

impl Claims {
    fn service(sub: &str) -> Self {
        Self { sub: sub.to_owned(), roles: vec![ADMIN_ROLE.to_owned()] }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    fn from_payload(mut payload: HashMap<String, Value>) -> Result<Self, AuthError> {
        let sub = match payload.remove("sub") {
            Some(Value::String(sub)) => sub,
            _ => return Err(AuthError::MissingSubject),
        };
        let roles = match payload.remove(ROLES_CLAIM) {
            Some(Value::Array(items)) => {
                items.into_iter().filter_map(|v| v.as_str().map(str::to_owned)).collect()
            },
            _ => Vec::new(),
        };
        Ok(Self { sub, roles })
    }
}

struct CachedJwks {
    set: JwkSet,
    fetched_at: Instant,
}

/// RS256 verifier with a cached JWKS.
pub struct JwtVerifier {
    issuer: String,
    audience: String,
    jwks_url: String,
    client: reqwest::Client,
    refetch_interval: Duration,
    keys: RwLock<Option<CachedJwks>>,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtVerifier {
    /// Verifier for an Auth0-style tenant domain.
    #[must_use]
    pub fn for_domain(domain: &str, audience: &str) -> Self {
        Self::new(
            &format!("https://{domain}/"),
            audience,
            &format!("https://{domain}/.well-known/jwks.json"),
        )
    }

    #[must_use]
    pub fn new(issuer: &str, audience: &str, jwks_url: &str) -> Self {
        Self {
            issuer: issuer.to_owned(),
            audience: audience.to_owned(),
            jwks_url: jwks_url.to_owned(),
            client: reqwest::Client::new(),
            refetch_interval: JWKS_REFETCH_INTERVAL,
            keys: RwLock::new(None),
        }
    }

    /// Minimum time between JWKS fetches triggered by unknown key ids.
    #[must_use]
    pub fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = interval;
        self
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "fetching JWKS");
        let set = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(set)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(cached) = self.keys.read().await.as_ref() {
            if let Some(jwk) = cached.set.find(kid) {
                return Ok(DecodingKey::from_jwk(jwk)?);
            }
            if cached.fetched_at.elapsed() < self.refetch_interval {
                return Err(AuthError::UnknownKey(kid.to_owned()));
            }
        }
        let fresh = self.fetch_jwks().await?;
        let key = fresh.find(kid).map(DecodingKey::from_jwk).transpose()?;
        *self.keys.write().await = Some(CachedJwks { set: fresh, fetched_at: Instant::now() });
        key.ok_or_else(|| AuthError::UnknownKey(kid.to_owned()))
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKid)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        let data = decode::<HashMap<String, Value>>(token, &key, &validation)?;
        Claims::from_payload(data.claims)
    }
}

/// Admin secret plus optional JWT verifier.
#[derive(Debug, Default)]
pub struct AuthConfig {
    pub admin_secret: Option<String>,
    pub jwt: Option<Arc<JwtVerifier>>,
}

impl AuthConfig {
    /// Read `ADMIN_SECRET`, `AUTH0_DOMAIN` and `AUTH0_AUDIENCE`.
    #[must_use]
    pub fn from_env() -> Self {
        let jwt = env_non_empty("AUTH0_DOMAIN").map(|domain| {
            let audience = env_non_empty("AUTH0_AUDIENCE").unwrap_or_default();
            Arc::new(JwtVerifier::for_domain(&domain, &audience))
        });
        let config = Self { admin_secret: env_non_empty("ADMIN_SECRET"), jwt };
        if config.is_open() {
            tracing::warn!("neither ADMIN_SECRET nor AUTH0_DOMAIN set: admin routes are open");
        }
        config
    }

    /// No admin credentials configured at all (local development).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.admin_secret.is_none() && self.jwt.is_none()
    }

    async fn verify_bearer(&self, parts: &Parts) -> Result<Claims, ApiError> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_owned()))?;
        let Some(jwt) = &self.jwt else {
            return Err(ApiError::Unauthorized("Invalid token".to_owned()));
        };
        jwt.verify(token).await.map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::Unauthorized("Invalid token".to_owned())
        })
    }

    pub async fn authorize_admin(&self, parts: &Parts) -> Result<Claims, ApiError> {
        if let Some(secret) = &self.admin_secret {
            let presented = parts.headers.get(ADMIN_SECRET_HEADER).and_then(|v| v.to_str().ok());
            if presented == Some(secret.as_str()) {
                return Ok(Claims::service("service"));
            }
        }
        if self.is_open() {
            return Ok(Claims::service("local"));
        }
        let claims = self.verify_bearer(parts).await?;
        if !claims.is_admin() {
            return Err(ApiError::Forbidden("Admin role required".to_owned()));
        }
        Ok(claims)
    }

    pub async fn authorize_user(&self, parts: &Parts) -> Result<Claims, ApiError> {
        self.verify_bearer(parts).await
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    (scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty()).then(|| token.trim())
}

/// Extractor for admin-only handlers.
pub struct AdminGuard(pub Claims);

impl FromRequestParts<Arc<AppState>> for AdminGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state.auth.authorize_admin(parts).await.map(Self)
    }
}

/// Extractor for handlers that need any signed-in user.
pub struct UserGuard(pub Claims);

impl FromRequestParts<Arc<AppState>> for UserGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state.auth.authorize_user(parts).await.map(Self)
    }
}
