//! Google sign-in (OpenID Connect authorization-code flow).
//!
//! The ID token is verified against Google's published signing keys, then
//! its issuer, audience, expiry, nonce and email are checked.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use rand::{Rng, distr::Alphanumeric};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use relyce_core::IdentityUid;

use crate::config::GoogleConfig;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const JWKS_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/certs";
const ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];
const SCOPES: &str = "openid email";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("sign-in request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid ID token: {0}")]
    InvalidToken(&'static str),

    #[error("ID token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Google account email is not verified")]
    UnverifiedEmail,

    #[error("invalid authorization endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// A signed-in identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: IdentityUid,
    pub email: String,
}

/// Identity provider behind the sign-in routes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL to send the browser to.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Url` if the endpoint cannot carry the parameters.
    fn authorization_url(
        &self,
        redirect_uri: &str,
        state: &str,
        nonce: &str,
    ) -> Result<Url, OAuthError>;

    /// Exchange the callback's authorization code for an identity. `nonce`
    /// is the value sent with the authorization request.
    async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
        nonce: &str,
    ) -> Result<Identity, OAuthError>;
}

/// Generate a cryptographically secure random alphanumeric string.
#[must_use]
pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    nonce: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

/// Issuer, audience and expiry rules for an ID token issued to `client_id`.
fn id_token_validation(algorithm: Algorithm, client_id: &str) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.set_issuer(&ISSUERS);
    validation.set_audience(&[client_id]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
    validation
}

/// Pick the signing key named by the token header.
fn signing_key(keys: &JwkSet, id_token: &str) -> Result<DecodingKey, OAuthError> {
    let header = jsonwebtoken::decode_header(id_token)?;
    let kid = header
        .kid
        .ok_or(OAuthError::InvalidToken("no key id in header"))?;
    let jwk = keys
        .find(&kid)
        .ok_or(OAuthError::InvalidToken("signed with an unknown key"))?;
    Ok(DecodingKey::from_jwk(jwk)?)
}

fn verify_id_token(
    id_token: &str,
    key: &DecodingKey,
    validation: &Validation,
    nonce: &str,
) -> Result<Identity, OAuthError> {
    let claims = jsonwebtoken::decode::<IdTokenClaims>(id_token, key, validation)?.claims;

    if claims.nonce.as_deref() != Some(nonce) {
        return Err(OAuthError::InvalidToken("nonce mismatch"));
    }
    let email = claims
        .email
        .filter(|_| claims.email_verified)
        .ok_or(OAuthError::UnverifiedEmail)?;

    Ok(Identity {
        uid: IdentityUid::new(claims.sub),
        email,
    })
}

/// Google OpenID Connect client.
#[derive(Clone)]
pub struct GoogleOidcClient {
    inner: Arc<GoogleOidcClientInner>,
}

struct GoogleOidcClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
}

impl GoogleOidcClient {
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            inner: Arc::new(GoogleOidcClientInner {
                client: reqwest::Client::new(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            }),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleOidcClient {
    fn authorization_url(
        &self,
        redirect_uri: &str,
        state: &str,
        nonce: &str,
    ) -> Result<Url, OAuthError> {
        Ok(Url::parse_with_params(
            AUTHORIZATION_ENDPOINT,
            &[
                ("client_id", self.inner.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", redirect_uri),
                ("scope", SCOPES),
                ("state", state),
                ("nonce", nonce),
                ("prompt", "select_account"),
            ],
        )?)
    }

    async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
        nonce: &str,
    ) -> Result<Identity, OAuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OAuthError::TokenExchange(text));
        }

        let token: TokenResponse = response.json().await?;

        // TODO: cache the key set for the max-age Google sends with it
        let keys: JwkSet = self
            .inner
            .client
            .get(JWKS_ENDPOINT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let key = signing_key(&keys, &token.id_token)?;
        let validation = id_token_validation(Algorithm::RS256, &self.inner.client_id);
        verify_id_token(&token.id_token, &key, &validation, nonce)
    }
}
