//! Credential resolution for Google Cloud APIs.
//!
//! Two trust paths, first-present-wins:
//!
//! 1. a pre-generated bearer token is returned verbatim;
//! 2. a service-account key drives the JWT → access-token exchange documented at
//!    <https://developers.google.com/identity/protocols/oauth2/service-account>:
//!    sign a JWT with the key's RSA private key, POST it to the token endpoint,
//!    receive an access token.
//!
//! Tokens are not cached; every invocation resolves again.

use crate::config::{AppConfig, Credentials, ServiceAccountKey, CLOUD_PLATFORM_SCOPE};
use crate::descriptor::CredentialModes;
use crate::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// JWT claims for Google OAuth2.
#[derive(Debug, Serialize)]
struct JwtClaims {
    /// Issuer: the service account email.
    iss: String,
    /// Requested scopes (space-separated).
    scope: String,
    /// Audience: the token endpoint.
    aud: String,
    exp: i64,
    iat: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    expires_in: Option<i64>,
    #[allow(dead_code)]
    token_type: Option<String>,
}

/// Turns application configuration into a bearer token.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    http: Client,
}

impl CredentialResolver {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Resolve a bearer token for an operation needing `scopes`.
    pub async fn resolve(
        &self,
        config: &AppConfig,
        scopes: &[String],
        modes: CredentialModes,
    ) -> Result<String, AuthError> {
        match config.credentials(modes) {
            Some(Credentials::PreGeneratedToken(token)) => {
                debug!("Using caller-supplied access token");
                Ok(token.to_string())
            }
            Some(Credentials::ServiceAccountKey(json)) => {
                let key = ServiceAccountKey::from_json(json).map_err(AuthError::MalformedCredentials)?;
                self.exchange(&key, &scope_union(scopes)).await
            }
            None => Err(AuthError::NoCredentialsConfigured(missing_reason(config, modes))),
        }
    }

    /// Exchange a signed JWT assertion for an access token.
    async fn exchange(&self, key: &ServiceAccountKey, scopes: &[String]) -> Result<String, AuthError> {
        let assertion = sign_assertion(key, scopes, Utc::now().timestamp())?;

        debug!(
            "GCP token request for {} → {} (scopes: {})",
            key.client_email,
            key.token_uri,
            scopes.join(" ")
        );

        let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];
        let response = self
            .http
            .post(&key.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchangeFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(format!("invalid token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(AuthError::TokenExchangeFailed(
                "token endpoint returned an empty access_token".to_string(),
            ));
        }
        Ok(token.access_token)
    }
}

/// Build and sign the RS256 assertion.
fn sign_assertion(key: &ServiceAccountKey, scopes: &[String], now: i64) -> Result<String, AuthError> {
    let claims = JwtClaims {
        iss: key.client_email.clone(),
        scope: scopes.join(" "),
        aud: key.token_uri.clone(),
        exp: now + ASSERTION_LIFETIME_SECS,
        iat: now,
    };

    let header = Header {
        alg: Algorithm::RS256,
        kid: key.private_key_id.clone(),
        ..Default::default()
    };

    // Keys pasted through some UIs carry literal "\n" sequences.
    let pem = key.private_key.replace("\\n", "\n");
    let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
        .map_err(|e| AuthError::MalformedCredentials(format!("unusable private key: {}", e)))?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| AuthError::MalformedCredentials(format!("failed to sign JWT: {}", e)))
}

/// De-duplicated scopes in declaration order; cloud-platform when none declared.
pub fn scope_union(scopes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(scopes.len());
    for s in scopes {
        if !s.is_empty() && !out.contains(s) {
            out.push(s.clone());
        }
    }
    if out.is_empty() {
        out.push(CLOUD_PLATFORM_SCOPE.to_string());
    }
    out
}

fn missing_reason(config: &AppConfig, modes: CredentialModes) -> String {
    let has_token = config.access_token.as_deref().is_some_and(|t| !t.is_empty());
    if has_token && !modes.access_token {
        "this operation requires a service account key; access tokens are not accepted".to_string()
    } else {
        "provide an access token or a service account key".to_string()
    }
}
