use std::{fs, path::Path};

use anyhow::Context;
use chrono::Utc;
use derive_more::derive::Display;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{model::response::GoogleTokenResponse, HttpClient};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 60 * 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is invalid", path.display()))
}

/// Authorized-user OAuth credentials, in the layout Google's client libraries
/// write to `token.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl AuthorizedUserCredentials {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        read_json(path)
    }
}

/// Service-account key as downloaded from the cloud console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        read_json(path)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

impl AssertionClaims {
    fn new(key: &ServiceAccountKey, scope: &str, issued_at: i64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: scope.to_string(),
            aud: key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_TTL_SECS,
        }
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Token has been expired or revoked")]
    ExpiredOrRevoked,
    #[display("Bad OAuth response")]
    BadOauthResponse,
    #[display("Could not sign token assertion: {_0}")]
    Signing(String),
    #[display("Unexpected OAuth error: {_0}")]
    Unexpected(String),
}

impl std::error::Error for AuthError {}

pub type AuthResult<T> = Result<T, AuthError>;

/// Exchange the stored refresh token for a short-lived Gmail access token.
pub async fn exchange_refresh_token(
    http_client: &HttpClient,
    credentials: &AuthorizedUserCredentials,
) -> AuthResult<GoogleTokenResponse> {
    let AuthorizedUserCredentials {
        client_id,
        client_secret,
        refresh_token,
        token_uri,
    } = credentials;

    let resp = http_client
        .post(token_uri)
        .form(&[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Error refreshing token: {:?}", e);
            AuthError::BadOauthResponse
        })?;

    let resp = resp.json::<serde_json::Value>().await.map_err(|e| {
        tracing::error!("Unexpected serde error: {:?}", e);
        AuthError::Unexpected(e.to_string())
    })?;

    parse_token_response(resp)
}

/// Sign a JWT-bearer assertion with the service-account key and trade it for
/// an access token carrying `scope`.
pub async fn exchange_service_account_assertion(
    http_client: &HttpClient,
    key: &ServiceAccountKey,
    scope: &str,
) -> AuthResult<GoogleTokenResponse> {
    let assertion = sign_assertion(key, scope, Utc::now().timestamp())?;

    let resp = http_client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Error exchanging service account assertion: {:?}", e);
            AuthError::BadOauthResponse
        })?;

    let resp = resp.json::<serde_json::Value>().await.map_err(|e| {
        tracing::error!("Unexpected serde error: {:?}", e);
        AuthError::Unexpected(e.to_string())
    })?;

    parse_token_response(resp)
}

fn sign_assertion(key: &ServiceAccountKey, scope: &str, issued_at: i64) -> AuthResult<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| AuthError::Signing(e.to_string()))?;
    let claims = AssertionClaims::new(key, scope, issued_at);

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| AuthError::Signing(e.to_string()))
}

fn parse_token_response(resp: serde_json::Value) -> AuthResult<GoogleTokenResponse> {
    if resp.get("error").is_some() {
        return match resp.get("error_description").and_then(|d| d.as_str()) {
            Some("Token has been expired or revoked.") => Err(AuthError::ExpiredOrRevoked),
            Some(desc) => {
                tracing::error!("Unexpected error getting token: {:?}", desc);
                Err(AuthError::Unexpected(desc.to_string()))
            }
            None => {
                tracing::error!("Unknown error getting token: {:?}", resp);
                Err(AuthError::Unexpected(resp.to_string()))
            }
        };
    }

    serde_json::from_value::<GoogleTokenResponse>(resp.clone()).map_err(|_| {
        tracing::error!("Unexpected oauth2 response: {:?}", resp);
        AuthError::BadOauthResponse
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn service_account() -> ServiceAccountKey {
        serde_json::from_value(json!({
            "type": "service_account",
            "client_email": "rfq-bot@project.iam.gserviceaccount.com",
            "private_key": "not a pem",
        }))
        .unwrap()
    }

    #[test]
    fn test_authorized_user_defaults_token_uri() {
        let creds: AuthorizedUserCredentials = serde_json::from_value(json!({
            "token": "stale",
            "client_id": "id",
            "client_secret": "secret",
            "refresh_token": "refresh",
            "scopes": ["https://www.googleapis.com/auth/gmail.modify"],
        }))
        .unwrap();

        assert_eq!(creds.token_uri, DEFAULT_TOKEN_URI);
        assert_eq!(creds.refresh_token, "refresh");
    }

    #[test]
    fn test_assertion_claims() {
        let claims = AssertionClaims::new(&service_account(), SHEETS_SCOPE, 1_700_000_000);
        assert_eq!(
            claims,
            AssertionClaims {
                iss: "rfq-bot@project.iam.gserviceaccount.com".to_string(),
                scope: SHEETS_SCOPE.to_string(),
                aud: DEFAULT_TOKEN_URI.to_string(),
                iat: 1_700_000_000,
                exp: 1_700_003_600,
            }
        );
    }

    #[test]
    fn test_invalid_private_key_fails_signing() {
        let result = sign_assertion(&service_account(), SHEETS_SCOPE, 0);
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let debug = format!("{:?}", service_account());
        assert!(!debug.contains("not a pem"));
    }

    #[test]
    fn test_parse_token_response() {
        let ok = parse_token_response(json!({
            "access_token": "ya29",
            "token_type": "Bearer",
            "expires_in": 3599,
        }))
        .unwrap();
        assert_eq!(ok.access_token, "ya29");
        assert_eq!(ok.scope, None);

        let revoked = parse_token_response(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked.",
        }));
        assert!(matches!(revoked, Err(AuthError::ExpiredOrRevoked)));

        let other = parse_token_response(json!({"error": "invalid_client"}));
        assert!(matches!(other, Err(AuthError::Unexpected(_))));

        let malformed = parse_token_response(json!({"unexpected": true}));
        assert!(matches!(malformed, Err(AuthError::BadOauthResponse)));
    }
}
