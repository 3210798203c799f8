use serde::{Deserialize, Serialize};

/// Body returned by Google's OAuth2 token endpoint for both the refresh-token
/// and the JWT-bearer grants.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
}
