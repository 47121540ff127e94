//! Generic OAuth client for provider interactions.

use crate::error::{AuthFlowError, AuthResult};
use crate::oauth::config::OAuthConfig;
use crate::oauth::types::{OAuthTokenResponse, UserProfile};
use reqwest::Client;
use std::collections::HashMap;
use url::Url;

/// OAuth client for provider interactions
#[derive(Clone)]
pub struct OAuthClient {
    http_client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client on top of a shared HTTP client.
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Build authorization URL
    pub fn build_auth_url(&self, config: &OAuthConfig, state: &str) -> AuthResult<String> {
        let mut url = Url::parse(&config.auth_url)
            .map_err(|e| AuthFlowError::ConfigInvalid(format!("Invalid auth URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &config.scopes.join(" "))
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Exchange authorization code for access token
    pub async fn exchange_code(
        &self,
        config: &OAuthConfig,
        code: &str,
    ) -> AuthResult<OAuthTokenResponse> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", &config.redirect_uri);
        params.insert("client_id", &config.client_id);
        params.insert("client_secret", &config.client_secret);

        let response = self
            .http_client
            .post(&config.token_url)
            // GitHub answers form-encoded unless JSON is requested explicitly
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthFlowError::ProviderError(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthFlowError::ProviderError(format!(
                "Token exchange failed with status {}: {}",
                status, body
            )));
        }

        let token_response: OAuthTokenResponse = response.json().await.map_err(|e| {
            AuthFlowError::ProviderError(format!("Failed to parse token response: {}", e))
        })?;

        Ok(token_response)
    }

    /// Get user info from provider
    pub async fn get_user_info(
        &self,
        config: &OAuthConfig,
        access_token: &str,
    ) -> AuthResult<UserProfile> {
        let response = self
            .http_client
            .get(&config.user_info_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AuthFlowError::ProviderError(format!("User info request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthFlowError::ProviderError(format!(
                "User info request failed with status {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            AuthFlowError::ProviderError(format!("Failed to parse user info: {}", e))
        })?;

        profile_from_json(&json)
    }
}

/// Extract a profile from a user-info payload. Google returns a string `id`;
/// GitHub returns a numeric one.
fn profile_from_json(json: &serde_json::Value) -> AuthResult<UserProfile> {
    let id = json["id"]
        .as_str()
        .map(|s| s.to_string())
        .or_else(|| json["id"].as_i64().map(|n| n.to_string()))
        .or_else(|| json["sub"].as_str().map(|s| s.to_string()))
        .ok_or_else(|| AuthFlowError::ProviderError("Missing user ID".to_string()))?;

    Ok(UserProfile {
        id,
        email: json["email"].as_str().map(|s| s.to_string()),
        name: json["name"]
            .as_str()
            .or_else(|| json["login"].as_str())
            .map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::config::OAuthConfig;
    use serde_json::json;

    #[test]
    fn test_build_auth_url() {
        let config = OAuthConfig::google(
            "test_client".to_string(),
            "test_secret".to_string(),
            "http://localhost/callback".to_string(),
        );

        let client = OAuthClient::new(Client::new());
        let url = client.build_auth_url(&config, "test_state").unwrap();

        assert!(url.contains("client_id=test_client"));
        assert!(url.contains("state=test_state"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("youtube.readonly"));
    }

    #[test]
    fn test_profile_from_google_payload() {
        let profile = profile_from_json(&json!({
            "id": "108912",
            "email": "fan@example.com",
            "name": "A Fan"
        }))
        .unwrap();
        assert_eq!(profile.id, "108912");
        assert_eq!(profile.email.as_deref(), Some("fan@example.com"));
    }

    #[test]
    fn test_profile_from_github_payload() {
        // GitHub ids are numbers and the display handle is `login`
        let profile = profile_from_json(&json!({
            "id": 583231,
            "login": "octocat"
        }))
        .unwrap();
        assert_eq!(profile.id, "583231");
        assert_eq!(profile.name.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_profile_missing_id() {
        assert!(profile_from_json(&json!({ "email": "x@example.com" })).is_err());
    }
}
