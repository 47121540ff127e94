//! Google identity provider adapter.

use async_trait::async_trait;

use super::{IdentityProvider, ProviderCore};
use crate::error::AuthResult;
use crate::oauth::client::OAuthClient;
use crate::oauth::config::OAuthConfig;
use crate::oauth::types::{Principal, Provider};

/// Google login adapter. The scope set includes a read-only YouTube grant so
/// the resulting bearer credential can drive the subscription query.
pub struct GoogleAdapter {
    core: ProviderCore,
}

impl GoogleAdapter {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        oauth: OAuthClient,
    ) -> Self {
        Self {
            core: ProviderCore {
                config: OAuthConfig::google(client_id, client_secret, redirect_uri),
                oauth,
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleAdapter {
    fn kind(&self) -> Provider {
        Provider::Google
    }

    fn authorize_url(&self, state: &str) -> AuthResult<String> {
        self.core.authorize_url(state)
    }

    async fn handle_callback(&self, code: &str) -> AuthResult<Principal> {
        self.core.complete(Provider::Google, code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_google_authorize_url() {
        let adapter = GoogleAdapter::new(
            "client".to_string(),
            "secret".to_string(),
            "http://localhost/auth/google/callback".to_string(),
            OAuthClient::new(Client::new()),
        );

        assert_eq!(adapter.kind(), Provider::Google);
        let url = adapter.authorize_url("abc123").unwrap();
        assert!(url.starts_with("https://accounts.google.com/"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("youtube.readonly"));
    }
}
