//! GitHub identity provider adapter.

use async_trait::async_trait;

use super::{IdentityProvider, ProviderCore};
use crate::error::AuthResult;
use crate::oauth::client::OAuthClient;
use crate::oauth::config::OAuthConfig;
use crate::oauth::types::{Principal, Provider};

/// GitHub login adapter, requesting user-email read access.
pub struct GithubAdapter {
    core: ProviderCore,
}

impl GithubAdapter {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        oauth: OAuthClient,
    ) -> Self {
        Self {
            core: ProviderCore {
                config: OAuthConfig::github(client_id, client_secret, redirect_uri),
                oauth,
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for GithubAdapter {
    fn kind(&self) -> Provider {
        Provider::Github
    }

    fn authorize_url(&self, state: &str) -> AuthResult<String> {
        self.core.authorize_url(state)
    }

    async fn handle_callback(&self, code: &str) -> AuthResult<Principal> {
        self.core.complete(Provider::Github, code).await
    }
}
