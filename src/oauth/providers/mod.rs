//! Identity provider adapters.

pub mod github;
pub mod google;

pub use github::GithubAdapter;
pub use google::GoogleAdapter;

use async_trait::async_trait;

use crate::error::AuthResult;
use crate::oauth::client::OAuthClient;
use crate::oauth::config::OAuthConfig;
use crate::oauth::types::{Principal, Provider};

/// One way of logging a visitor in: send them to the provider, then turn the
/// callback code into an authenticated [`Principal`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Which provider this adapter speaks for
    fn kind(&self) -> Provider;

    /// Authorization redirect target, carrying the anti-forgery state
    fn authorize_url(&self, state: &str) -> AuthResult<String>;

    /// Complete the round-trip: exchange the code, fetch the profile
    async fn handle_callback(&self, code: &str) -> AuthResult<Principal>;
}

/// Shared OAuth plumbing behind both concrete adapters.
pub(super) struct ProviderCore {
    pub config: OAuthConfig,
    pub oauth: OAuthClient,
}

impl ProviderCore {
    pub fn authorize_url(&self, state: &str) -> AuthResult<String> {
        self.oauth.build_auth_url(&self.config, state)
    }

    pub async fn complete(&self, kind: Provider, code: &str) -> AuthResult<Principal> {
        let token = self.oauth.exchange_code(&self.config, code).await?;
        let profile = self
            .oauth
            .get_user_info(&self.config, &token.access_token)
            .await?;

        Ok(Principal {
            provider: kind,
            profile,
            access_token: token.access_token,
        })
    }
}
