use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;

use crate::config::Config;
use crate::eligibility::{EligibilityChecker, FollowChecker, SubscriptionChecker};
use crate::oauth::{GithubAdapter, GoogleAdapter, IdentityProvider, OAuthClient, Provider};
use crate::session::SessionStore;

/// A pair of values indexed by identity provider.
pub struct PerProvider<T> {
    pub google: T,
    pub github: T,
}

impl<T> PerProvider<T> {
    pub fn get(&self, provider: Provider) -> &T {
        match provider {
            Provider::Google => &self.google,
            Provider::Github => &self.github,
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub adapters: PerProvider<Arc<dyn IdentityProvider>>,
    pub checkers: PerProvider<Arc<dyn EligibilityChecker>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        // One shared client: bounded timeout, single attempt, no retries.
        // GitHub rejects requests without a User-Agent.
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(concat!("fangate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let oauth = OAuthClient::new(http.clone());

        let adapters = PerProvider::<Arc<dyn IdentityProvider>> {
            google: Arc::new(GoogleAdapter::new(
                config.google.client_id.clone(),
                config.google.client_secret.clone(),
                config.google.callback_url.clone(),
                oauth.clone(),
            )),
            github: Arc::new(GithubAdapter::new(
                config.github.client_id.clone(),
                config.github.client_secret.clone(),
                config.github.callback_url.clone(),
                oauth,
            )),
        };

        let checkers = PerProvider::<Arc<dyn EligibilityChecker>> {
            google: Arc::new(SubscriptionChecker::new(
                http.clone(),
                config.channel_id.clone(),
            )),
            github: Arc::new(FollowChecker::new(http, config.follow_account.clone())),
        };

        Ok(AppState {
            config,
            sessions: SessionStore::new(),
            adapters,
            checkers,
        })
    }
}
