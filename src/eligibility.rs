//! Eligibility checkers: one upstream query, one boolean verdict.
//!
//! Both checkers are idempotent and side-effect-free apart from the outbound
//! call. A well-formed upstream answer that does not signal eligibility is
//! `Ok(false)`; only transport-level trouble is an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{CheckError, CheckResult};
use crate::oauth::types::Principal;

const YOUTUBE_SUBSCRIPTIONS_URL: &str = "https://www.googleapis.com/youtube/v3/subscriptions";
const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Query an external membership/following signal for a principal.
#[async_trait]
pub trait EligibilityChecker: Send + Sync {
    async fn check(&self, principal: &Principal) -> CheckResult<bool>;
}

// ============================================================================
// YouTube subscription checker (Google path)
// ============================================================================

/// Is the bearer's account subscribed to the configured channel?
pub struct SubscriptionChecker {
    http: Client,
    channel_id: String,
}

impl SubscriptionChecker {
    pub fn new(http: Client, channel_id: String) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl EligibilityChecker for SubscriptionChecker {
    async fn check(&self, principal: &Principal) -> CheckResult<bool> {
        let response = self
            .http
            .get(YOUTUBE_SUBSCRIPTIONS_URL)
            .query(&[
                ("part", "snippet"),
                ("forChannelId", self.channel_id.as_str()),
                ("mine", "true"),
            ])
            .bearer_auth(&principal.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CheckError::UpstreamStatus(response.status()));
        }

        let body = response.text().await?;
        parse_subscription_page(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SubscriptionPage {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// Subscribed iff the subscriptions listing has at least one item.
fn parse_subscription_page(body: &str) -> CheckResult<bool> {
    let page: SubscriptionPage =
        serde_json::from_str(body).map_err(|e| CheckError::Malformed(e.to_string()))?;
    Ok(!page.items.is_empty())
}

// ============================================================================
// GitHub follow checker
// ============================================================================

/// Does the bearer's account follow the configured GitHub account?
pub struct FollowChecker {
    http: Client,
    account: String,
}

impl FollowChecker {
    pub fn new(http: Client, account: String) -> Self {
        Self { http, account }
    }
}

#[async_trait]
impl EligibilityChecker for FollowChecker {
    async fn check(&self, principal: &Principal) -> CheckResult<bool> {
        let url = format!("{}/user/following/{}", GITHUB_API_URL, self.account);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&principal.access_token)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        Ok(is_following(response.status()))
    }
}

/// GitHub signals "is following" with 204 No Content; every other status,
/// including 404 "not following", is ineligible.
fn is_following(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_page_with_items() {
        let body = r#"{"kind":"youtube#SubscriptionListResponse","items":[{"snippet":{"title":"c"}}]}"#;
        assert!(parse_subscription_page(body).unwrap());
    }

    #[test]
    fn test_subscription_page_empty() {
        assert!(!parse_subscription_page(r#"{"items":[]}"#).unwrap());
        // No items field at all reads as not subscribed, not as an error
        assert!(!parse_subscription_page("{}").unwrap());
    }

    #[test]
    fn test_subscription_page_malformed() {
        assert!(matches!(
            parse_subscription_page("not json"),
            Err(CheckError::Malformed(_))
        ));
    }

    #[test]
    fn test_follow_status_mapping() {
        assert!(is_following(reqwest::StatusCode::NO_CONTENT));
        assert!(!is_following(reqwest::StatusCode::NOT_FOUND));
        assert!(!is_following(reqwest::StatusCode::OK));
        assert!(!is_following(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }
}
