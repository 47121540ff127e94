//! OAuth type definitions.

use serde::{Deserialize, Serialize};

/// The two identity providers the gate accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Github,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Github => "github",
        }
    }

    /// Parse the path segment of `/auth/{provider}`. Unknown names are
    /// treated the same as any other unmatched path.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "google" => Some(Provider::Google),
            "github" => Some(Provider::Github),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Profile data returned by a provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// An authenticated identity plus the provider-scoped bearer credential the
/// eligibility checkers present upstream. Held only in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub provider: Provider,
    pub profile: UserProfile,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!(Provider::parse("google"), Some(Provider::Google));
        assert_eq!(Provider::parse("github"), Some(Provider::Github));
        assert_eq!(Provider::parse("gitlab"), None);
        assert_eq!(Provider::parse("Google"), None);
    }

    #[test]
    fn test_provider_display_round_trip() {
        for provider in [Provider::Google, Provider::Github] {
            assert_eq!(Provider::parse(provider.as_str()), Some(provider));
        }
    }
}
