use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;

/// Client credentials and callback URL for one OAuth provider.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Google OAuth application credentials
    pub google: OAuthCredentials,

    /// GitHub OAuth application credentials
    pub github: OAuthCredentials,

    /// YouTube channel the visitor must be subscribed to
    pub channel_id: String,

    /// GitHub account the visitor must follow
    pub follow_account: String,

    /// Whether the session cookie carries the Secure flag
    pub cookie_secure: bool,

    /// Timeout for outbound provider/API calls (single attempt, no retry)
    pub upstream_timeout: Duration,

    /// How long a cached eligibility verdict is trusted on the protected
    /// route before it is recomputed. Zero means every entry re-checks.
    pub verdict_max_age: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All secrets and target identifiers are required; missing variables are
    /// reported by name before the listener ever starts.
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()?;

        let google = OAuthCredentials {
            client_id: require_env("GOOGLE_CLIENT_ID")?,
            client_secret: require_env("GOOGLE_CLIENT_SECRET")?,
            callback_url: require_env("CALLBACK_URL_GOOGLE")?,
        };

        let github = OAuthCredentials {
            client_id: require_env("GITHUB_CLIENT_ID")?,
            client_secret: require_env("GITHUB_CLIENT_SECRET")?,
            callback_url: require_env("CALLBACK_URL_GITHUB")?,
        };

        let channel_id = require_env("CHANNEL_ID")?;
        let follow_account = require_env("FOLLOW_ACCOUNT")?;

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let upstream_timeout = Duration::from_secs(
            std::env::var("UPSTREAM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
        );

        let verdict_max_age = Duration::from_secs(
            std::env::var("VERDICT_MAX_AGE_SECONDS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,
        );

        Ok(Config {
            bind_address,
            google,
            github,
            channel_id,
            follow_account,
            cookie_secure,
            upstream_timeout,
            verdict_max_age,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} environment variable required", name))
}
