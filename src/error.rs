use thiserror::Error;

/// Failures while driving the OAuth login round-trip.
///
/// All of these surface to the visitor as a plain redirect to `/`, the same
/// as "not logged in"; the detail only reaches the logs.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("Invalid OAuth configuration: {0}")]
    ConfigInvalid(String),

    #[error("OAuth provider error: {0}")]
    ProviderError(String),
}

pub type AuthResult<T> = std::result::Result<T, AuthFlowError>;

/// Failures of an eligibility query that prevent reaching a verdict.
///
/// Distinct from "verified ineligible": a checker that gets a well-formed
/// upstream answer returns `Ok(false)` instead. These route to the
/// "temporarily unable to verify" page.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Eligibility request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Unexpected upstream response: {0}")]
    Malformed(String),
}

pub type CheckResult<T> = std::result::Result<T, CheckError>;
