//! OAuth provider integration.
//!
//! This module provides:
//! - Generic OAuth 2.0 authorization-code client
//! - Provider-specific adapters (Google, GitHub)
//!
//! # Security Note
//! Access tokens live only inside the visitor's session `Principal` and are
//! discarded with the session. Nothing here is persisted.

pub mod client;
pub mod config;
pub mod providers;
pub mod types;

pub use client::OAuthClient;
pub use config::OAuthConfig;
pub use providers::{GithubAdapter, GoogleAdapter, IdentityProvider};
pub use types::{OAuthTokenResponse, Principal, Provider, UserProfile};
