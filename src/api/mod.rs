//! HTTP surface: login screen, provider round-trips, the gated page and the
//! verification outcome pages. Anything unmatched falls back to `/`.

pub mod auth;
pub mod pages;


use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::oauth::Provider;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::login_screen))
        .route("/auth/:provider", get(auth::initiate))
        .route("/auth/:provider/callback", get(auth::callback))
        .route("/login/success", get(pages::login_success))
        .route("/youtube/verification/failed", get(pages::youtube_failed))
        .route("/github/verification/failed", get(pages::github_failed))
        .route(
            "/verification/unavailable",
            get(pages::verification_unavailable),
        )
        .fallback(fallback)
        .with_state(state)
}

/// Any unmatched path goes back to the login screen.
async fn fallback() -> Redirect {
    Redirect::to("/")
}

/// Where a verified-ineligible visitor lands, per provider.
pub(crate) fn ineligible_redirect(provider: Provider) -> Redirect {
    match provider {
        Provider::Google => Redirect::to("/youtube/verification/failed"),
        Provider::Github => Redirect::to("/github/verification/failed"),
    }
}
