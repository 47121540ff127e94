//! Page handlers and the protected-route guard.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::session::{session_from_headers, unix_now, Session, Verdict};
use crate::state::AppState;

const LOGIN_PAGE: &str = include_str!("../../public/login.html");
const SUCCESS_PAGE: &str = include_str!("../../public/success.html");
const YOUTUBE_FAILED_PAGE: &str = include_str!("../../public/youtube_verification_failed.html");
const GITHUB_FAILED_PAGE: &str = include_str!("../../public/github_verification_failed.html");
const UNAVAILABLE_PAGE: &str = include_str!("../../public/verification_unavailable.html");

/// GET / — always reachable, shows the provider choice.
pub async fn login_screen() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// GET /login/success — the protected resource.
///
/// Requires an authenticated session and an eligible verdict. A cached
/// verdict is only trusted inside the configured freshness window; otherwise
/// the provider's checker runs again, because eligibility can lapse.
pub async fn login_success(State(app): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(session) = session_from_headers(&app.sessions, &headers).await else {
        return Redirect::to("/").into_response();
    };
    let Some(principal) = session.principal.as_ref() else {
        return Redirect::to("/").into_response();
    };

    let now = unix_now();
    let max_age = app.config.verdict_max_age.as_secs();
    if let Some(verdict) = &session.verdict {
        if verdict.provider == principal.provider && verdict.is_fresh(now, max_age) {
            return if verdict.eligible {
                Html(SUCCESS_PAGE).into_response()
            } else {
                super::ineligible_redirect(principal.provider).into_response()
            };
        }
    }

    match app.checkers.get(principal.provider).check(principal).await {
        Ok(eligible) => {
            app.sessions
                .set_verdict(
                    session.session_id,
                    Verdict::new(principal.provider, eligible, now),
                )
                .await;
            if eligible {
                Html(SUCCESS_PAGE).into_response()
            } else {
                tracing::info!(
                    provider = %principal.provider,
                    session_id = %session.session_id,
                    "Eligibility lapsed on protected route"
                );
                super::ineligible_redirect(principal.provider).into_response()
            }
        }
        Err(err) => {
            tracing::warn!(provider = %principal.provider, error = %err, "Eligibility check unavailable");
            Redirect::to("/verification/unavailable").into_response()
        }
    }
}

/// GET /youtube/verification/failed
pub async fn youtube_failed(State(app): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    authenticated_page(&app, &headers, YOUTUBE_FAILED_PAGE).await
}

/// GET /github/verification/failed
pub async fn github_failed(State(app): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    authenticated_page(&app, &headers, GITHUB_FAILED_PAGE).await
}

/// GET /verification/unavailable — checker could not reach a verdict.
pub async fn verification_unavailable(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    authenticated_page(&app, &headers, UNAVAILABLE_PAGE).await
}

/// Outcome pages are only renderable to an authenticated visitor.
async fn authenticated_page(app: &AppState, headers: &HeaderMap, page: &'static str) -> Response {
    match session_from_headers(&app.sessions, headers).await {
        Some(Session {
            principal: Some(_), ..
        }) => Html(page).into_response(),
        _ => Redirect::to("/").into_response(),
    }
}
