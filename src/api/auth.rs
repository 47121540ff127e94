//! Login initiation and provider callbacks.
//!
//! Every failure on this path is a ProviderAuthFailure from the visitor's
//! point of view: redirect home, same as "not logged in". Only the logs see
//! the difference.

use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::session::{
    establish_session, session_from_headers, unix_now, PendingLogin, Verdict, LOGIN_STATE_TTL_SECS,
};
use crate::oauth::Provider;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/:provider
pub async fn initiate(
    State(app): State<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(provider) = Provider::parse(&provider) else {
        return Redirect::to("/").into_response();
    };

    let (session_id, set_cookie) =
        establish_session(&app.sessions, &headers, app.config.cookie_secure).await;

    let login_state = hex::encode(rand::random::<[u8; 32]>());
    app.sessions
        .set_pending_login(
            session_id,
            PendingLogin {
                provider,
                state: login_state.clone(),
                expires_at: unix_now() + LOGIN_STATE_TTL_SECS,
            },
        )
        .await;

    let url = match app.adapters.get(provider).authorize_url(&login_state) {
        Ok(url) => url,
        Err(err) => {
            tracing::error!(provider = %provider, error = %err, "Failed to build authorization URL");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(provider = %provider, session_id = %session_id, "Login initiated");

    let mut response = Redirect::to(&url).into_response();
    if let Some(cookie) = set_cookie {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

/// GET /auth/:provider/callback
///
/// On adapter success the session becomes AUTHENTICATED and the matching
/// eligibility checker runs immediately; the visitor lands on the gated page,
/// the provider's ineligible page, or the unavailable page.
pub async fn callback(
    State(app): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(provider) = Provider::parse(&provider) else {
        return Redirect::to("/").into_response();
    };

    let Some(session) = session_from_headers(&app.sessions, &headers).await else {
        return Redirect::to("/").into_response();
    };

    if let Some(error) = query.error {
        tracing::info!(provider = %provider, error = %error, "Provider reported login failure");
        return Redirect::to("/").into_response();
    }

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        return Redirect::to("/").into_response();
    };

    let Some(pending) = app.sessions.take_pending_login(session.session_id).await else {
        tracing::warn!(provider = %provider, "Callback without a pending login");
        return Redirect::to("/").into_response();
    };

    if pending.provider != provider
        || pending.state != returned_state
        || pending.expires_at < unix_now()
    {
        tracing::warn!(provider = %provider, "Login state mismatch or expired");
        return Redirect::to("/").into_response();
    }

    let principal = match app.adapters.get(provider).handle_callback(&code).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(provider = %provider, error = %err, "Provider callback failed");
            return Redirect::to("/").into_response();
        }
    };

    tracing::info!(
        provider = %provider,
        session_id = %session.session_id,
        user_id = %principal.profile.id,
        "Visitor authenticated"
    );

    app.sessions
        .set_principal(session.session_id, principal.clone())
        .await;

    match app.checkers.get(provider).check(&principal).await {
        Ok(eligible) => {
            app.sessions
                .set_verdict(
                    session.session_id,
                    Verdict::new(provider, eligible, unix_now()),
                )
                .await;
            if eligible {
                Redirect::to("/login/success").into_response()
            } else {
                super::ineligible_redirect(provider).into_response()
            }
        }
        Err(err) => {
            tracing::warn!(provider = %provider, error = %err, "Eligibility check unavailable");
            Redirect::to("/verification/unavailable").into_response()
        }
    }
}
