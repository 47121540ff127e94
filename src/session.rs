//! In-memory session store keyed by an opaque cookie-borne id.
//!
//! A missing or unparseable cookie is "no session", never an error; callers
//! redirect to the login screen. Mutations are scoped to the request holding
//! the cookie, so there is no cross-session contention; concurrent requests
//! within one session are last-write-wins.

use axum::http::{HeaderMap, HeaderValue};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::oauth::types::{Principal, Provider};

pub const SESSION_COOKIE: &str = "fangate_session";

/// Seconds an in-flight login round-trip stays valid.
pub const LOGIN_STATE_TTL_SECS: u64 = 600;

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// An in-flight login round-trip: which provider we sent the visitor to and
/// the anti-forgery state the callback must echo. Single use.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub provider: Provider,
    pub state: String,
    pub expires_at: u64,
}

/// Outcome of one eligibility query at a point in time. Only meaningful
/// together with the principal that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Verdict {
    pub provider: Provider,
    pub eligible: bool,
    pub checked_at: u64,
}

impl Verdict {
    pub fn new(provider: Provider, eligible: bool, checked_at: u64) -> Self {
        Self {
            provider,
            eligible,
            checked_at,
        }
    }

    /// Whether this verdict is still trusted at `now` under the configured
    /// window. A zero window means never: every protected entry re-checks.
    pub fn is_fresh(&self, now: u64, max_age_secs: u64) -> bool {
        now.saturating_sub(self.checked_at) < max_age_secs
    }
}

/// Per-visitor server-side state.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub principal: Option<Principal>,
    pub verdict: Option<Verdict>,
    pub pending_login: Option<PendingLogin>,
    pub created_at: u64,
}

#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty session and return its id.
    pub async fn create(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        let session = Session {
            session_id,
            principal: None,
            verdict: None,
            pending_login: None,
            created_at: unix_now(),
        };
        self.inner.write().await.insert(session_id, session);
        session_id
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn set_pending_login(&self, id: Uuid, pending: PendingLogin) {
        if let Some(session) = self.inner.write().await.get_mut(&id) {
            session.pending_login = Some(pending);
        }
    }

    pub async fn take_pending_login(&self, id: Uuid) -> Option<PendingLogin> {
        self.inner.write().await.get_mut(&id)?.pending_login.take()
    }

    /// Attach an authenticated principal. Any prior verdict belonged to the
    /// previous principal and is invalidated here.
    pub async fn set_principal(&self, id: Uuid, principal: Principal) {
        if let Some(session) = self.inner.write().await.get_mut(&id) {
            session.principal = Some(principal);
            session.verdict = None;
        }
    }

    pub async fn set_verdict(&self, id: Uuid, verdict: Verdict) {
        if let Some(session) = self.inner.write().await.get_mut(&id) {
            session.verdict = Some(verdict);
        }
    }
}

/// Session id from the request cookie, if any. Garbage is "no session".
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let raw = parse_cookie(headers, SESSION_COOKIE)?;
    Uuid::parse_str(&raw).ok()
}

/// Resolve the visitor's session from the request headers.
pub async fn session_from_headers(store: &SessionStore, headers: &HeaderMap) -> Option<Session> {
    let id = session_id_from_headers(headers)?;
    store.get(id).await
}

/// Look up an existing session or create one, returning a `Set-Cookie` value
/// only when a session was created.
pub async fn establish_session(
    store: &SessionStore,
    headers: &HeaderMap,
    secure: bool,
) -> (Uuid, Option<HeaderValue>) {
    if let Some(id) = session_id_from_headers(headers) {
        if store.get(id).await.is_some() {
            return (id, None);
        }
    }
    let id = store.create().await;
    (id, session_cookie_value(id, secure))
}

/// Build the session cookie. SameSite=Lax, not Strict: the provider callback
/// is a cross-site top-level navigation and must still carry the cookie.
fn session_cookie_value(id: Uuid, secure: bool) -> Option<HeaderValue> {
    let flags = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/{}",
        SESSION_COOKIE, id, flags
    ))
    .ok()
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::types::UserProfile;

    fn principal(provider: Provider) -> Principal {
        Principal {
            provider,
            profile: UserProfile {
                id: "u1".to_string(),
                email: Some("fan@example.com".to_string()),
                name: None,
            },
            access_token: "token".to_string(),
        }
    }

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let id = store.create().await;

        let session = store.get(id).await.unwrap();
        assert_eq!(session.session_id, id);
        assert!(session.principal.is_none());
        assert!(session.verdict.is_none());
    }

    #[tokio::test]
    async fn test_missing_session_is_none() {
        let store = SessionStore::new();
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_set_principal_invalidates_verdict() {
        let store = SessionStore::new();
        let id = store.create().await;

        store.set_principal(id, principal(Provider::Google)).await;
        store
            .set_verdict(id, Verdict::new(Provider::Google, true, unix_now()))
            .await;
        assert!(store.get(id).await.unwrap().verdict.unwrap().eligible);

        // Switching provider must drop the cached verdict
        store.set_principal(id, principal(Provider::Github)).await;
        let session = store.get(id).await.unwrap();
        assert_eq!(session.principal.unwrap().provider, Provider::Github);
        assert!(session.verdict.is_none());
    }

    #[tokio::test]
    async fn test_pending_login_is_single_use() {
        let store = SessionStore::new();
        let id = store.create().await;

        store
            .set_pending_login(
                id,
                PendingLogin {
                    provider: Provider::Google,
                    state: "s1".to_string(),
                    expires_at: unix_now() + 600,
                },
            )
            .await;

        assert_eq!(store.take_pending_login(id).await.unwrap().state, "s1");
        assert!(store.take_pending_login(id).await.is_none());
    }

    #[test]
    fn test_verdict_freshness() {
        let verdict = Verdict::new(Provider::Google, true, 1_000);
        // Zero window: never fresh, even at the instant it was computed
        assert!(!verdict.is_fresh(1_000, 0));
        assert!(verdict.is_fresh(1_000, 60));
        assert!(verdict.is_fresh(1_059, 60));
        assert!(!verdict.is_fresh(1_060, 60));
    }

    #[test]
    fn test_cookie_parsing() {
        let id = Uuid::new_v4();
        let headers = cookie_headers(&format!("other=1; {}={}", SESSION_COOKIE, id));
        assert_eq!(session_id_from_headers(&headers), Some(id));

        let headers = cookie_headers(&format!("{}=not-a-uuid", SESSION_COOKIE));
        assert_eq!(session_id_from_headers(&headers), None);

        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_establish_session_reuses_live_sessions() {
        let store = SessionStore::new();
        let (first, cookie) = establish_session(&store, &HeaderMap::new(), false).await;
        let cookie = cookie.expect("new session sets a cookie");
        assert!(cookie.to_str().unwrap().contains("HttpOnly"));
        assert!(!cookie.to_str().unwrap().contains("Secure"));

        let headers = cookie_headers(&format!("{}={}", SESSION_COOKIE, first));
        let (second, cookie) = establish_session(&store, &headers, false).await;
        assert_eq!(first, second);
        assert!(cookie.is_none());
    }

    #[tokio::test]
    async fn test_establish_session_secure_flag() {
        let store = SessionStore::new();
        let (_, cookie) = establish_session(&store, &HeaderMap::new(), true).await;
        assert!(cookie.unwrap().to_str().unwrap().contains("Secure"));
    }
}
