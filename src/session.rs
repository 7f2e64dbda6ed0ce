//! Server-side login sessions carried in the `regdesk_session` cookie.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "regdesk_session";

/// Longest accepted session lifetime, one leap year
pub const MAX_TIMEOUT_HOURS: i64 = 24 * 366;

#[derive(Clone, Debug)]
struct Session {
    token: String,
    created_at: DateTime<Utc>,
    admin_name: String,
}

pub struct SessionStore {
    sessions: RwLock<Vec<Session>>,
    timeout: Duration,
}

impl SessionStore {
    /// `timeout_hours` is clamped to `1..=MAX_TIMEOUT_HOURS`; config loading
    /// rejects values outside that range before they get here.
    pub fn new(timeout_hours: i64) -> Self {
        Self {
            sessions: RwLock::new(Vec::new()),
            timeout: Duration::hours(timeout_hours.clamp(1, MAX_TIMEOUT_HOURS)),
        }
    }

    /// Create a new session and return its token
    pub fn create(&self, admin_name: &str) -> String {
        self.create_at(admin_name, Utc::now())
    }

    fn create_at(&self, admin_name: &str, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            token: token.clone(),
            created_at: now,
            admin_name: admin_name.to_string(),
        };

        // Clean up expired sessions and add new one
        let mut sessions = self.sessions.write();
        let cutoff = now - self.timeout;
        sessions.retain(|s| s.created_at > cutoff);
        sessions.push(session);

        token
    }

    /// Display name of the admin owning a live session
    pub fn validate(&self, token: &str) -> Option<String> {
        let sessions = self.sessions.read();
        let cutoff = Utc::now() - self.timeout;

        sessions
            .iter()
            .find(|s| s.token == token && s.created_at > cutoff)
            .map(|s| s.admin_name.clone())
    }

    pub fn remove(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|s| s.token != token);
        sessions.len() != before
    }
}

/// Get session token from cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

pub fn set_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict")
}

pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn created_sessions_validate_until_removed() {
        let store = SessionStore::new(24);
        let token = store.create("System Administrator");
        assert_eq!(store.validate(&token).as_deref(), Some("System Administrator"));
        assert!(store.remove(&token));
        assert!(store.validate(&token).is_none());
        assert!(!store.remove(&token));
    }

    #[test]
    fn expired_sessions_do_not_validate() {
        let store = SessionStore::new(1);
        let token = store.create_at("old", Utc::now() - Duration::hours(2));
        assert!(store.validate(&token).is_none());
    }

    #[test]
    fn expired_sessions_are_pruned_on_create() {
        let store = SessionStore::new(1);
        store.create_at("old", Utc::now() - Duration::hours(2));
        store.create("new");
        assert_eq!(store.sessions.read().len(), 1);
    }

    #[test]
    fn pruning_uses_the_creation_clock() {
        let store = SessionStore::new(1);
        let start = Utc::now() - Duration::hours(10);
        store.create_at("first", start);
        store.create_at("second", start + Duration::minutes(30));
        assert_eq!(store.sessions.read().len(), 2);

        store.create_at("third", start + Duration::hours(2));
        let names: Vec<String> = store.sessions.read().iter().map(|s| s.admin_name.clone()).collect();
        assert_eq!(names, vec!["third".to_string()]);
    }

    #[test]
    fn out_of_range_timeouts_are_clamped() {
        let store = SessionStore::new(i64::MAX);
        assert_eq!(store.timeout, Duration::hours(MAX_TIMEOUT_HOURS));
        let token = store.create("someone");
        assert!(store.validate(&token).is_some());

        let store = SessionStore::new(-5);
        assert_eq!(store.timeout, Duration::hours(1));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let store = SessionStore::new(24);
        store.create("someone");
        assert!(store.validate("not-a-token").is_none());
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; regdesk_session=abc-123; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_cleared_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());
        headers.insert(header::COOKIE, HeaderValue::from_static("regdesk_session="));
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn cookie_strings() {
        assert_eq!(
            set_cookie("t"),
            "regdesk_session=t; Path=/; HttpOnly; SameSite=Strict"
        );
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
