#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use regdesk::config::{AdminConfig, Config, SessionConfig};
use regdesk::credentials::CredentialStore;
use regdesk::{server, AppState};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn requiring_session() -> Self {
        Self::with_config(|config| {
            config.session = SessionConfig {
                require_session: true,
                ..SessionConfig::default()
            }
        })
    }

    pub fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            admin: AdminConfig {
                credentials_file: dir.path().join("admins.dat"),
                bcrypt_cost: 4,
                ..AdminConfig::default()
            },
            ..Config::default()
        };
        customize(&mut config);

        let credentials = CredentialStore::open_or_disable(&config.admin);
        let state = AppState::new(config, credentials);
        Self {
            router: server::router(state.clone()),
            state,
            _dir: dir,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_json(&self, uri: &str) -> Value {
        let resp = self.get(uri).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
        body_json(resp).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response<Body> {
        self.post_json(
            "/api/admin/login",
            &serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// `name=value` part of the session cookie set by a response
pub fn session_cookie(resp: &Response<Body>) -> String {
    resp.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}
