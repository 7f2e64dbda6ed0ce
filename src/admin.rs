//! Admin API for the registration dashboard
//! Login, reporting queries, activity feed and settings under `/api/admin`

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::activity::{ActivityEntry, ActivityLog};
use crate::catalog::{
    CourseEnrollment, DashboardStats, EnrollmentYear, PendingRegistrations, RegistrationStatus,
    TrendWindow,
};
use crate::charts::{self, ChartKind};
use crate::config::Config;
use crate::credentials::{Admin, CredentialError, CredentialStore};
use crate::error::AppError;
use crate::session::{self, SessionStore};
use crate::settings::{SettingsStore, SystemSettings};
use crate::AppState;

/// Process-lifetime admin state, created at startup and shared by every handler
pub struct AdminState {
    pub activity: ActivityLog,
    pub settings: SettingsStore,
    pub sessions: SessionStore,
    pub credentials: CredentialStore,
}

impl AdminState {
    pub fn new(config: &Config, credentials: CredentialStore) -> Self {
        Self {
            activity: ActivityLog::new(config.activity.max_entries),
            settings: SettingsStore::default(),
            sessions: SessionStore::new(config.session.timeout_hours),
            credentials,
        }
    }

    /// Check credentials and record the login in the activity feed
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Admin>, CredentialError> {
        let admin = self.credentials.authenticate(username, password)?;
        if let Some(admin) = &admin {
            self.activity.record(ActivityEntry::login(&admin.display_name));
        }
        Ok(admin)
    }

    /// Replace the settings record and record who did it
    pub fn save_settings(&self, settings: SystemSettings, actor: &str) {
        self.settings.replace(settings);
        self.activity.record(ActivityEntry::settings_saved(actor));
    }
}

/// Session of the caller, if any. Rejects the request when sessions are
/// required and none is present.
pub struct AdminSession {
    admin_name: Option<String>,
}

impl AdminSession {
    pub fn admin_name(&self) -> Option<&str> {
        self.admin_name.as_deref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let admin_name = session::session_token(&parts.headers)
            .and_then(|token| state.admin.sessions.validate(&token));

        if admin_name.is_none() && state.config.session.require_session {
            return Err(AppError::Unauthorized("login required".into()));
        }

        Ok(AdminSession { admin_name })
    }
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub admin_name: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize)]
struct TrendQuery {
    #[serde(rename = "yearsBack")]
    years_back: Option<String>,
}

impl TrendQuery {
    fn window(&self) -> TrendWindow {
        let years_back = self
            .years_back
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok());
        TrendWindow::from_years_back(years_back)
    }
}

/// Create the admin API router
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/getDashboardStats", get(dashboard_stats))
        .route("/getStudentsPerCourse", get(students_per_course))
        .route("/getEnrollmentTrend", get(enrollment_trend))
        .route("/getRegistrationStatus", get(registration_status))
        .route("/getPendingRegistrations", get(pending_registrations))
        .route("/getActivityLog", get(activity_log))
        .route("/getSettings", get(get_settings))
        .route("/saveSettings", post(save_settings))
        .route("/charts/:chart", get(chart))
}

async fn login_handler(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Response, AppError> {
    let admin = state
        .admin
        .login(&form.username, &form.password)
        .map_err(|e| AppError::Internal(format!("credential check failed: {e}")))?;

    match admin {
        Some(admin) => {
            let token = state.admin.sessions.create(&admin.display_name);
            info!(username = %admin.username, "admin logged in");

            let body = LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                admin_name: Some(admin.display_name),
            };
            Ok(([(header::SET_COOKIE, session::set_cookie(&token))], Json(body)).into_response())
        }
        None => {
            warn!(username = %form.username, "failed admin login");

            let body = LoginResponse {
                success: false,
                message: "Invalid username or password".to_string(),
                admin_name: None,
            };
            Ok(Json(body).into_response())
        }
    }
}

async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session::session_token(&headers) {
        if state.admin.sessions.remove(&token) {
            info!("admin logged out");
        }
    }

    let body = ActionResponse {
        success: true,
        message: "Logged out".to_string(),
    };
    ([(header::SET_COOKIE, session::clear_cookie())], Json(body)).into_response()
}

async fn dashboard_stats(State(state): State<AppState>, _session: AdminSession) -> Json<DashboardStats> {
    Json(state.catalog.dashboard_stats())
}

async fn students_per_course(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Json<Vec<CourseEnrollment>> {
    Json(state.catalog.students_per_course())
}

async fn enrollment_trend(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<TrendQuery>,
) -> Json<Vec<EnrollmentYear>> {
    Json(state.catalog.enrollment_trend(query.window()))
}

async fn registration_status(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Json<Vec<RegistrationStatus>> {
    Json(state.catalog.registration_status())
}

async fn pending_registrations(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Json<PendingRegistrations> {
    Json(state.catalog.pending_registrations())
}

async fn activity_log(State(state): State<AppState>, _session: AdminSession) -> Json<Vec<ActivityEntry>> {
    Json(state.admin.activity.feed())
}

async fn get_settings(State(state): State<AppState>, _session: AdminSession) -> Json<SystemSettings> {
    Json(state.admin.settings.get())
}

async fn save_settings(
    State(state): State<AppState>,
    session: AdminSession,
    Json(settings): Json<SystemSettings>,
) -> Json<ActionResponse> {
    let actor = session
        .admin_name()
        .unwrap_or(&state.config.admin.display_name)
        .to_string();
    state.admin.save_settings(settings, &actor);
    info!(actor = %actor, "system settings updated");

    Json(ActionResponse {
        success: true,
        message: "Settings saved successfully".to_string(),
    })
}

async fn chart(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(name): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Value>, AppError> {
    let kind = ChartKind::from_name(&name)
        .ok_or_else(|| AppError::NotFound(format!("unknown chart '{name}'")))?;

    let config = match kind {
        ChartKind::StudentsPerCourse => charts::students_per_course(&state.catalog.students_per_course()),
        ChartKind::RegistrationStatus => charts::registration_status(&state.catalog.registration_status()),
        ChartKind::EnrollmentTrend => {
            charts::enrollment_trend(&state.catalog.enrollment_trend(query.window()))
        }
    };
    Ok(Json(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::config::AdminConfig;

    fn state_with_admin() -> (tempfile::TempDir, AdminState) {
        let dir = tempfile::tempdir().unwrap();
        let seed = AdminConfig {
            bcrypt_cost: 4,
            ..AdminConfig::default()
        };
        let (credentials, _) =
            CredentialStore::open_or_seed(&dir.path().join("admins.dat"), &seed).unwrap();
        (dir, AdminState::new(&Config::default(), credentials))
    }

    #[test]
    fn successful_login_records_exactly_one_entry() {
        let (_dir, state) = state_with_admin();
        let admin = state.login("admin", "admin123").unwrap().unwrap();
        assert_eq!(admin.display_name, "System Administrator");
        assert_eq!(state.activity.len(), 1);
        assert_eq!(state.activity.feed()[0].kind, ActivityKind::Login);
    }

    #[test]
    fn failed_login_leaves_the_feed_alone() {
        let (_dir, state) = state_with_admin();
        assert!(state.login("admin", "nope").unwrap().is_none());
        assert!(state.activity.is_empty());
    }

    #[test]
    fn saving_settings_replaces_and_records() {
        let (_dir, state) = state_with_admin();
        let settings = SystemSettings {
            registration_open: false,
            ..SystemSettings::default()
        };
        state.save_settings(settings.clone(), "Registrar");
        assert_eq!(state.settings.get(), settings);

        let feed = state.activity.feed();
        assert_eq!(feed[0].kind, ActivityKind::Settings);
        assert_eq!(feed[0].user, "Registrar");
    }

    #[test]
    fn trend_query_parses_leniently() {
        let window = |v: Option<&str>| {
            TrendQuery {
                years_back: v.map(str::to_string),
            }
            .window()
        };
        assert_eq!(window(Some("10")), TrendWindow::TenYears);
        assert_eq!(window(Some(" 10 ")), TrendWindow::TenYears);
        assert_eq!(window(Some("7")), TrendWindow::FiveYears);
        assert_eq!(window(Some("ten")), TrendWindow::FiveYears);
        assert_eq!(window(None), TrendWindow::FiveYears);
    }

    #[test]
    fn failed_login_serializes_null_admin_name() {
        let body = LoginResponse {
            success: false,
            message: "Invalid username or password".to_string(),
            admin_name: None,
        };
        let json = serde_json::to_value(body).unwrap();
        assert!(json["adminName"].is_null());
        assert_eq!(json["success"], false);
    }
}
