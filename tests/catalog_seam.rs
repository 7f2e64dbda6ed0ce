mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use regdesk::catalog::{Catalog, Course, EnrollmentYear, PendingStudent};
use regdesk::config::Config;
use regdesk::credentials::CredentialStore;
use regdesk::{server, AppState};

static COURSES: [Course; 1] = [Course {
    code: "SECXH",
    name: "Experimental Computing",
    student_count: 40,
    registered: 30,
    pending_count: 2,
}];

static HISTORY: [EnrollmentYear; 2] = [
    EnrollmentYear { year: 2025, student_count: 35 },
    EnrollmentYear { year: 2026, student_count: 40 },
];

struct TinyCatalog;

impl Catalog for TinyCatalog {
    fn courses(&self) -> &[Course] {
        &COURSES
    }

    fn enrollment_history(&self) -> &[EnrollmentYear] {
        &HISTORY
    }

    fn pending_students(&self, _course_code: &str) -> Vec<PendingStudent> {
        Vec::new()
    }
}

#[tokio::test]
async fn handlers_only_see_the_catalog_trait() {
    let state = AppState::with_catalog(Config::default(), CredentialStore::empty(), Arc::new(TinyCatalog));
    let router = server::router(state);

    let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let resp = router.clone().oneshot(get("/api/admin/getDashboardStats")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        common::body_json(resp).await,
        json!({
            "totalStudents": 40,
            "totalCourses": 1,
            "totalRegistrations": 30,
            "pendingRegistrations": 2
        })
    );

    // shorter history than the window yields what exists
    let resp = router.clone().oneshot(get("/api/admin/getEnrollmentTrend?yearsBack=10")).await.unwrap();
    assert_eq!(common::body_json(resp).await.as_array().unwrap().len(), 2);

    let resp = router.oneshot(get("/api/admin/getPendingRegistrations")).await.unwrap();
    let pending = common::body_json(resp).await;
    assert_eq!(pending["registrations"]["SECXH"], json!([]));
    assert_eq!(pending["summary"][0]["pendingCount"], 2);
}
