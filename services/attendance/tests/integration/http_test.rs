//! Router-level tests: the full service over a tempfile SQLite database,
//! exercised through axum-test with real session cookies.

use axum_test::TestServer;
use serde_json::{Value, json};

use rollcall_attendance::router::build_router;
use rollcall_attendance::session::SESSION_COOKIE;
use rollcall_attendance::state::AppState;
use rollcall_attendance::usecase::roster::{BootstrapAdminInput, BootstrapAdminUseCase};

use crate::helpers::TestDb;

const SECRET: &str = "http-test-secret";

/// Build a server over a fresh database with the admin account seeded.
async fn test_server() -> (TestServer, TestDb) {
    let harness = TestDb::new().await;
    let state = AppState {
        db: harness.db.clone(),
        session_secret: SECRET.to_owned(),
        cookie_domain: "test.local".to_owned(),
    };

    let bootstrap = BootstrapAdminUseCase {
        admins: state.admin_repo(),
    };
    bootstrap
        .execute(BootstrapAdminInput {
            username: "root".to_owned(),
            password: "root-pw".to_owned(),
        })
        .await
        .unwrap();

    let server = TestServer::new(build_router(state)).unwrap();
    (server, harness)
}

/// Log in and return the session cookie to attach to later requests.
async fn login(server: &TestServer, username: &str, password: &str) -> cookie::Cookie<'static> {
    let response = server
        .post("/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.cookie(SESSION_COOKIE)
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (server, _harness) = test_server().await;
    assert_eq!(server.get("/healthz").await.status_code(), 200);
    assert_eq!(server.get("/readyz").await.status_code(), 200);
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_error_envelope() {
    let (server, _harness) = test_server().await;

    let response = server
        .post("/login")
        .json(&json!({ "username": "root", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let (server, _harness) = test_server().await;

    let response = server.get("/teacher/classes").await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_SESSION");
}

#[tokio::test]
async fn role_gating_is_exact() {
    let (server, _harness) = test_server().await;
    let admin_cookie = login(&server, "root", "root-pw").await;

    // An admin session does not pass the teacher gate.
    let response = server
        .get("/teacher/classes")
        .add_cookie(admin_cookie)
        .await;
    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let (server, _harness) = test_server().await;
    let cookie = login(&server, "root", "root-pw").await;

    let response = server.get("/logout").add_cookie(cookie).await;
    assert_eq!(response.status_code(), 204);
    let cleared = response.cookie(SESSION_COOKIE);
    assert_eq!(cleared.value(), "");
}

#[tokio::test]
async fn full_attendance_flow_over_http() {
    let (server, _harness) = test_server().await;
    let admin = login(&server, "root", "root-pw").await;

    // Admin builds the roster.
    let response = server
        .post("/admin/teachers")
        .add_cookie(admin.clone())
        .json(&json!({ "name": "Ms Hall", "username": "hall", "password": "chalk" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let teacher_id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    let response = server
        .post("/admin/classes")
        .add_cookie(admin.clone())
        .json(&json!({ "name": "Algebra", "teacher_id": teacher_id }))
        .await;
    assert_eq!(response.status_code(), 201);
    let class_id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    let response = server
        .post("/admin/students")
        .add_cookie(admin.clone())
        .json(&json!({
            "name": "Amy",
            "username": "amy",
            "password": "pencil",
            "class_id": class_id,
        }))
        .await;
    assert_eq!(response.status_code(), 201);

    // Roster listings reflect the join.
    let students: Value = server
        .get("/admin/students")
        .add_cookie(admin.clone())
        .await
        .json();
    assert_eq!(students[0]["class_name"], "Algebra");

    // Teacher issues a code for their class.
    let teacher = login(&server, "hall", "chalk").await;
    let response = server
        .post("/teacher/otp")
        .add_cookie(teacher.clone())
        .json(&json!({ "class_id": class_id, "validity_seconds": 60 }))
        .await;
    assert_eq!(response.status_code(), 201);
    let otp: Value = response.json();
    let code = otp["code"].as_str().unwrap().to_owned();
    assert_eq!(code.len(), 6);

    // Student redeems it once.
    let student = login(&server, "amy", "pencil").await;
    let response = server
        .post("/student/attendance")
        .add_cookie(student.clone())
        .json(&json!({ "code": code }))
        .await;
    assert_eq!(response.status_code(), 201);
    let record: Value = response.json();
    assert_eq!(record["status"], "Present");
    assert_eq!(record["class_id"].as_str().unwrap(), class_id);

    // A second redemption conflicts.
    let response = server
        .post("/student/attendance")
        .add_cookie(student.clone())
        .json(&json!({ "code": code }))
        .await;
    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["kind"], "ALREADY_REDEEMED");

    // An unknown code is a 404.
    let response = server
        .post("/student/attendance")
        .add_cookie(student.clone())
        .json(&json!({ "code": "000000" }))
        .await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["kind"], "CODE_NOT_FOUND");

    // History shows the mark with the class name.
    let history: Value = server
        .get("/student/attendance")
        .add_cookie(student)
        .await
        .json();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["class_name"], "Algebra");
    assert_eq!(history[0]["status"], "Present");

    // The teacher's roll for today shows the student present.
    let today = chrono::Utc::now().date_naive();
    let roll: Value = server
        .get("/teacher/attendance")
        .add_cookie(teacher)
        .add_query_param("class-id", &class_id)
        .add_query_param("date", today.to_string())
        .await
        .json();
    assert_eq!(roll["class_name"], "Algebra");
    assert_eq!(roll["entries"][0]["status"], "Present");
}

#[tokio::test]
async fn generating_a_new_code_expires_the_old_one() {
    let (server, _harness) = test_server().await;
    let admin = login(&server, "root", "root-pw").await;

    let teacher_id = server
        .post("/admin/teachers")
        .add_cookie(admin.clone())
        .json(&json!({ "name": "Ms Hall", "username": "hall", "password": "chalk" }))
        .await
        .json::<Value>()["id"]
        .as_str()
        .unwrap()
        .to_owned();
    let class_id = server
        .post("/admin/classes")
        .add_cookie(admin.clone())
        .json(&json!({ "name": "Algebra", "teacher_id": teacher_id }))
        .await
        .json::<Value>()["id"]
        .as_str()
        .unwrap()
        .to_owned();
    let response = server
        .post("/admin/students")
        .add_cookie(admin)
        .json(&json!({ "name": "Amy", "username": "amy", "password": "pencil" }))
        .await;
    assert_eq!(response.status_code(), 201);

    let teacher = login(&server, "hall", "chalk").await;
    let generate = |body| {
        server
            .post("/teacher/otp")
            .add_cookie(teacher.clone())
            .json(&body)
    };
    let first: Value = generate(json!({ "class_id": class_id, "validity_seconds": 60 }))
        .await
        .json();
    let second: Value = generate(json!({ "class_id": class_id, "validity_seconds": 60 }))
        .await
        .json();
    assert_ne!(first["otp_id"], second["otp_id"]);

    // The superseded code now redeems as expired.
    let student = login(&server, "amy", "pencil").await;
    let response = server
        .post("/student/attendance")
        .add_cookie(student.clone())
        .json(&json!({ "code": first["code"] }))
        .await;

    // Edge case: the two codes can collide (1-in-a-million); either way the
    // first code string no longer maps to an actionable OTP unless it equals
    // the second one.
    if first["code"] == second["code"] {
        assert_eq!(response.status_code(), 201);
    } else {
        assert_eq!(response.status_code(), 410);
        assert_eq!(response.json::<Value>()["kind"], "CODE_EXPIRED");
    }
}
