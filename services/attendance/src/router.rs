use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use rollcall_core::health::{healthz, readyz};
use rollcall_core::middleware::request_id_layer;

use crate::handlers::{
    admin::{add_class, add_student, add_teacher, list_classes, list_students, list_teachers},
    auth::{login, logout},
    student::{history, redeem},
    teacher::{class_attendance, generate_otp, list_classes as list_teacher_classes},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/login", post(login))
        .route("/logout", get(logout))
        // Teacher
        .route("/teacher/classes", get(list_teacher_classes))
        .route("/teacher/otp", post(generate_otp))
        .route("/teacher/attendance", get(class_attendance))
        // Student
        .route("/student/attendance", post(redeem))
        .route("/student/attendance", get(history))
        // Admin roster
        .route("/admin/teachers", post(add_teacher))
        .route("/admin/teachers", get(list_teachers))
        .route("/admin/classes", post(add_class))
        .route("/admin/classes", get(list_classes))
        .route("/admin/students", post(add_student))
        .route("/admin/students", get(list_students))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
