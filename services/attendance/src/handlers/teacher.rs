use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_domain::role::Role;

use crate::error::AttendanceServiceError;
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::attendance::{ClassAttendanceInput, ClassAttendanceUseCase};
use crate::usecase::otp::{GenerateOtpInput, GenerateOtpUseCase};
use crate::usecase::roster::ListTeacherClassesUseCase;

// ── GET /teacher/classes ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TeacherClassResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_classes(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<TeacherClassResponse>>, AttendanceServiceError> {
    let session = Session::from_jar(&jar, &state.session_secret)?.require(Role::Teacher)?;

    let usecase = ListTeacherClassesUseCase {
        classes: state.class_repo(),
    };
    let classes = usecase.execute(session.user_id).await?;

    Ok(Json(
        classes
            .into_iter()
            .map(|c| TeacherClassResponse {
                id: c.id,
                name: c.name,
                created_at: c.created_at,
            })
            .collect(),
    ))
}

// ── POST /teacher/otp ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateOtpRequest {
    pub class_id: Uuid,
    pub validity_seconds: u32,
}

#[derive(Serialize)]
pub struct OtpResponse {
    pub otp_id: Uuid,
    pub class_id: Uuid,
    pub code: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn generate_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GenerateOtpRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let session = Session::from_jar(&jar, &state.session_secret)?.require(Role::Teacher)?;

    let usecase = GenerateOtpUseCase {
        classes: state.class_repo(),
        otps: state.otp_repo(),
    };
    let otp = usecase
        .execute(GenerateOtpInput {
            teacher_id: session.user_id,
            class_id: body.class_id,
            validity_seconds: body.validity_seconds,
        })
        .await?;

    let body = OtpResponse {
        otp_id: otp.id,
        class_id: otp.class_id,
        code: otp.code,
        expires_at: otp.expires_at,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// ── GET /teacher/attendance ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ClassAttendanceQuery {
    #[serde(rename = "class-id")]
    pub class_id: Uuid,
    /// UTC date, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct RollEntryResponse {
    pub student_id: Uuid,
    pub student_name: String,
    /// `"Present"` or null for absent.
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ClassRollResponse {
    pub class_id: Uuid,
    pub class_name: String,
    pub date: NaiveDate,
    pub entries: Vec<RollEntryResponse>,
}

pub async fn class_attendance(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ClassAttendanceQuery>,
) -> Result<Json<ClassRollResponse>, AttendanceServiceError> {
    let session = Session::from_jar(&jar, &state.session_secret)?.require(Role::Teacher)?;

    let usecase = ClassAttendanceUseCase {
        classes: state.class_repo(),
        students: state.student_repo(),
        attendance: state.attendance_repo(),
    };
    let roll = usecase
        .execute(ClassAttendanceInput {
            teacher_id: session.user_id,
            class_id: query.class_id,
            date: query.date,
        })
        .await?;

    Ok(Json(ClassRollResponse {
        class_id: roll.class_id,
        class_name: roll.class_name,
        date: roll.date,
        entries: roll
            .entries
            .into_iter()
            .map(|e| RollEntryResponse {
                student_id: e.student_id,
                student_name: e.student_name,
                status: e.status,
            })
            .collect(),
    }))
}
