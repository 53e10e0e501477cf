use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_domain::role::Role;

use crate::error::AttendanceServiceError;
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::attendance::StudentHistoryUseCase;
use crate::usecase::otp::{RedeemOtpInput, RedeemOtpUseCase};

// ── POST /student/attendance ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct AttendanceRecordResponse {
    pub id: Uuid,
    pub class_id: Uuid,
    pub status: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub marked_at: chrono::DateTime<chrono::Utc>,
}

pub async fn redeem(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RedeemRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let session = Session::from_jar(&jar, &state.session_secret)?.require(Role::Student)?;

    let usecase = RedeemOtpUseCase {
        students: state.student_repo(),
        otps: state.otp_repo(),
        attendance: state.attendance_repo(),
    };
    let record = usecase
        .execute(RedeemOtpInput {
            student_id: session.user_id,
            code: body.code,
        })
        .await?;

    let body = AttendanceRecordResponse {
        id: record.id,
        class_id: record.class_id,
        status: record.status,
        marked_at: record.marked_at,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// ── GET /student/attendance ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HistoryEntryResponse {
    pub record_id: Uuid,
    pub class_id: Uuid,
    pub class_name: Option<String>,
    pub status: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub marked_at: chrono::DateTime<chrono::Utc>,
}

pub async fn history(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<HistoryEntryResponse>>, AttendanceServiceError> {
    let session = Session::from_jar(&jar, &state.session_secret)?.require(Role::Student)?;

    let usecase = StudentHistoryUseCase {
        students: state.student_repo(),
        attendance: state.attendance_repo(),
    };
    let entries = usecase.execute(session.user_id).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|e| HistoryEntryResponse {
                record_id: e.record.id,
                class_id: e.record.class_id,
                class_name: e.class_name,
                status: e.record.status,
                marked_at: e.record.marked_at,
            })
            .collect(),
    ))
}
