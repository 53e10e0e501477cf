use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use rollcall_domain::role::Role;

use crate::error::AttendanceServiceError;
use crate::session::{clear_session_cookie, issue_session_token, set_session_cookie};
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: uuid::Uuid,
    pub name: String,
    pub role: Role,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = LoginUseCase {
        admins: state.admin_repo(),
        teachers: state.teacher_repo(),
        students: state.student_repo(),
    };

    let user = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;

    let token = issue_session_token(user.id, user.role, &state.session_secret)?;
    let jar = set_session_cookie(jar, token, state.cookie_domain.clone());

    let body = LoginResponse {
        user_id: user.id,
        name: user.name,
        role: user.role,
    };
    Ok((StatusCode::CREATED, jar, Json(body)))
}

// ── GET /logout ──────────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
