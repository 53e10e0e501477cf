use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_domain::role::Role;

use crate::error::AttendanceServiceError;
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::roster::{
    AddClassInput, AddClassUseCase, AddStudentInput, AddStudentUseCase, AddTeacherInput,
    AddTeacherUseCase, ListClassesUseCase, ListStudentsUseCase, ListTeachersUseCase,
};

fn require_admin(state: &AppState, jar: &CookieJar) -> Result<Session, AttendanceServiceError> {
    Session::from_jar(jar, &state.session_secret)?.require(Role::Admin)
}

// ── POST /admin/teachers ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddTeacherRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

pub async fn add_teacher(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<AddTeacherRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    require_admin(&state, &jar)?;

    let usecase = AddTeacherUseCase {
        teachers: state.teacher_repo(),
    };
    let teacher = usecase
        .execute(AddTeacherInput {
            name: body.name,
            username: body.username,
            password: body.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: teacher.id })))
}

// ── GET /admin/teachers ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TeacherResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_teachers(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<TeacherResponse>>, AttendanceServiceError> {
    require_admin(&state, &jar)?;

    let usecase = ListTeachersUseCase {
        teachers: state.teacher_repo(),
    };
    let teachers = usecase.execute().await?;

    Ok(Json(
        teachers
            .into_iter()
            .map(|t| TeacherResponse {
                id: t.id,
                name: t.name,
                username: t.username,
                created_at: t.created_at,
            })
            .collect(),
    ))
}

// ── POST /admin/classes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddClassRequest {
    pub name: String,
    pub teacher_id: Option<Uuid>,
}

pub async fn add_class(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<AddClassRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    require_admin(&state, &jar)?;

    let usecase = AddClassUseCase {
        classes: state.class_repo(),
        teachers: state.teacher_repo(),
    };
    let class = usecase
        .execute(AddClassInput {
            name: body.name,
            teacher_id: body.teacher_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: class.id })))
}

// ── GET /admin/classes ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ClassResponse {
    pub id: Uuid,
    pub name: String,
    pub teacher_id: Option<Uuid>,
    pub teacher_name: Option<String>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_classes(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<ClassResponse>>, AttendanceServiceError> {
    require_admin(&state, &jar)?;

    let usecase = ListClassesUseCase {
        classes: state.class_repo(),
    };
    let classes = usecase.execute().await?;

    Ok(Json(
        classes
            .into_iter()
            .map(|(c, teacher_name)| ClassResponse {
                id: c.id,
                name: c.name,
                teacher_id: c.teacher_id,
                teacher_name,
                created_at: c.created_at,
            })
            .collect(),
    ))
}

// ── POST /admin/students ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddStudentRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub class_id: Option<Uuid>,
}

pub async fn add_student(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<AddStudentRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    require_admin(&state, &jar)?;

    let usecase = AddStudentUseCase {
        students: state.student_repo(),
        classes: state.class_repo(),
    };
    let student = usecase
        .execute(AddStudentInput {
            name: body.name,
            username: body.username,
            password: body.password,
            class_id: body.class_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: student.id })))
}

// ── GET /admin/students ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub class_id: Option<Uuid>,
    pub class_name: Option<String>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_students(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<StudentResponse>>, AttendanceServiceError> {
    require_admin(&state, &jar)?;

    let usecase = ListStudentsUseCase {
        students: state.student_repo(),
    };
    let students = usecase.execute().await?;

    Ok(Json(
        students
            .into_iter()
            .map(|(s, class_name)| StudentResponse {
                id: s.id,
                name: s.name,
                username: s.username,
                class_id: s.class_id,
                class_name,
                created_at: s.created_at,
            })
            .collect(),
    ))
}
