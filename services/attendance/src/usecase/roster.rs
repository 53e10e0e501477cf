use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    AdminRepository, ClassRepository, StudentRepository, TeacherRepository,
};
use crate::domain::types::{Admin, Class, Student, Teacher};
use crate::error::AttendanceServiceError;
use crate::password::hash_password;

fn require_field(
    value: &str,
    reason: &'static str,
) -> Result<String, AttendanceServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AttendanceServiceError::Validation(reason));
    }
    Ok(trimmed.to_owned())
}

// ── AddTeacher ───────────────────────────────────────────────────────────────

pub struct AddTeacherInput {
    pub name: String,
    pub username: String,
    pub password: String,
}

pub struct AddTeacherUseCase<T: TeacherRepository> {
    pub teachers: T,
}

impl<T: TeacherRepository> AddTeacherUseCase<T> {
    pub async fn execute(&self, input: AddTeacherInput) -> Result<Teacher, AttendanceServiceError> {
        let name = require_field(&input.name, "name is required")?;
        let username = require_field(&input.username, "username is required")?;
        if input.password.is_empty() {
            return Err(AttendanceServiceError::Validation("password is required"));
        }

        let teacher = Teacher {
            id: Uuid::now_v7(),
            name,
            username,
            password_hash: hash_password(&input.password)?,
            created_at: Utc::now(),
        };
        self.teachers.create(&teacher).await?;
        Ok(teacher)
    }
}

// ── AddClass ─────────────────────────────────────────────────────────────────

pub struct AddClassInput {
    pub name: String,
    pub teacher_id: Option<Uuid>,
}

pub struct AddClassUseCase<C, T>
where
    C: ClassRepository,
    T: TeacherRepository,
{
    pub classes: C,
    pub teachers: T,
}

impl<C, T> AddClassUseCase<C, T>
where
    C: ClassRepository,
    T: TeacherRepository,
{
    pub async fn execute(&self, input: AddClassInput) -> Result<Class, AttendanceServiceError> {
        let name = require_field(&input.name, "name is required")?;

        if let Some(teacher_id) = input.teacher_id {
            self.teachers
                .find_by_id(teacher_id)
                .await?
                .ok_or(AttendanceServiceError::RecordNotFound)?;
        }

        let class = Class {
            id: Uuid::now_v7(),
            name,
            teacher_id: input.teacher_id,
            created_at: Utc::now(),
        };
        self.classes.create(&class).await?;
        Ok(class)
    }
}

// ── AddStudent ───────────────────────────────────────────────────────────────

pub struct AddStudentInput {
    pub name: String,
    pub username: String,
    pub password: String,
    pub class_id: Option<Uuid>,
}

pub struct AddStudentUseCase<S, C>
where
    S: StudentRepository,
    C: ClassRepository,
{
    pub students: S,
    pub classes: C,
}

impl<S, C> AddStudentUseCase<S, C>
where
    S: StudentRepository,
    C: ClassRepository,
{
    pub async fn execute(&self, input: AddStudentInput) -> Result<Student, AttendanceServiceError> {
        let name = require_field(&input.name, "name is required")?;
        let username = require_field(&input.username, "username is required")?;
        if input.password.is_empty() {
            return Err(AttendanceServiceError::Validation("password is required"));
        }

        if let Some(class_id) = input.class_id {
            self.classes
                .find_by_id(class_id)
                .await?
                .ok_or(AttendanceServiceError::RecordNotFound)?;
        }

        let student = Student {
            id: Uuid::now_v7(),
            name,
            username,
            password_hash: hash_password(&input.password)?,
            class_id: input.class_id,
            created_at: Utc::now(),
        };
        self.students.create(&student).await?;
        Ok(student)
    }
}

// ── Listings ─────────────────────────────────────────────────────────────────

pub struct ListTeachersUseCase<T: TeacherRepository> {
    pub teachers: T,
}

impl<T: TeacherRepository> ListTeachersUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Teacher>, AttendanceServiceError> {
        self.teachers.list().await
    }
}

pub struct ListClassesUseCase<C: ClassRepository> {
    pub classes: C,
}

impl<C: ClassRepository> ListClassesUseCase<C> {
    /// Every class joined with its owning teacher's name, None when unstaffed.
    pub async fn execute(&self) -> Result<Vec<(Class, Option<String>)>, AttendanceServiceError> {
        self.classes.list_with_teacher().await
    }
}

pub struct ListStudentsUseCase<S: StudentRepository> {
    pub students: S,
}

impl<S: StudentRepository> ListStudentsUseCase<S> {
    /// Every student joined with their class name, None when unassigned.
    pub async fn execute(&self) -> Result<Vec<(Student, Option<String>)>, AttendanceServiceError> {
        self.students.list_with_class().await
    }
}

pub struct ListTeacherClassesUseCase<C: ClassRepository> {
    pub classes: C,
}

impl<C: ClassRepository> ListTeacherClassesUseCase<C> {
    pub async fn execute(&self, teacher_id: Uuid) -> Result<Vec<Class>, AttendanceServiceError> {
        self.classes.list_by_teacher(teacher_id).await
    }
}

// ── BootstrapAdmin ───────────────────────────────────────────────────────────

pub struct BootstrapAdminInput {
    pub username: String,
    pub password: String,
}

/// Seeds the admin account from configuration at startup when no admin row
/// exists yet. Idempotent across restarts.
pub struct BootstrapAdminUseCase<A: AdminRepository> {
    pub admins: A,
}

impl<A: AdminRepository> BootstrapAdminUseCase<A> {
    /// Returns `true` when an admin was created.
    pub async fn execute(
        &self,
        input: BootstrapAdminInput,
    ) -> Result<bool, AttendanceServiceError> {
        if self.admins.count().await? > 0 {
            return Ok(false);
        }

        let username = require_field(&input.username, "admin username is required")?;
        if input.password.is_empty() {
            return Err(AttendanceServiceError::Validation(
                "admin password is required",
            ));
        }

        let admin = Admin {
            id: Uuid::now_v7(),
            name: username.clone(),
            username,
            password_hash: hash_password(&input.password)?,
            created_at: Utc::now(),
        };
        self.admins.create(&admin).await?;
        Ok(true)
    }
}
