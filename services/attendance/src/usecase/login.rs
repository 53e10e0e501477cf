use rollcall_domain::role::Role;

use crate::domain::repository::{AdminRepository, StudentRepository, TeacherRepository};
use crate::domain::types::AuthenticatedUser;
use crate::error::AttendanceServiceError;
use crate::password::verify_password;

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Resolves a username/password against the three account tables in fixed
/// priority order: admins, then teachers, then students. A username-only
/// match does not short-circuit; the search continues until a record matches
/// on both identifier and credential.
pub struct LoginUseCase<A, T, S>
where
    A: AdminRepository,
    T: TeacherRepository,
    S: StudentRepository,
{
    pub admins: A,
    pub teachers: T,
    pub students: S,
}

impl<A, T, S> LoginUseCase<A, T, S>
where
    A: AdminRepository,
    T: TeacherRepository,
    S: StudentRepository,
{
    pub async fn execute(
        &self,
        input: LoginInput,
    ) -> Result<AuthenticatedUser, AttendanceServiceError> {
        if let Some(admin) = self.admins.find_by_username(&input.username).await? {
            if verify_password(&input.password, &admin.password_hash)? {
                return Ok(AuthenticatedUser {
                    id: admin.id,
                    name: admin.name,
                    role: Role::Admin,
                });
            }
        }

        if let Some(teacher) = self.teachers.find_by_username(&input.username).await? {
            if verify_password(&input.password, &teacher.password_hash)? {
                return Ok(AuthenticatedUser {
                    id: teacher.id,
                    name: teacher.name,
                    role: Role::Teacher,
                });
            }
        }

        if let Some(student) = self.students.find_by_username(&input.username).await? {
            if verify_password(&input.password, &student.password_hash)? {
                return Ok(AuthenticatedUser {
                    id: student.id,
                    name: student.name,
                    role: Role::Student,
                });
            }
        }

        Err(AttendanceServiceError::InvalidCredentials)
    }
}
