#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{Admin, AttendanceRecord, Class, Otp, Student, Teacher};
use crate::error::AttendanceServiceError;

/// Repository for administrator accounts.
pub trait AdminRepository: Send + Sync {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, AttendanceServiceError>;

    async fn count(&self) -> Result<u64, AttendanceServiceError>;

    /// Insert a new admin. Username collisions surface as `UsernameTaken`.
    async fn create(&self, admin: &Admin) -> Result<(), AttendanceServiceError>;
}

/// Repository for teacher accounts.
pub trait TeacherRepository: Send + Sync {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Teacher>, AttendanceServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, AttendanceServiceError>;

    /// Insert a new teacher. Username collisions surface as `UsernameTaken`.
    async fn create(&self, teacher: &Teacher) -> Result<(), AttendanceServiceError>;

    async fn list(&self) -> Result<Vec<Teacher>, AttendanceServiceError>;
}

/// Repository for classes.
pub trait ClassRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Class>, AttendanceServiceError>;

    async fn create(&self, class: &Class) -> Result<(), AttendanceServiceError>;

    /// All classes, each joined with its owning teacher's name (if staffed).
    async fn list_with_teacher(
        &self,
    ) -> Result<Vec<(Class, Option<String>)>, AttendanceServiceError>;

    async fn list_by_teacher(&self, teacher_id: Uuid)
    -> Result<Vec<Class>, AttendanceServiceError>;
}

/// Repository for student accounts.
pub trait StudentRepository: Send + Sync {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Student>, AttendanceServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, AttendanceServiceError>;

    /// Insert a new student. Username collisions surface as `UsernameTaken`.
    async fn create(&self, student: &Student) -> Result<(), AttendanceServiceError>;

    /// All students, each joined with their class name (None when unassigned).
    async fn list_with_class(
        &self,
    ) -> Result<Vec<(Student, Option<String>)>, AttendanceServiceError>;

    async fn list_by_class(&self, class_id: Uuid) -> Result<Vec<Student>, AttendanceServiceError>;
}

/// Repository for one-time attendance codes.
pub trait OtpRepository: Send + Sync {
    /// Insert a new code and, in the same transaction, stamp `invalidated_at`
    /// on every still-actionable prior code of the same class.
    async fn create_superseding(&self, otp: &Otp) -> Result<(), AttendanceServiceError>;

    /// Find the most-recently-created code matching the digit string.
    async fn find_latest_by_code(&self, code: &str)
    -> Result<Option<Otp>, AttendanceServiceError>;
}

/// Repository for attendance records.
pub trait AttendanceRepository: Send + Sync {
    async fn exists(&self, student_id: Uuid, otp_id: Uuid)
    -> Result<bool, AttendanceServiceError>;

    /// Insert a record. A concurrent duplicate for the same (student, otp)
    /// surfaces as `AlreadyRedeemed` via the storage unique constraint.
    async fn create(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError>;

    /// A student's records ordered by marked_at descending, each joined with
    /// the class name (None if the class row is gone).
    async fn list_by_student_with_class(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(AttendanceRecord, Option<String>)>, AttendanceServiceError>;

    /// Records for a class with `from <= marked_at < to`.
    async fn find_by_class_in_window(
        &self,
        class_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError>;
}
