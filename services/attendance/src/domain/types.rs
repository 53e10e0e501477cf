use chrono::{DateTime, Utc};
use uuid::Uuid;

use rollcall_domain::role::Role;

/// Administrator account, seeded from configuration at startup.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Teacher account; owns classes and issues attendance codes for them.
#[derive(Debug, Clone)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Class (course section); attendance codes and records are scoped to one.
#[derive(Debug, Clone)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Student account; enrolled in at most one class.
#[derive(Debug, Clone)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub class_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One-time attendance code bound to a class session.
#[derive(Debug, Clone)]
pub struct Otp {
    pub id: Uuid,
    pub class_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// Set when a newer code for the same class supersedes this one.
    pub invalidated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// A code is actionable while it is neither superseded nor past expiry.
    pub fn is_actionable(&self, now: DateTime<Utc>) -> bool {
        self.invalidated_at.is_none() && self.expires_at > now
    }
}

/// Immutable record of a student redeeming an attendance code.
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub otp_id: Uuid,
    pub marked_at: DateTime<Utc>,
    pub status: String,
}

/// Identity established by a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

/// Attendance code length in digits.
pub const OTP_CODE_LEN: usize = 6;

/// Status written on every successful redemption.
pub const STATUS_PRESENT: &str = "Present";
