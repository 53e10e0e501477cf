use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{
    AttendanceRepository, ClassRepository, OtpRepository, StudentRepository,
};
use crate::domain::types::{AttendanceRecord, OTP_CODE_LEN, Otp, STATUS_PRESENT};
use crate::error::AttendanceServiceError;

/// Charset for attendance codes (decimal digits).
const CHARSET: &[u8] = b"0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── GenerateOtp ──────────────────────────────────────────────────────────────

pub struct GenerateOtpInput {
    pub teacher_id: Uuid,
    pub class_id: Uuid,
    pub validity_seconds: u32,
}

pub struct GenerateOtpUseCase<C, O>
where
    C: ClassRepository,
    O: OtpRepository,
{
    pub classes: C,
    pub otps: O,
}

impl<C, O> GenerateOtpUseCase<C, O>
where
    C: ClassRepository,
    O: OtpRepository,
{
    pub async fn execute(&self, input: GenerateOtpInput) -> Result<Otp, AttendanceServiceError> {
        if input.validity_seconds == 0 {
            return Err(AttendanceServiceError::Validation(
                "validity_seconds must be positive",
            ));
        }

        let class = self
            .classes
            .find_by_id(input.class_id)
            .await?
            .ok_or(AttendanceServiceError::RecordNotFound)?;

        // Only the owning teacher may issue codes for a class.
        if class.teacher_id != Some(input.teacher_id) {
            return Err(AttendanceServiceError::Forbidden);
        }

        let now = Utc::now();
        let otp = Otp {
            id: Uuid::now_v7(),
            class_id: class.id,
            code: generate_code(),
            expires_at: now + Duration::seconds(i64::from(input.validity_seconds)),
            invalidated_at: None,
            created_at: now,
        };

        // Supersede any still-actionable prior codes in the same transaction,
        // so exactly one code per class is current at all times.
        self.otps.create_superseding(&otp).await?;
        Ok(otp)
    }
}

// ── RedeemOtp ────────────────────────────────────────────────────────────────

pub struct RedeemOtpInput {
    pub student_id: Uuid,
    pub code: String,
}

pub struct RedeemOtpUseCase<S, O, A>
where
    S: StudentRepository,
    O: OtpRepository,
    A: AttendanceRepository,
{
    pub students: S,
    pub otps: O,
    pub attendance: A,
}

impl<S, O, A> RedeemOtpUseCase<S, O, A>
where
    S: StudentRepository,
    O: OtpRepository,
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        input: RedeemOtpInput,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let student = self
            .students
            .find_by_id(input.student_id)
            .await?
            .ok_or(AttendanceServiceError::RecordNotFound)?;

        // 1. The code must exist (newest wins when digit strings collide).
        let otp = self
            .otps
            .find_latest_by_code(input.code.trim())
            .await?
            .ok_or(AttendanceServiceError::CodeNotFound)?;

        // 2. It must be fresh: not past expiry, not superseded by a newer one.
        let now = Utc::now();
        if !otp.is_actionable(now) {
            return Err(AttendanceServiceError::CodeExpired);
        }

        // 3. At most one mark per (student, code). The pre-check gives the
        // friendly error; the storage unique constraint is the backstop under
        // concurrent submissions.
        if self.attendance.exists(student.id, otp.id).await? {
            return Err(AttendanceServiceError::AlreadyRedeemed);
        }

        let record = AttendanceRecord {
            id: Uuid::now_v7(),
            student_id: student.id,
            class_id: otp.class_id,
            otp_id: otp.id,
            marked_at: now,
            status: STATUS_PRESENT.to_owned(),
        };
        self.attendance.create(&record).await?;
        Ok(record)
    }
}
