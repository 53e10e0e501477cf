use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::repository::{AttendanceRepository, ClassRepository, StudentRepository};
use crate::domain::types::AttendanceRecord;
use crate::error::AttendanceServiceError;

// ── StudentHistory ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct HistoryEntry {
    pub record: AttendanceRecord,
    pub class_name: Option<String>,
}

pub struct StudentHistoryUseCase<S, A>
where
    S: StudentRepository,
    A: AttendanceRepository,
{
    pub students: S,
    pub attendance: A,
}

impl<S, A> StudentHistoryUseCase<S, A>
where
    S: StudentRepository,
    A: AttendanceRepository,
{
    /// The student's own records, marked_at descending, with class names.
    pub async fn execute(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<HistoryEntry>, AttendanceServiceError> {
        self.students
            .find_by_id(student_id)
            .await?
            .ok_or(AttendanceServiceError::RecordNotFound)?;

        let rows = self.attendance.list_by_student_with_class(student_id).await?;
        Ok(rows
            .into_iter()
            .map(|(record, class_name)| HistoryEntry { record, class_name })
            .collect())
    }
}

// ── ClassAttendance ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RollEntry {
    pub student_id: Uuid,
    pub student_name: String,
    /// `Some("Present")` when a record falls within the day; `None` marks an
    /// absent student (they still appear in the roll).
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct ClassRoll {
    pub class_id: Uuid,
    pub class_name: String,
    pub date: NaiveDate,
    pub entries: Vec<RollEntry>,
}

pub struct ClassAttendanceInput {
    pub teacher_id: Uuid,
    pub class_id: Uuid,
    pub date: NaiveDate,
}

pub struct ClassAttendanceUseCase<C, S, A>
where
    C: ClassRepository,
    S: StudentRepository,
    A: AttendanceRepository,
{
    pub classes: C,
    pub students: S,
    pub attendance: A,
}

impl<C, S, A> ClassAttendanceUseCase<C, S, A>
where
    C: ClassRepository,
    S: StudentRepository,
    A: AttendanceRepository,
{
    /// Per-class roll for one UTC date: every enrolled student paired with
    /// their status, absent students included.
    pub async fn execute(
        &self,
        input: ClassAttendanceInput,
    ) -> Result<ClassRoll, AttendanceServiceError> {
        let class = self
            .classes
            .find_by_id(input.class_id)
            .await?
            .ok_or(AttendanceServiceError::RecordNotFound)?;

        if class.teacher_id != Some(input.teacher_id) {
            return Err(AttendanceServiceError::Forbidden);
        }

        let (from, to) = utc_day_bounds(input.date);
        let records = self
            .attendance
            .find_by_class_in_window(class.id, from, to)
            .await?;
        let enrolled = self.students.list_by_class(class.id).await?;

        let entries = enrolled
            .into_iter()
            .map(|student| {
                let status = records
                    .iter()
                    .find(|r| r.student_id == student.id)
                    .map(|r| r.status.clone());
                RollEntry {
                    student_id: student.id,
                    student_name: student.name,
                    status,
                }
            })
            .collect();

        Ok(ClassRoll {
            class_id: class.id,
            class_name: class.name,
            date: input.date,
            entries,
        })
    }
}

/// Half-open [00:00, next day 00:00) window for a UTC date.
fn utc_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    let to = from + chrono::Duration::days(1);
    (from.and_utc(), to.and_utc())
}
