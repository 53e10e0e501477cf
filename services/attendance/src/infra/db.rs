use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use rollcall_attendance_schema::{admins, attendance_records, classes, otps, students, teachers};

use crate::domain::repository::{
    AdminRepository, AttendanceRepository, ClassRepository, OtpRepository, StudentRepository,
    TeacherRepository,
};
use crate::domain::types::{Admin, AttendanceRecord, Class, Otp, Student, Teacher};
use crate::error::AttendanceServiceError;

/// Map an insert failure: a unique-constraint violation becomes the given
/// conflict error; anything else is an infrastructure failure.
fn insert_err(
    e: DbErr,
    conflict: AttendanceServiceError,
    what: &'static str,
) -> AttendanceServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => AttendanceServiceError::Internal(anyhow::Error::new(e).context(what)),
    }
}

// ── Admin repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
}

impl AdminRepository for DbAdminRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, AttendanceServiceError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find admin by username")?;
        Ok(model.map(admin_from_model))
    }

    async fn count(&self) -> Result<u64, AttendanceServiceError> {
        let count = admins::Entity::find()
            .count(&self.db)
            .await
            .context("count admins")?;
        Ok(count)
    }

    async fn create(&self, admin: &Admin) -> Result<(), AttendanceServiceError> {
        admins::ActiveModel {
            id: Set(admin.id),
            name: Set(admin.name.clone()),
            username: Set(admin.username.clone()),
            password_hash: Set(admin.password_hash.clone()),
            created_at: Set(admin.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| insert_err(e, AttendanceServiceError::UsernameTaken, "create admin"))?;
        Ok(())
    }
}

fn admin_from_model(model: admins::Model) -> Admin {
    Admin {
        id: model.id,
        name: model.name,
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

// ── Teacher repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTeacherRepository {
    pub db: DatabaseConnection,
}

impl TeacherRepository for DbTeacherRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Teacher>, AttendanceServiceError> {
        let model = teachers::Entity::find()
            .filter(teachers::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find teacher by username")?;
        Ok(model.map(teacher_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, AttendanceServiceError> {
        let model = teachers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find teacher by id")?;
        Ok(model.map(teacher_from_model))
    }

    async fn create(&self, teacher: &Teacher) -> Result<(), AttendanceServiceError> {
        teachers::ActiveModel {
            id: Set(teacher.id),
            name: Set(teacher.name.clone()),
            username: Set(teacher.username.clone()),
            password_hash: Set(teacher.password_hash.clone()),
            created_at: Set(teacher.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| insert_err(e, AttendanceServiceError::UsernameTaken, "create teacher"))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Teacher>, AttendanceServiceError> {
        let models = teachers::Entity::find()
            .order_by_asc(teachers::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list teachers")?;
        Ok(models.into_iter().map(teacher_from_model).collect())
    }
}

fn teacher_from_model(model: teachers::Model) -> Teacher {
    Teacher {
        id: model.id,
        name: model.name,
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

// ── Class repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClassRepository {
    pub db: DatabaseConnection,
}

impl ClassRepository for DbClassRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Class>, AttendanceServiceError> {
        let model = classes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find class by id")?;
        Ok(model.map(class_from_model))
    }

    async fn create(&self, class: &Class) -> Result<(), AttendanceServiceError> {
        classes::ActiveModel {
            id: Set(class.id),
            name: Set(class.name.clone()),
            teacher_id: Set(class.teacher_id),
            created_at: Set(class.created_at),
        }
        .insert(&self.db)
        .await
        .context("create class")?;
        Ok(())
    }

    async fn list_with_teacher(
        &self,
    ) -> Result<Vec<(Class, Option<String>)>, AttendanceServiceError> {
        let rows = classes::Entity::find()
            .find_also_related(teachers::Entity)
            .order_by_asc(classes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list classes with teachers")?;
        Ok(rows
            .into_iter()
            .map(|(class, teacher)| (class_from_model(class), teacher.map(|t| t.name)))
            .collect())
    }

    async fn list_by_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<Class>, AttendanceServiceError> {
        let models = classes::Entity::find()
            .filter(classes::Column::TeacherId.eq(teacher_id))
            .order_by_asc(classes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list classes by teacher")?;
        Ok(models.into_iter().map(class_from_model).collect())
    }
}

fn class_from_model(model: classes::Model) -> Class {
    Class {
        id: model.id,
        name: model.name,
        teacher_id: model.teacher_id,
        created_at: model.created_at,
    }
}

// ── Student repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStudentRepository {
    pub db: DatabaseConnection,
}

impl StudentRepository for DbStudentRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Student>, AttendanceServiceError> {
        let model = students::Entity::find()
            .filter(students::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find student by username")?;
        Ok(model.map(student_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, AttendanceServiceError> {
        let model = students::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find student by id")?;
        Ok(model.map(student_from_model))
    }

    async fn create(&self, student: &Student) -> Result<(), AttendanceServiceError> {
        students::ActiveModel {
            id: Set(student.id),
            name: Set(student.name.clone()),
            username: Set(student.username.clone()),
            password_hash: Set(student.password_hash.clone()),
            class_id: Set(student.class_id),
            created_at: Set(student.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| insert_err(e, AttendanceServiceError::UsernameTaken, "create student"))?;
        Ok(())
    }

    async fn list_with_class(
        &self,
    ) -> Result<Vec<(Student, Option<String>)>, AttendanceServiceError> {
        let rows = students::Entity::find()
            .find_also_related(classes::Entity)
            .order_by_asc(students::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list students with classes")?;
        Ok(rows
            .into_iter()
            .map(|(student, class)| (student_from_model(student), class.map(|c| c.name)))
            .collect())
    }

    async fn list_by_class(&self, class_id: Uuid) -> Result<Vec<Student>, AttendanceServiceError> {
        let models = students::Entity::find()
            .filter(students::Column::ClassId.eq(class_id))
            .order_by_asc(students::Column::Name)
            .all(&self.db)
            .await
            .context("list students by class")?;
        Ok(models.into_iter().map(student_from_model).collect())
    }
}

fn student_from_model(model: students::Model) -> Student {
    Student {
        id: model.id,
        name: model.name,
        username: model.username,
        password_hash: model.password_hash,
        class_id: model.class_id,
        created_at: model.created_at,
    }
}

// ── Otp repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn create_superseding(&self, otp: &Otp) -> Result<(), AttendanceServiceError> {
        let otp = otp.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    // Supersede still-actionable prior codes of the class.
                    otps::Entity::update_many()
                        .col_expr(otps::Column::InvalidatedAt, Expr::value(otp.created_at))
                        .filter(otps::Column::ClassId.eq(otp.class_id))
                        .filter(otps::Column::InvalidatedAt.is_null())
                        .filter(otps::Column::ExpiresAt.gt(otp.created_at))
                        .exec(txn)
                        .await?;

                    otps::ActiveModel {
                        id: Set(otp.id),
                        class_id: Set(otp.class_id),
                        code: Set(otp.code.clone()),
                        expires_at: Set(otp.expires_at),
                        invalidated_at: Set(None),
                        created_at: Set(otp.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create superseding otp")?;
        Ok(())
    }

    async fn find_latest_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Otp>, AttendanceServiceError> {
        // UUID v7 ids are time-ordered, so highest id = most recently created.
        let model = otps::Entity::find()
            .filter(otps::Column::Code.eq(code))
            .order_by_desc(otps::Column::Id)
            .one(&self.db)
            .await
            .context("find latest otp by code")?;
        Ok(model.map(otp_from_model))
    }
}

fn otp_from_model(model: otps::Model) -> Otp {
    Otp {
        id: model.id,
        class_id: model.class_id,
        code: model.code,
        expires_at: model.expires_at,
        invalidated_at: model.invalidated_at,
        created_at: model.created_at,
    }
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn exists(
        &self,
        student_id: Uuid,
        otp_id: Uuid,
    ) -> Result<bool, AttendanceServiceError> {
        let count = attendance_records::Entity::find()
            .filter(attendance_records::Column::StudentId.eq(student_id))
            .filter(attendance_records::Column::OtpId.eq(otp_id))
            .count(&self.db)
            .await
            .context("check attendance record exists")?;
        Ok(count > 0)
    }

    async fn create(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError> {
        attendance_records::ActiveModel {
            id: Set(record.id),
            student_id: Set(record.student_id),
            class_id: Set(record.class_id),
            otp_id: Set(record.otp_id),
            marked_at: Set(record.marked_at),
            status: Set(record.status.clone()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            insert_err(
                e,
                AttendanceServiceError::AlreadyRedeemed,
                "create attendance record",
            )
        })?;
        Ok(())
    }

    async fn list_by_student_with_class(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(AttendanceRecord, Option<String>)>, AttendanceServiceError> {
        let rows = attendance_records::Entity::find()
            .filter(attendance_records::Column::StudentId.eq(student_id))
            .find_also_related(classes::Entity)
            .order_by_desc(attendance_records::Column::MarkedAt)
            .all(&self.db)
            .await
            .context("list attendance by student")?;
        Ok(rows
            .into_iter()
            .map(|(record, class)| (record_from_model(record), class.map(|c| c.name)))
            .collect())
    }

    async fn find_by_class_in_window(
        &self,
        class_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let models = attendance_records::Entity::find()
            .filter(attendance_records::Column::ClassId.eq(class_id))
            .filter(attendance_records::Column::MarkedAt.gte(from))
            .filter(attendance_records::Column::MarkedAt.lt(to))
            .all(&self.db)
            .await
            .context("find attendance by class in window")?;
        Ok(models.into_iter().map(record_from_model).collect())
    }
}

fn record_from_model(model: attendance_records::Model) -> AttendanceRecord {
    AttendanceRecord {
        id: model.id,
        student_id: model.student_id,
        class_id: model.class_id,
        otp_id: model.otp_id,
        marked_at: model.marked_at,
        status: model.status,
    }
}
