use sea_orm_migration::prelude::*;

mod m20260801_000001_create_admins;
mod m20260801_000002_create_teachers;
mod m20260801_000003_create_classes;
mod m20260801_000004_create_students;
mod m20260801_000005_create_otps;
mod m20260801_000006_create_attendance_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_admins::Migration),
            Box::new(m20260801_000002_create_teachers::Migration),
            Box::new(m20260801_000003_create_classes::Migration),
            Box::new(m20260801_000004_create_students::Migration),
            Box::new(m20260801_000005_create_otps::Migration),
            Box::new(m20260801_000006_create_attendance_records::Migration),
        ]
    }
}
