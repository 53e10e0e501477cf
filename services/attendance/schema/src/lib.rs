//! sea-orm entities for the attendance service schema.

pub mod admins;
pub mod attendance_records;
pub mod classes;
pub mod otps;
pub mod students;
pub mod teachers;
