/// Attendance service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3117). Env var: `ATTENDANCE_PORT`.
    pub attendance_port: u16,
    /// Login identifier for the bootstrap admin account.
    pub admin_username: String,
    /// Credential for the bootstrap admin account.
    pub admin_password: String,
}

impl AttendanceConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            attendance_port: std::env::var("ATTENDANCE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3117),
            admin_username: std::env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME"),
            admin_password: std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD"),
        }
    }
}
