use sea_orm::Database;
use tracing::info;

use rollcall_attendance::config::AttendanceConfig;
use rollcall_attendance::router::build_router;
use rollcall_attendance::state::AppState;
use rollcall_attendance::usecase::roster::{BootstrapAdminInput, BootstrapAdminUseCase};

#[tokio::main]
async fn main() {
    rollcall_core::tracing::init_tracing();

    let config = AttendanceConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        session_secret: config.session_secret,
        cookie_domain: config.cookie_domain,
    };

    // Seed the admin account on first start.
    let bootstrap = BootstrapAdminUseCase {
        admins: state.admin_repo(),
    };
    let created = bootstrap
        .execute(BootstrapAdminInput {
            username: config.admin_username,
            password: config.admin_password,
        })
        .await
        .expect("failed to bootstrap admin account");
    if created {
        info!("bootstrapped admin account");
    }

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("attendance service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
