//! # Pulse-Board Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use pb_api::handlers::AppState;
use pb_core::submission::SubmissionCoordinator;

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use pb_db_sqlite::SqliteSubmissionRepo;

#[cfg(feature = "auth-simple")]
use pb_auth_simple::TokenAdminGate;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:pulse_board.db".to_owned());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_owned());
    let admin_token = std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| {
        log::warn!("ADMIN_TOKEN not set; admin routes will reject everything");
        String::new()
    });

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = SqliteSubmissionRepo::new(&database_url)
        .await
        .expect("Failed to init SQLite");

    // 2. Initialize Admin Gate Implementation
    #[cfg(feature = "auth-simple")]
    let gate = TokenAdminGate::new(&admin_token);

    // 3. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState {
        repo: Box::new(repo),
        gate: Box::new(gate),
        coordinator: SubmissionCoordinator::default(),
    });

    log::info!("🚀 Pulse-Board starting on http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(pb_api::middleware::standard_middleware())
            .wrap(pb_api::middleware::cors_policy())
            .configure(pb_api::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
