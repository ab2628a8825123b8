//! # pb-api
//!
//! The web routing and orchestration layer for Pulse-Board.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the application.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Idea box
            .route("/ideas", web::get().to(handlers::list_ideas))
            .route("/ideas", web::post().to(handlers::create_idea))
            .route("/ideas/{id}/like", web::post().to(handlers::toggle_like))
            .route("/ideas/{id}/comments", web::post().to(handlers::add_comment))
            .route("/ideas/{id}", web::delete().to(handlers::delete_idea))
            // Anonymous message wall
            .route("/messages", web::get().to(handlers::list_messages))
            .route("/messages", web::post().to(handlers::create_message))
            .route("/messages/{id}", web::delete().to(handlers::delete_message))
            // Emergency intake
            .route("/emergencies", web::post().to(handlers::create_emergency))
            .route("/emergencies", web::get().to(handlers::list_emergencies))
            // About you
            .route("/about-u", web::get().to(handlers::list_about_entries))
            .route("/about-u", web::post().to(handlers::create_about_entry))
            // Moderation preview
            .route(
                "/moderation/preview",
                web::post().to(handlers::moderation_preview),
            ),
    );
}
