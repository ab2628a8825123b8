//! pulse-board/crates/pb-api/src/middleware.rs Middleware
//!
//! Custom middleware for security, logging, and traffic control.

use actix_cors::Cors;
use actix_web::middleware::Logger;

// Returns a standard set of middleware for the Pulse-Board API.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    // Note: wall-message submissions carry nothing identifying in their
    // bodies, so access logs never correlate a person to a message.
    Logger::default()
}

// Configures CORS (Cross-Origin Resource Sharing)
// Important because the SPA and the API live on different ports in dev.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_header()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .max_age(3600)
}
