use actix_web::HttpResponse;

use crate::response::ok_empty;

/// Liveness probe; does not touch the database.
pub async fn health_check() -> HttpResponse {
    tracing::debug!("Health check endpoint called");
    ok_empty()
}
