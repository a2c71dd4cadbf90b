//! Volunteer routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the volunteer router
///
/// # Routes
/// - `POST /volunteers` - Register a volunteer
pub fn volunteers_routes() -> Router {
    Router::new().route("/volunteers", post(handlers::create_volunteer))
}
