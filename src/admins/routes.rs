//! Admin routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the admin router
///
/// # Routes
/// - `POST /admins` - Create an administrator account
pub fn admins_routes() -> Router {
    Router::new().route("/admins", post(handlers::create_admin))
}
