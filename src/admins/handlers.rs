//! Admin handlers

use axum::{body::Bytes, extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};

use super::models::MessageResponse;
use super::services::AdminService;
use super::validators::CreateAdminValidator;
use crate::common::error::ActionError;
use crate::common::{parse_payload, safe_email_log, ApiError, AppState, ValidateError, Validator};

const CREATE_ADMIN_FAILED: &str = "Failed to create Admin account";

/// POST /admins
/// Creates an administrator account
///
/// # Request Body
/// ```json
/// {
///   "email": "admin@example.com",
///   "name": "Jane Doe",
///   "password": "<8 to 30 characters>"
/// }
/// ```
///
/// # Response
/// `201` with `{ "message": "Successfully create Admin account" }`, `400` with
/// every violated constraint, `409` when the email is taken.
pub async fn create_admin(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ActionError> {
    info!("🔐 Received create admin request");

    let payload = parse_payload(&body)
        .map_err(|failure| ApiError::ValidationError(failure).during(CREATE_ADMIN_FAILED))?;

    let input = CreateAdminValidator.validate(&payload).map_err(|e| {
        if let ValidateError::Invalid(failure) = &e {
            warn!(
                violations = failure.len(),
                "Admin creation rejected: invalid payload"
            );
        }
        ApiError::from(e).during(CREATE_ADMIN_FAILED)
    })?;

    let email = safe_email_log(&input.email);
    let admin = AdminService::new(state.db.clone())
        .create_admin(input)
        .await
        .map_err(|e| e.during(CREATE_ADMIN_FAILED))?;

    info!(admin_id = %admin.id, email = %email, "Admin creation completed");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Successfully create Admin account".to_string(),
        }),
    ))
}
