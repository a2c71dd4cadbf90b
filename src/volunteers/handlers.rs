//! Volunteer handlers

use axum::{body::Bytes, extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};

use super::models::CreateVolunteerResponse;
use super::services::VolunteerService;
use super::validators::CreateVolunteerValidator;
use crate::common::error::ActionError;
use crate::common::{parse_payload, ApiError, AppState, ValidateError, Validator};

const CREATE_VOLUNTEER_FAILED: &str = "Failed to create Volunteer account";

/// POST /volunteers
/// Registers a volunteer
///
/// # Response
/// `201` with the stored volunteer, `400` with every violated constraint
/// joined by ` && `, `409` when the email is taken.
pub async fn create_volunteer(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ActionError> {
    info!("📥 Received volunteer registration");

    let payload = parse_payload(&body)
        .map_err(|failure| ApiError::ValidationError(failure).during(CREATE_VOLUNTEER_FAILED))?;

    let input = CreateVolunteerValidator.validate(&payload).map_err(|e| {
        if let ValidateError::Invalid(failure) = &e {
            warn!(
                violations = failure.len(),
                "Volunteer registration rejected: invalid payload"
            );
        }
        ApiError::from(e).during(CREATE_VOLUNTEER_FAILED)
    })?;

    let volunteer = VolunteerService::new(state.db.clone())
        .create_volunteer(input)
        .await
        .map_err(|e| e.during(CREATE_VOLUNTEER_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateVolunteerResponse {
            message: "Successfully create Volunteer account".to_string(),
            volunteer,
        }),
    ))
}
