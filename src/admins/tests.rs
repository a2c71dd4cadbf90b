//! Tests for admins module
//!
//! These tests verify admin creation end to end:
//! - Payload validation and normalization
//! - Password hashing and persistence
//! - HTTP status mapping

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::{AppState, ValidateError, Validator, ViolationKind};
    use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
    use axum::{body::Bytes, extract::Extension, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    fn valid_payload() -> serde_json::Value {
        json!({
            "email": "  Admin.User@Example.com ",
            "name": "  Jane Doe ",
            "password": "correct horse",
        })
    }

    #[test]
    fn test_admin_validator_normalizes_input() {
        let input = validators::CreateAdminValidator
            .validate(&valid_payload())
            .unwrap();

        assert_eq!(input.email, "admin.user@example.com");
        assert_eq!(input.name, "Jane Doe");
        assert_eq!(input.password, "correct horse");
    }

    #[test]
    fn test_admin_validator_is_idempotent() {
        let first = validators::CreateAdminValidator
            .validate(&valid_payload())
            .unwrap();
        let again = validators::CreateAdminValidator
            .validate(&json!({
                "email": first.email,
                "name": first.name,
                "password": first.password,
            }))
            .unwrap();

        assert_eq!(first, again);
    }

    #[test]
    fn test_admin_validator_rejects_forbidden_fields() {
        for field in ["id", "createdAt", "updatedAt"] {
            let mut payload = valid_payload();
            payload[field] = json!("anything");

            let err = validators::CreateAdminValidator.validate(&payload).unwrap_err();
            let ValidateError::Invalid(failure) = err else {
                panic!("expected a user input violation");
            };
            assert_eq!(failure.len(), 1);
            assert!(failure.has_violation(field, ViolationKind::Forbidden));
        }
    }

    #[test]
    fn test_admin_validator_reports_every_violation() {
        let err = validators::CreateAdminValidator
            .validate(&json!({
                "id": "x",
                "email": "A@B.COM",
                "name": "Jo",
                "password": 12345678,
            }))
            .unwrap_err();

        let ValidateError::Invalid(failure) = err else {
            panic!("expected a user input violation");
        };
        assert_eq!(
            failure.aggregated_message(),
            "***id*** is not allowed && \
             ***email*** length must be at least 15 characters long && \
             ***name*** length must be at least 3 characters long && \
             ***password*** must be a string"
        );
    }

    #[test]
    fn test_admin_debug_hides_password() {
        let input = validators::CreateAdminValidator
            .validate(&valid_payload())
            .unwrap();
        let debug = format!("{:?}", input);
        assert!(!debug.contains("correct horse"));
    }

    #[tokio::test]
    async fn test_create_admin_hashes_password() {
        let state = AppState::for_tests().await;
        let service = services::AdminService::new(state.db.clone());

        let input = validators::CreateAdminValidator
            .validate(&valid_payload())
            .unwrap();
        let admin = service.create_admin(input).await.unwrap();

        assert_ne!(admin.password_hash, "correct horse");
        let parsed = PasswordHash::new(&admin.password_hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"correct horse", &parsed)
            .is_ok());

        let stored = sqlx::query_as::<_, models::Admin>(
            "SELECT id, email, name, password_hash, created_at, updated_at FROM admins WHERE id = ?",
        )
        .bind(&admin.id)
        .fetch_one(&state.db)
        .await
        .unwrap();
        assert_eq!(stored.email, "admin.user@example.com");
        assert_eq!(stored.name, "Jane Doe");
        assert_eq!(stored.password_hash, admin.password_hash);
        assert_eq!(stored.created_at, admin.created_at);
        assert_eq!(stored.updated_at, admin.updated_at);

        let json = serde_json::to_value(&admin).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_create_admin_handler_status_codes() {
        let state = AppState::for_tests().await;
        let body = Bytes::from(valid_payload().to_string());

        let created = handlers::create_admin(Extension(state.clone()), body.clone())
            .await
            .into_response();
        assert_eq!(created.status(), StatusCode::CREATED);

        let duplicate = handlers::create_admin(Extension(state.clone()), body)
            .await
            .into_response();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let invalid = handlers::create_admin(
            Extension(state.clone()),
            Bytes::from(r#"{"email": "nope"}"#),
        )
        .await
        .into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let malformed = handlers::create_admin(Extension(state), Bytes::from("not json"))
            .await
            .into_response();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    }
}
