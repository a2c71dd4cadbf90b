// src/admins/validators.rs

use std::sync::OnceLock;

use super::models::CreateAdminInput;
use crate::common::{Schema, SchemaError, TextField, Validator, EMAIL_TLDS};

// ============================================================================
// Admin Validators
// ============================================================================

pub struct CreateAdminValidator;

impl Validator for CreateAdminValidator {
    type Output = CreateAdminInput;

    fn schema(&self) -> Result<&'static Schema, SchemaError> {
        static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
        SCHEMA
            .get_or_init(create_admin_schema)
            .as_ref()
            .map_err(Clone::clone)
    }
}

pub fn create_admin_schema() -> Result<Schema, SchemaError> {
    Schema::builder("admin")
        .forbid("id")
        .forbid("createdAt")
        .forbid("updatedAt")
        .field(
            TextField::new("email")
                .email(EMAIL_TLDS)
                .lowercase()
                .min_len(15)
                .max_len(50)
                .trim()
                .required(),
        )
        .field(TextField::new("name").min_len(3).max_len(100).trim().required())
        .field(TextField::new("password").min_len(8).max_len(30).required())
        .build()
}
