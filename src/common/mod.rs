// Common module - shared types and utilities across all modules

pub mod config;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod migrations;
pub mod schema;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::ApiError;
pub use helpers::{redact_secrets, safe_email_log};
pub use schema::{DateField, ListField, Schema, TextField, EMAIL_TLDS};
pub use state::AppState;
pub use validation::{
    parse_payload, SchemaError, ValidateError, ValidatedRecord, ValidationFailure, Validator,
    ViolationKind,
};
