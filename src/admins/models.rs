// src/admins/models.rs

use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::common::{SchemaError, ValidatedRecord};

/// Validated, normalized admin-creation payload
#[derive(Clone, PartialEq, Eq)]
pub struct CreateAdminInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl fmt::Debug for CreateAdminInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAdminInput")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"***")
            .finish()
    }
}

impl TryFrom<ValidatedRecord> for CreateAdminInput {
    type Error = SchemaError;

    fn try_from(mut record: ValidatedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            email: record.require_text("email")?,
            name: record.require_text("name")?,
            password: record.require_text("password")?,
        })
    }
}

/// Admin database model
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Admin {
    /// Builds a fresh admin with a new id and creation timestamps (epoch millis)
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
