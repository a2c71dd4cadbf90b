// src/admins/services.rs

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{Admin, CreateAdminInput};
use crate::common::error::is_unique_violation;
use crate::common::{safe_email_log, ApiError};

pub struct AdminService {
    db: SqlitePool,
}

impl AdminService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a new admin account from a validated payload
    pub async fn create_admin(&self, input: CreateAdminInput) -> Result<Admin, ApiError> {
        let CreateAdminInput {
            email,
            name,
            password,
        } = input;

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ApiError::InternalServer(format!("password hashing task failed: {}", e)))??;

        let admin = Admin::new(email, name, password_hash);

        let result = sqlx::query(
            r#"
            INSERT INTO admins (id, email, name, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.email)
        .bind(&admin.name)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            if is_unique_violation(&e) {
                warn!(
                    email = %safe_email_log(&admin.email),
                    "Admin creation rejected: email already registered"
                );
                return Err(ApiError::Conflict("Email already registered".to_string()));
            }
            return Err(ApiError::DatabaseError(e));
        }

        info!(
            admin_id = %admin.id,
            email = %safe_email_log(&admin.email),
            "Admin account created"
        );

        Ok(admin)
    }
}

/// Hash a password using Argon2id
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))
}
