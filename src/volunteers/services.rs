// src/volunteers/services.rs

use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{CreateVolunteerInput, Volunteer};
use crate::common::error::is_unique_violation;
use crate::common::{safe_email_log, ApiError};

pub struct VolunteerService {
    db: SqlitePool,
}

impl VolunteerService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Register a new volunteer from a validated payload
    pub async fn create_volunteer(&self, input: CreateVolunteerInput) -> Result<Volunteer, ApiError> {
        let volunteer = Volunteer::new(input);

        let free_days = serde_json::to_string(&volunteer.list_free_days_of_week).map_err(|e| {
            ApiError::InternalServer(format!("failed to serialize free days: {}", e))
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO volunteers (
                id, email, full_name, birthdate, cellphone_number_with_ddd, occupation,
                university, semester, speciality, list_free_days_of_week,
                number_of_free_days_of_week, time_of_experience, how_much_participate,
                how_did_know_of_sdr, verified_email, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&volunteer.id)
        .bind(&volunteer.email)
        .bind(&volunteer.full_name)
        .bind(volunteer.birthdate.map(|date| date.format("%Y-%m-%d").to_string()))
        .bind(&volunteer.cellphone_number_with_ddd)
        .bind(volunteer.occupation.as_str())
        .bind(&volunteer.university)
        .bind(volunteer.semester.map(|semester| semester.as_str()))
        .bind(&volunteer.speciality)
        .bind(&free_days)
        .bind(volunteer.number_of_free_days_of_week as i64)
        .bind(&volunteer.time_of_experience)
        .bind(volunteer.how_much_participate.as_str())
        .bind(&volunteer.how_did_know_of_sdr)
        .bind(volunteer.verified_email)
        .bind(volunteer.created_at)
        .bind(volunteer.updated_at)
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            if is_unique_violation(&e) {
                warn!(
                    email = %safe_email_log(&volunteer.email),
                    "Volunteer registration rejected: email already registered"
                );
                return Err(ApiError::Conflict("Email already registered".to_string()));
            }
            return Err(ApiError::DatabaseError(e));
        }

        info!(
            volunteer_id = %volunteer.id,
            email = %safe_email_log(&volunteer.email),
            occupation = %volunteer.occupation,
            free_days = volunteer.number_of_free_days_of_week,
            "Volunteer registered"
        );

        Ok(volunteer)
    }
}
