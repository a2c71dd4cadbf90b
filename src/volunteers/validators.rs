// src/volunteers/validators.rs

use chrono::NaiveDate;
use std::sync::OnceLock;

use super::models::{CreateVolunteerInput, FreeDayOfWeek, HowMuchParticipate, Occupation, Semester};
use crate::common::{DateField, ListField, Schema, SchemaError, TextField, Validator, EMAIL_TLDS};

/// Brazilian mobile number with area code, e.g. `(11) 91234-5678`
const CELLPHONE_PATTERN: &str = r"^\([1-9]{2}\) 9[1-9][0-9]{3}-[0-9]{4}$";

// ============================================================================
// Volunteer Validators
// ============================================================================

pub struct CreateVolunteerValidator;

impl Validator for CreateVolunteerValidator {
    type Output = CreateVolunteerInput;

    fn schema(&self) -> Result<&'static Schema, SchemaError> {
        static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
        SCHEMA
            .get_or_init(create_volunteer_schema)
            .as_ref()
            .map_err(Clone::clone)
    }
}

pub fn create_volunteer_schema() -> Result<Schema, SchemaError> {
    let oldest_birthdate = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);

    Schema::builder("volunteer")
        .domain(Occupation::DOMAIN)
        .domain(Semester::DOMAIN)
        .domain(FreeDayOfWeek::DOMAIN)
        .domain(HowMuchParticipate::DOMAIN)
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
        .field(TextField::new("fullName").min_len(3).max_len(100).trim().required())
        .field(DateField::new("birthdate").after(oldest_birthdate).before_now())
        .field(
            TextField::new("cellphoneNumberWithDDD")
                .pattern(CELLPHONE_PATTERN, "(xx) 9xxxx-xxxx")
                .required(),
        )
        .field(
            TextField::new("occupation")
                .one_of(Occupation::DOMAIN.name())
                .trim()
                .required(),
        )
        .field(TextField::new("university").trim().allow_empty())
        .field(
            TextField::new("semester")
                .one_of(Semester::DOMAIN.name())
                .allow_empty(),
        )
        .field(TextField::new("speciality").trim().allow_empty())
        .field(
            ListField::new(
                "listFreeDaysOfWeek",
                TextField::item().one_of(FreeDayOfWeek::DOMAIN.name()),
            )
            .unique()
            .max_items(7)
            .min_items(1)
            .required(),
        )
        .field(TextField::new("timeOfExperience"))
        .field(
            TextField::new("howMuchParticipate")
                .one_of(HowMuchParticipate::DOMAIN.name())
                .required(),
        )
        .field(TextField::new("howDidKnowOfSDR").min_len(1).max_len(80).required())
        .build()
}
