// src/volunteers/models.rs

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::common::domain::enum_domain;
use crate::common::{SchemaError, ValidatedRecord};

// ============================================================================
// Enum domains
// ============================================================================

enum_domain! {
    /// Professional occupation of the volunteer
    pub enum Occupation: "occupation" {
        Medico => "MEDICO",
        Enfermeiro => "ENFERMEIRO",
        Farmaceutico => "FARMACEUTICO",
        Estudante => "ESTUDANTE",
    }
}

enum_domain! {
    /// Current semester, for students
    pub enum Semester: "semester" {
        First => "FIRST",
        Second => "SECOND",
        Third => "THIRD",
        Fourth => "FOURTH",
        Fifth => "FIFTH",
        Sixth => "SIXTH",
        Seventh => "SEVENTH",
        Eighth => "EIGHTH",
        Ninth => "NINTH",
        Tenth => "TENTH",
        More => "MORE",
    }
}

enum_domain! {
    pub enum FreeDayOfWeek: "freeDaysOfWeek" {
        Domingo => "DOMINGO",
        Segunda => "SEGUNDA",
        Terca => "TERCA",
        Quarta => "QUARTA",
        Quinta => "QUINTA",
        Sexta => "SEXTA",
        Sabado => "SABADO",
    }
}

enum_domain! {
    /// How many previous editions the volunteer took part in
    pub enum HowMuchParticipate: "howMuchParticipate" {
        NotParticipated => "NOT_PARTICIPATED",
        OneParticipation => "ONE_PARTICIPATION",
        BetweenTwoAndFiveParticipation => "BETWEEN_TWO_AND_FIVE_PARTICIPATION",
        MoreThanFiveParticipation => "MORE_THAN_FIVE_PARTICIPATION",
    }
}

// ============================================================================
// Validated input
// ============================================================================

/// Validated, normalized volunteer registration payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVolunteerInput {
    pub email: String,
    pub full_name: String,
    pub birthdate: Option<NaiveDate>,
    pub cellphone_number_with_ddd: String,
    pub occupation: Occupation,
    pub university: Option<String>,
    pub semester: Option<Semester>,
    pub speciality: Option<String>,
    pub list_free_days_of_week: Vec<FreeDayOfWeek>,
    pub time_of_experience: Option<String>,
    pub how_much_participate: HowMuchParticipate,
    pub how_did_know_of_sdr: String,
}

impl TryFrom<ValidatedRecord> for CreateVolunteerInput {
    type Error = SchemaError;

    fn try_from(mut record: ValidatedRecord) -> Result<Self, Self::Error> {
        let entity = record.entity();
        let list_free_days_of_week = record
            .require_list("listFreeDaysOfWeek")?
            .iter()
            .map(|day| day.parse::<FreeDayOfWeek>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SchemaError::RecordMismatch {
                entity,
                field: "listFreeDaysOfWeek",
                detail: e.to_string(),
            })?;

        Ok(Self {
            email: record.require_text("email")?,
            full_name: record.require_text("fullName")?,
            // Calendar day in the offset the client wrote
            birthdate: record.take_date("birthdate")?.map(|date| date.date_naive()),
            cellphone_number_with_ddd: record.require_text("cellphoneNumberWithDDD")?,
            occupation: record.require_parsed("occupation")?,
            university: record.take_text("university")?,
            semester: record.take_parsed("semester")?,
            speciality: record.take_text("speciality")?,
            list_free_days_of_week,
            time_of_experience: record.take_text("timeOfExperience")?,
            how_much_participate: record.require_parsed("howMuchParticipate")?,
            how_did_know_of_sdr: record.require_text("howDidKnowOfSDR")?,
        })
    }
}

// ============================================================================
// Entity
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub email: String,
    pub full_name: String,
    pub birthdate: Option<NaiveDate>,
    #[serde(rename = "cellphoneNumberWithDDD")]
    pub cellphone_number_with_ddd: String,
    pub occupation: Occupation,
    pub university: Option<String>,
    pub semester: Option<Semester>,
    pub speciality: Option<String>,
    pub list_free_days_of_week: Vec<FreeDayOfWeek>,
    pub number_of_free_days_of_week: usize,
    pub time_of_experience: Option<String>,
    pub how_much_participate: HowMuchParticipate,
    #[serde(rename = "howDidKnowOfSDR")]
    pub how_did_know_of_sdr: String,
    pub verified_email: bool,
}

impl Volunteer {
    /// Builds a new, unverified volunteer with a fresh id and timestamps (epoch millis)
    pub fn new(input: CreateVolunteerInput) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            number_of_free_days_of_week: input.list_free_days_of_week.len(),
            email: input.email,
            full_name: input.full_name,
            birthdate: input.birthdate,
            cellphone_number_with_ddd: input.cellphone_number_with_ddd,
            occupation: input.occupation,
            university: input.university,
            semester: input.semester,
            speciality: input.speciality,
            list_free_days_of_week: input.list_free_days_of_week,
            time_of_experience: input.time_of_experience,
            how_much_participate: input.how_much_participate,
            how_did_know_of_sdr: input.how_did_know_of_sdr,
            verified_email: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateVolunteerResponse {
    pub message: String,
    pub volunteer: Volunteer,
}
