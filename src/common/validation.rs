// Common validation types and traits

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::schema::Schema;

/// Separator placed between violation messages in the aggregated text
pub const MESSAGE_SEPARATOR: &str = " && ";

/// Replacement for double quotes inside individual violation messages
pub const QUOTE_MARKER: &str = "***";

// ============================================================================
// Violations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    Forbidden,
    Unknown,
    Type,
    Empty,
    MinLength,
    MaxLength,
    Pattern,
    Email,
    Enum,
    DateMin,
    DateMax,
    ArrayMin,
    ArrayMax,
    Duplicate,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
    pub kind: ViolationKind,
}

/// Every constraint a payload broke, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failure for a body that is not a JSON object at all
    pub fn malformed() -> Self {
        let mut failure = Self::new();
        failure.add(
            "value",
            "\"value\" must be of type object",
            ViolationKind::Malformed,
        );
        failure
    }

    pub fn add(&mut self, path: &str, message: impl Into<String>, kind: ViolationKind) {
        self.violations.push(Violation {
            path: path.to_string(),
            message: message.into(),
            kind,
        });
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Joins all messages with [`MESSAGE_SEPARATOR`], quotes replaced by [`QUOTE_MARKER`]
    pub fn aggregated_message(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.message.replace('"', QUOTE_MARKER))
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }

    /// `Ok(value)` when nothing was recorded, `Err(self)` otherwise
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationFailure> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.aggregated_message())
    }
}

impl std::error::Error for ValidationFailure {}

#[cfg(test)]
impl ValidationFailure {
    pub fn has_violation(&self, path: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.path == path && v.kind == kind)
    }
}

// ============================================================================
// Error taxonomy
// ============================================================================

/// A schema declaration that can never validate correctly.
///
/// These are programmer errors and must never be reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema `{entity}` declares field `{field}` more than once")]
    DuplicateField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("schema `{entity}` registers enum domain `{domain}` more than once")]
    DuplicateDomain {
        entity: &'static str,
        domain: &'static str,
    },

    #[error("field `{field}` of schema `{entity}` references undefined enum domain `{domain}`")]
    UndefinedDomain {
        entity: &'static str,
        field: &'static str,
        domain: &'static str,
    },

    #[error("field `{field}` of schema `{entity}` has an invalid pattern: {reason}")]
    InvalidPattern {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("field `{field}` of schema `{entity}` has inverted bounds ({min} > {max})")]
    InvertedBounds {
        entity: &'static str,
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("validated `{entity}` record does not fit its type at `{field}`: {detail}")]
    RecordMismatch {
        entity: &'static str,
        field: &'static str,
        detail: String,
    },
}

/// Outcome of a failed validation attempt
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidateError {
    /// The payload broke one or more constraints
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// The schema itself is broken
    #[error("validation schema misconfigured: {0}")]
    Schema(#[from] SchemaError),
}

// ============================================================================
// Validated record
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Keeps the offset the payload was written in
    Date(DateTime<FixedOffset>),
    List(Vec<String>),
}

/// Normalized output of a schema: declared fields only, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    entity: &'static str,
    values: Vec<(&'static str, FieldValue)>,
}

impl ValidatedRecord {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            values: Vec::new(),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn insert(&mut self, field: &'static str, value: FieldValue) {
        self.values.push((field, value));
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(name, _)| *name)
    }

    fn take(&mut self, field: &'static str) -> Option<FieldValue> {
        let index = self.values.iter().position(|(name, _)| *name == field)?;
        Some(self.values.remove(index).1)
    }

    fn mismatch(&self, field: &'static str, detail: impl Into<String>) -> SchemaError {
        SchemaError::RecordMismatch {
            entity: self.entity,
            field,
            detail: detail.into(),
        }
    }

    /// Removes an optional text field
    pub fn take_text(&mut self, field: &'static str) -> Result<Option<String>, SchemaError> {
        match self.take(field) {
            None => Ok(None),
            Some(FieldValue::Text(text)) => Ok(Some(text)),
            Some(_) => Err(self.mismatch(field, "expected text")),
        }
    }

    /// Removes a text field the schema declares as required
    pub fn require_text(&mut self, field: &'static str) -> Result<String, SchemaError> {
        self.take_text(field)?
            .ok_or_else(|| self.mismatch(field, "required text missing"))
    }

    pub fn take_date(
        &mut self,
        field: &'static str,
    ) -> Result<Option<DateTime<FixedOffset>>, SchemaError> {
        match self.take(field) {
            None => Ok(None),
            Some(FieldValue::Date(date)) => Ok(Some(date)),
            Some(_) => Err(self.mismatch(field, "expected date")),
        }
    }

    pub fn require_list(&mut self, field: &'static str) -> Result<Vec<String>, SchemaError> {
        match self.take(field) {
            Some(FieldValue::List(items)) => Ok(items),
            Some(_) => Err(self.mismatch(field, "expected list")),
            None => Err(self.mismatch(field, "required list missing")),
        }
    }

    /// Parses a text field into one of the enum-domain types
    pub fn require_parsed<T>(&mut self, field: &'static str) -> Result<T, SchemaError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        let text = self.require_text(field)?;
        text.parse().map_err(|e: T::Err| self.mismatch(field, e.to_string()))
    }

    /// Like [`require_parsed`](Self::require_parsed) but treats absent and empty text as `None`
    pub fn take_parsed<T>(&mut self, field: &'static str) -> Result<Option<T>, SchemaError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        match self.take_text(field)? {
            None => Ok(None),
            Some(text) if text.is_empty() => Ok(None),
            Some(text) => text
                .parse()
                .map(Some)
                .map_err(|e: T::Err| self.mismatch(field, e.to_string())),
        }
    }
}

#[cfg(test)]
impl FieldValue {
    pub fn to_json(&self) -> Value {
        use chrono::SecondsFormat;

        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Date(date) => {
                Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

#[cfg(test)]
impl ValidatedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Renders the record back into payload form
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        for (name, value) in &self.values {
            object.insert((*name).to_string(), value.to_json());
        }
        Value::Object(object)
    }
}

/// Decodes a request body into a raw payload; undecodable bodies are malformed
pub fn parse_payload(body: &[u8]) -> Result<Value, ValidationFailure> {
    serde_json::from_slice(body).map_err(|_| ValidationFailure::malformed())
}

// ============================================================================
// Validator trait
// ============================================================================

/// A payload validator bound to one static schema and one typed output
pub trait Validator {
    type Output: TryFrom<ValidatedRecord, Error = SchemaError>;

    fn schema(&self) -> Result<&'static Schema, SchemaError>;

    fn validate_at(&self, payload: &Value, now: DateTime<Utc>) -> Result<Self::Output, ValidateError> {
        let record = self.schema()?.validate_at(payload, now)?;
        debug!(
            entity = record.entity(),
            fields = ?record.fields().collect::<Vec<_>>(),
            "Payload validated"
        );
        Ok(Self::Output::try_from(record)?)
    }

    fn validate(&self, payload: &Value) -> Result<Self::Output, ValidateError> {
        self.validate_at(payload, Utc::now())
    }
}
