// src/common/schema.rs
//! Declarative field schemas and their evaluation.
//!
//! A [`Schema`] is declared once per entity through [`SchemaBuilder`] and
//! checked when built: duplicate fields, unknown enum domains, broken
//! patterns and inverted bounds are [`SchemaError`]s. Evaluation never stops
//! at the first problem; every violated constraint of every field is
//! collected, then undeclared keys are reported.
//!
//! A text field is type-checked, trimmed and tested for emptiness first. Its
//! remaining rules (length, email, pattern, enum) then run in the order they
//! were declared on the builder. Length, email and pattern see the trimmed
//! input; case normalization is applied to the stored value and to enum
//! membership only. A field that is missing or has the wrong JSON type
//! (including `null`) reports only that.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::mem;

use super::domain::EnumDomain;
use super::validation::{
    FieldValue, SchemaError, ValidatedRecord, ValidationFailure, ViolationKind,
};

/// Top-level domains accepted by the email rule of the registration schemas
pub const EMAIL_TLDS: &[&str] = &["com", "br", "net"];

const EMAIL_SHAPE: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$";

/// Calendar-date layouts, read as midnight UTC
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Date-time layouts without an offset, read as UTC
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Largest magnitude of a valid epoch-millisecond date
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

// ============================================================================
// Declarations
// ============================================================================

/// A rule of a [`TextField`], kept in declaration order
#[derive(Debug, Clone)]
enum TextCheck {
    MinLen(usize),
    MaxLen(usize),
    Email(&'static [&'static str]),
    Pattern(&'static str, &'static str),
    OneOf(&'static str),
}

/// String field declaration
#[derive(Debug, Clone)]
pub struct TextField {
    name: &'static str,
    required: bool,
    trim: bool,
    lowercase: bool,
    allow_empty: bool,
    checks: Vec<TextCheck>,
}

impl TextField {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            trim: false,
            lowercase: false,
            allow_empty: false,
            checks: Vec::new(),
        }
    }

    /// Declaration for the items of a [`ListField`]
    pub fn item() -> Self {
        Self::new("")
    }

    /// Redeclaring a rule replaces it in place
    fn check(mut self, check: TextCheck) -> Self {
        let kind = mem::discriminant(&check);
        match self.checks.iter_mut().find(|c| mem::discriminant(&**c) == kind) {
            Some(slot) => *slot = check,
            None => self.checks.push(check),
        }
        self
    }

    fn min_len_bound(&self) -> Option<usize> {
        self.checks.iter().find_map(|check| match check {
            TextCheck::MinLen(min) => Some(*min),
            _ => None,
        })
    }

    fn max_len_bound(&self) -> Option<usize> {
        self.checks.iter().find_map(|check| match check {
            TextCheck::MaxLen(max) => Some(*max),
            _ => None,
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Accepts `""` as a valid value, skipping every other rule
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub fn min_len(self, min: usize) -> Self {
        self.check(TextCheck::MinLen(min))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.check(TextCheck::MaxLen(max))
    }

    pub fn email(self, tlds: &'static [&'static str]) -> Self {
        self.check(TextCheck::Email(tlds))
    }

    /// Regex the value must match; `label` is what users see in the message
    pub fn pattern(self, regex: &'static str, label: &'static str) -> Self {
        self.check(TextCheck::Pattern(regex, label))
    }

    /// Restricts the value to a domain registered on the schema
    pub fn one_of(self, domain: &'static str) -> Self {
        self.check(TextCheck::OneOf(domain))
    }
}

/// Date field declaration
#[derive(Debug, Clone)]
pub struct DateField {
    name: &'static str,
    after: Option<DateTime<Utc>>,
    before_now: bool,
}

impl DateField {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            after: None,
            before_now: false,
        }
    }

    /// The date must be strictly later than midnight UTC of `date`
    pub fn after(mut self, date: NaiveDate) -> Self {
        self.after = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        self
    }

    /// The date must be strictly earlier than the validation clock
    pub fn before_now(mut self) -> Self {
        self.before_now = true;
        self
    }
}

/// Array-of-strings field declaration
#[derive(Debug, Clone)]
pub struct ListField {
    name: &'static str,
    required: bool,
    unique: bool,
    min_items: Option<usize>,
    max_items: Option<usize>,
    items: TextField,
}

impl ListField {
    pub fn new(name: &'static str, items: TextField) -> Self {
        Self {
            name,
            required: false,
            unique: false,
            min_items: None,
            max_items: None,
            items,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
}

#[derive(Debug, Clone)]
pub enum FieldDecl {
    Forbidden(&'static str),
    Text(TextField),
    Date(DateField),
    List(ListField),
}

impl FieldDecl {
    fn name(&self) -> &'static str {
        match self {
            FieldDecl::Forbidden(name) => name,
            FieldDecl::Text(field) => field.name,
            FieldDecl::Date(field) => field.name,
            FieldDecl::List(field) => field.name,
        }
    }
}

impl From<TextField> for FieldDecl {
    fn from(field: TextField) -> Self {
        FieldDecl::Text(field)
    }
}

impl From<DateField> for FieldDecl {
    fn from(field: DateField) -> Self {
        FieldDecl::Date(field)
    }
}

impl From<ListField> for FieldDecl {
    fn from(field: ListField) -> Self {
        FieldDecl::List(field)
    }
}

// ============================================================================
// Compiled schema
// ============================================================================

#[derive(Debug)]
enum TextRule {
    MinLen(usize),
    MaxLen(usize),
    Email(&'static [&'static str]),
    Pattern(Regex, &'static str),
    OneOf(EnumDomain),
}

#[derive(Debug)]
struct TextRules {
    trim: bool,
    lowercase: bool,
    allow_empty: bool,
    rules: Vec<TextRule>,
}

#[derive(Debug)]
struct DateRules {
    after: Option<DateTime<Utc>>,
    before_now: bool,
}

#[derive(Debug)]
struct ListRules {
    unique: bool,
    min_items: Option<usize>,
    max_items: Option<usize>,
    items: TextRules,
}

#[derive(Debug)]
enum Rule {
    Forbidden,
    Text(TextRules),
    Date(DateRules),
    List(ListRules),
}

#[derive(Debug)]
struct Field {
    name: &'static str,
    required: bool,
    rule: Rule,
}

/// An immutable, checked set of field constraints for one entity
#[derive(Debug)]
pub struct Schema {
    entity: &'static str,
    fields: Vec<Field>,
    email_shape: Regex,
}

impl Schema {
    pub fn builder(entity: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            entity,
            domains: Vec::new(),
            fields: Vec::new(),
        }
    }

    fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field.name == key)
    }

    /// Validates against an explicit clock used by "before now" date bounds
    pub fn validate_at(
        &self,
        payload: &Value,
        now: DateTime<Utc>,
    ) -> Result<ValidatedRecord, ValidationFailure> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationFailure::malformed());
        };

        let mut failure = ValidationFailure::new();
        let mut record = ValidatedRecord::new(self.entity);

        for field in &self.fields {
            if let Rule::Forbidden = field.rule {
                if object.contains_key(field.name) {
                    failure.add(
                        field.name,
                        format!("\"{}\" is not allowed", field.name),
                        ViolationKind::Forbidden,
                    );
                }
                continue;
            }

            // `null` is a value of the wrong type, not an absent field
            let Some(value) = object.get(field.name) else {
                if field.required {
                    failure.add(
                        field.name,
                        format!("\"{}\" is required", field.name),
                        ViolationKind::Required,
                    );
                }
                continue;
            };

            let normalized = match &field.rule {
                Rule::Forbidden => None,
                Rule::Text(rules) => self
                    .check_text(field.name, value, rules, &mut failure)
                    .map(FieldValue::Text),
                Rule::Date(rules) => {
                    check_date(field.name, value, rules, now, &mut failure).map(FieldValue::Date)
                }
                Rule::List(rules) => self
                    .check_list(field.name, value, rules, &mut failure)
                    .map(FieldValue::List),
            };

            if let Some(normalized) = normalized {
                record.insert(field.name, normalized);
            }
        }

        for key in object.keys() {
            if !self.declares(key) {
                failure.add(
                    key,
                    format!("\"{}\" is not allowed", key),
                    ViolationKind::Unknown,
                );
            }
        }

        failure.into_result(record)
    }

    fn check_text(
        &self,
        path: &str,
        value: &Value,
        rules: &TextRules,
        failure: &mut ValidationFailure,
    ) -> Option<String> {
        let Some(raw) = value.as_str() else {
            failure.add(path, format!("\"{}\" must be a string", path), ViolationKind::Type);
            return None;
        };

        let text = if rules.trim { raw.trim() } else { raw };

        if text.is_empty() {
            if rules.allow_empty {
                return Some(String::new());
            }
            failure.add(
                path,
                format!("\"{}\" is not allowed to be empty", path),
                ViolationKind::Empty,
            );
            return None;
        }

        let before = failure.len();
        let length = text.chars().count();
        let normalized = if rules.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        for rule in &rules.rules {
            match rule {
                TextRule::MinLen(min) if length < *min => failure.add(
                    path,
                    format!("\"{}\" length must be at least {} characters long", path, min),
                    ViolationKind::MinLength,
                ),
                TextRule::MaxLen(max) if length > *max => failure.add(
                    path,
                    format!(
                        "\"{}\" length must be less than or equal to {} characters long",
                        path, max
                    ),
                    ViolationKind::MaxLength,
                ),
                TextRule::Email(tlds) if !self.is_email(text, tlds) => failure.add(
                    path,
                    format!("\"{}\" must be a valid email", path),
                    ViolationKind::Email,
                ),
                TextRule::Pattern(regex, label) if !regex.is_match(text) => failure.add(
                    path,
                    format!(
                        "\"{}\" with value \"{}\" fails to match the {} pattern",
                        path, text, label
                    ),
                    ViolationKind::Pattern,
                ),
                TextRule::OneOf(domain) if !domain.contains(&normalized) => failure.add(
                    path,
                    format!("\"{}\" must be one of {}", path, domain.describe()),
                    ViolationKind::Enum,
                ),
                _ => {}
            }
        }

        (failure.len() == before).then_some(normalized)
    }

    fn check_list(
        &self,
        path: &str,
        value: &Value,
        rules: &ListRules,
        failure: &mut ValidationFailure,
    ) -> Option<Vec<String>> {
        let Some(values) = value.as_array() else {
            failure.add(path, format!("\"{}\" must be an array", path), ViolationKind::Type);
            return None;
        };

        let before = failure.len();

        if let Some(min) = rules.min_items {
            if values.len() < min {
                failure.add(
                    path,
                    format!("\"{}\" must contain at least {} items", path, min),
                    ViolationKind::ArrayMin,
                );
            }
        }

        if let Some(max) = rules.max_items {
            if values.len() > max {
                failure.add(
                    path,
                    format!("\"{}\" must contain less than or equal to {} items", path, max),
                    ViolationKind::ArrayMax,
                );
            }
        }

        let mut items: Vec<String> = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let item_path = format!("{}[{}]", path, index);
            let Some(item) = self.check_text(&item_path, value, &rules.items, failure) else {
                continue;
            };

            if rules.unique && items.contains(&item) {
                failure.add(
                    &item_path,
                    format!("\"{}\" contains a duplicate value", item_path),
                    ViolationKind::Duplicate,
                );
                continue;
            }
            items.push(item);
        }

        (failure.len() == before).then_some(items)
    }

    fn is_email(&self, text: &str, tlds: &[&str]) -> bool {
        if !self.email_shape.is_match(text) {
            return false;
        }
        text.rsplit('.')
            .next()
            .map(|tld| tlds.iter().any(|allowed| allowed.eq_ignore_ascii_case(tld)))
            .unwrap_or(false)
    }
}

fn check_date(
    path: &str,
    value: &Value,
    rules: &DateRules,
    now: DateTime<Utc>,
    failure: &mut ValidationFailure,
) -> Option<DateTime<FixedOffset>> {
    let Some(date) = parse_date(value) else {
        failure.add(path, format!("\"{}\" must be a valid date", path), ViolationKind::Type);
        return None;
    };

    let before = failure.len();
    let instant = date.with_timezone(&Utc);

    if let Some(after) = rules.after {
        if instant <= after {
            failure.add(
                path,
                format!(
                    "\"{}\" must be greater than \"{}\"",
                    path,
                    after.to_rfc3339_opts(SecondsFormat::Millis, true)
                ),
                ViolationKind::DateMin,
            );
        }
    }

    if rules.before_now && instant >= now {
        failure.add(
            path,
            format!("\"{}\" must be less than \"now\"", path),
            ViolationKind::DateMax,
        );
    }

    (failure.len() == before).then_some(date)
}

/// Reads a date from text or epoch milliseconds, keeping any explicit offset.
///
/// Text may be a numeric timestamp, RFC 3339, RFC 2822, or one of
/// [`DATE_FORMATS`] / [`DATE_TIME_FORMATS`] (taken as UTC).
fn parse_date(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if let Some(millis) = epoch_millis_text(text) {
                return from_epoch_millis(millis);
            }
            if let Ok(date) = DateTime::parse_from_rfc3339(text) {
                return Some(date);
            }
            if let Ok(date) = DateTime::parse_from_rfc2822(text) {
                return Some(date);
            }
            if let Some(date) = DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
            {
                return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().fixed_offset());
            }
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|dt| dt.and_utc().fixed_offset())
        }
        Value::Number(number) => number.as_f64().and_then(from_epoch_millis),
        _ => None,
    }
}

/// `Some` only for plain decimal text such as `"643000000000"` or `"-1.5"`
fn epoch_millis_text(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "0"));
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if is_digits(whole) && is_digits(fraction) {
        text.parse().ok()
    } else {
        None
    }
}

/// Fractional milliseconds are truncated toward zero
fn from_epoch_millis(millis: f64) -> Option<DateTime<FixedOffset>> {
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64).map(|dt| dt.fixed_offset())
}

// ============================================================================
// Builder
// ============================================================================

pub struct SchemaBuilder {
    entity: &'static str,
    domains: Vec<EnumDomain>,
    fields: Vec<FieldDecl>,
}

impl SchemaBuilder {
    pub fn domain(mut self, domain: EnumDomain) -> Self {
        self.domains.push(domain);
        self
    }

    /// Field that must never appear in the payload
    pub fn forbid(mut self, name: &'static str) -> Self {
        self.fields.push(FieldDecl::Forbidden(name));
        self
    }

    pub fn field(mut self, field: impl Into<FieldDecl>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let entity = self.entity;

        let mut domain_names = HashSet::new();
        for domain in &self.domains {
            if !domain_names.insert(domain.name()) {
                return Err(SchemaError::DuplicateDomain {
                    entity,
                    domain: domain.name(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());
        for decl in self.fields {
            let name = decl.name();
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateField {
                    entity,
                    field: name,
                });
            }

            let field = match decl {
                FieldDecl::Forbidden(_) => Field {
                    name,
                    required: false,
                    rule: Rule::Forbidden,
                },
                FieldDecl::Text(text) => Field {
                    name,
                    required: text.required,
                    rule: Rule::Text(compile_text(entity, name, &text, &self.domains)?),
                },
                FieldDecl::Date(date) => Field {
                    name,
                    required: false,
                    rule: Rule::Date(DateRules {
                        after: date.after,
                        before_now: date.before_now,
                    }),
                },
                FieldDecl::List(list) => {
                    check_bounds(entity, name, list.min_items, list.max_items)?;
                    Field {
                        name,
                        required: list.required,
                        rule: Rule::List(ListRules {
                            unique: list.unique,
                            min_items: list.min_items,
                            max_items: list.max_items,
                            items: compile_text(entity, name, &list.items, &self.domains)?,
                        }),
                    }
                }
            };
            fields.push(field);
        }

        let email_shape = Regex::new(EMAIL_SHAPE).map_err(|e| SchemaError::InvalidPattern {
            entity,
            field: "email",
            reason: e.to_string(),
        })?;

        Ok(Schema {
            entity,
            fields,
            email_shape,
        })
    }
}

fn check_bounds(
    entity: &'static str,
    field: &'static str,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), SchemaError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::InvertedBounds {
            entity,
            field,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

fn compile_text(
    entity: &'static str,
    field: &'static str,
    text: &TextField,
    domains: &[EnumDomain],
) -> Result<TextRules, SchemaError> {
    check_bounds(entity, field, text.min_len_bound(), text.max_len_bound())?;

    let mut rules = Vec::with_capacity(text.checks.len());
    for check in &text.checks {
        let rule = match *check {
            TextCheck::MinLen(min) => TextRule::MinLen(min),
            TextCheck::MaxLen(max) => TextRule::MaxLen(max),
            TextCheck::Email(tlds) => TextRule::Email(tlds),
            TextCheck::Pattern(source, label) => {
                let regex = Regex::new(source).map_err(|e| SchemaError::InvalidPattern {
                    entity,
                    field,
                    reason: e.to_string(),
                })?;
                TextRule::Pattern(regex, label)
            }
            TextCheck::OneOf(name) => TextRule::OneOf(
                domains
                    .iter()
                    .copied()
                    .find(|domain| domain.name() == name)
                    .ok_or(SchemaError::UndefinedDomain {
                        entity,
                        field,
                        domain: name,
                    })?,
            ),
        };
        rules.push(rule);
    }

    Ok(TextRules {
        trim: text.trim,
        lowercase: text.lowercase,
        allow_empty: text.allow_empty,
        rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const COLORS: EnumDomain = EnumDomain::new("colors", &["RED", "GREEN", "BLUE"]);

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample_schema() -> Schema {
        Schema::builder("sample")
            .domain(COLORS)
            .forbid("id")
            .field(
                TextField::new("email")
                    .email(EMAIL_TLDS)
                    .lowercase()
                    .min_len(15)
                    .max_len(50)
                    .trim()
                    .required(),
            )
            .field(TextField::new("name").min_len(3).max_len(10).trim().required())
            .field(TextField::new("phone").pattern(r"^\d{4}-\d{4}$", "xxxx-xxxx"))
            .field(TextField::new("color").one_of("colors").allow_empty())
            .field(
                DateField::new("born")
                    .after(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap())
                    .before_now(),
            )
            .field(
                ListField::new("palette", TextField::item().one_of("colors"))
                    .unique()
                    .min_items(1)
                    .max_items(2),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let schema = sample_schema();
        let record = schema
            .validate_at(
                &json!({
                    "email": "  Someone@Example.COM ",
                    "name": " Jane ",
                    "phone": "1234-5678",
                    "color": "RED",
                    "born": "2000-01-01",
                    "palette": ["RED", "BLUE"],
                }),
                now(),
            )
            .unwrap();

        assert_eq!(
            record.get("email"),
            Some(&FieldValue::Text("someone@example.com".to_string()))
        );
        assert_eq!(record.get("name"), Some(&FieldValue::Text("Jane".to_string())));
        assert_eq!(
            record.get("palette"),
            Some(&FieldValue::List(vec!["RED".to_string(), "BLUE".to_string()]))
        );
        assert!(!record.contains("id"));
    }

    #[test]
    fn test_record_preserves_declaration_order() {
        let schema = sample_schema();
        let record = schema
            .validate_at(
                &json!({ "palette": ["RED"], "name": "Jane", "email": "someone@example.com" }),
                now(),
            )
            .unwrap();

        let fields: Vec<_> = record.fields().collect();
        assert_eq!(fields, vec!["email", "name", "palette"]);
    }

    #[test]
    fn test_collects_every_violation_in_declaration_order() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(
                &json!({
                    "id": "abc",
                    "name": "Jo",
                    "phone": "12345678",
                    "color": "PURPLE",
                    "born": "1850-05-05",
                    "palette": [],
                }),
                now(),
            )
            .unwrap_err();

        let kinds: Vec<_> = failure.violations().iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::Forbidden,
                ViolationKind::Required,
                ViolationKind::MinLength,
                ViolationKind::Pattern,
                ViolationKind::Enum,
                ViolationKind::DateMin,
                ViolationKind::ArrayMin,
            ]
        );
    }

    #[test]
    fn test_one_field_reports_all_failed_rules() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(&json!({ "email": "no-at-sign", "name": "Jane" }), now())
            .unwrap_err();

        let kinds: Vec<_> = failure.violations().iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::Email, ViolationKind::MinLength]);
    }

    #[test]
    fn test_text_rules_run_in_declared_order() {
        let schema = Schema::builder("ordered")
            .field(TextField::new("code").min_len(5).pattern(r"^[0-9]+$", "digits"))
            .field(TextField::new("tag").pattern(r"^[0-9]+$", "digits").min_len(5))
            .build()
            .unwrap();

        let failure = schema
            .validate_at(&json!({ "code": "ab", "tag": "ab" }), now())
            .unwrap_err();
        let kinds: Vec<_> = failure.violations().iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::MinLength,
                ViolationKind::Pattern,
                ViolationKind::Pattern,
                ViolationKind::MinLength,
            ]
        );
    }

    #[test]
    fn test_redeclared_rule_replaces_earlier_one() {
        let schema = Schema::builder("redeclared")
            .field(TextField::new("code").min_len(10).max_len(20).min_len(2))
            .build()
            .unwrap();

        assert!(schema.validate_at(&json!({ "code": "abc" }), now()).is_ok());
    }

    #[test]
    fn test_length_checked_before_lowercasing() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(&json!({ "email": "A@B.COM", "name": "Jane" }), now())
            .unwrap_err();

        assert_eq!(failure.len(), 1);
        assert_eq!(
            failure.violations()[0].message,
            "\"email\" length must be at least 15 characters long"
        );
    }

    #[test]
    fn test_email_tld_restriction() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(&json!({ "email": "someone@example.org", "name": "Jane" }), now())
            .unwrap_err();
        assert!(failure.has_violation("email", ViolationKind::Email));

        assert!(schema
            .validate_at(&json!({ "email": "someone@example.com.br", "name": "Jane" }), now())
            .is_ok());
    }

    #[test]
    fn test_wrong_type_reports_only_type() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(&json!({ "email": 42, "name": "Jane", "palette": "RED" }), now())
            .unwrap_err();

        assert_eq!(failure.len(), 2);
        assert_eq!(failure.violations()[0].message, "\"email\" must be a string");
        assert_eq!(failure.violations()[1].message, "\"palette\" must be an array");
    }

    #[test]
    fn test_null_is_a_type_violation() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(
                &json!({
                    "email": null,
                    "name": "Jane",
                    "color": null,
                    "born": null,
                    "palette": null,
                }),
                now(),
            )
            .unwrap_err();

        assert_eq!(
            failure.aggregated_message(),
            "***email*** must be a string && ***color*** must be a string && \
             ***born*** must be a valid date && ***palette*** must be an array"
        );
        assert!(!failure.has_violation("email", ViolationKind::Required));
    }

    #[test]
    fn test_empty_strings() {
        let schema = sample_schema();
        let record = schema
            .validate_at(
                &json!({ "email": "someone@example.com", "name": "Jane", "color": "" }),
                now(),
            )
            .unwrap();
        assert_eq!(record.get("color"), Some(&FieldValue::Text(String::new())));

        let failure = schema
            .validate_at(&json!({ "email": "someone@example.com", "name": "   " }), now())
            .unwrap_err();
        assert_eq!(
            failure.violations()[0].message,
            "\"name\" is not allowed to be empty"
        );
    }

    #[test]
    fn test_list_items_duplicates_and_bounds() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(
                &json!({
                    "email": "someone@example.com",
                    "name": "Jane",
                    "palette": ["RED", "RED", "PINK"],
                }),
                now(),
            )
            .unwrap_err();

        let paths: Vec<_> = failure.violations().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["palette", "palette[1]", "palette[2]"]);
        assert!(failure.has_violation("palette", ViolationKind::ArrayMax));
        assert!(failure.has_violation("palette[1]", ViolationKind::Duplicate));
        assert!(failure.has_violation("palette[2]", ViolationKind::Enum));
    }

    #[test]
    fn test_date_bounds_and_formats() {
        let schema = sample_schema();
        let base = json!({ "email": "someone@example.com", "name": "Jane" });

        for born in [json!("1990-05-17"), json!("1990-05-17T10:00:00Z"), json!(643_000_000_000i64)] {
            let mut payload = base.clone();
            payload["born"] = born;
            assert!(schema.validate_at(&payload, now()).is_ok());
        }

        let mut offset = base.clone();
        offset["born"] = json!("1990-05-17T23:00:00-05:00");
        let record = schema.validate_at(&offset, now()).unwrap();
        assert_eq!(
            record.get("born").map(FieldValue::to_json),
            Some(json!("1990-05-17T23:00:00.000-05:00"))
        );

        let mut future = base.clone();
        future["born"] = json!("2030-01-01");
        let failure = schema.validate_at(&future, now()).unwrap_err();
        assert_eq!(failure.violations()[0].message, "\"born\" must be less than \"now\"");

        let mut garbage = base.clone();
        garbage["born"] = json!("yesterday");
        let failure = schema.validate_at(&garbage, now()).unwrap_err();
        assert!(failure.has_violation("born", ViolationKind::Type));

        let mut floor = base;
        floor["born"] = json!("1900-01-01");
        let failure = schema.validate_at(&floor, now()).unwrap_err();
        assert_eq!(
            failure.violations()[0].message,
            "\"born\" must be greater than \"1900-01-01T00:00:00.000Z\""
        );
    }

    #[test]
    fn test_date_input_forms() {
        let may_17 = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        let cases = [
            json!("1990-05-17"),
            json!("05/17/1990"),
            json!("1990/05/17"),
            json!("May 17, 1990"),
            json!("17 May 1990"),
            json!("Thu, 17 May 1990 10:00:00 +0000"),
            json!("1990-05-17T10:00:00"),
            json!("1990-05-17 10:00:00.250"),
            json!("642960000000"),
            json!(642_960_000_000.75),
        ];

        for value in cases {
            let date = parse_date(&value).unwrap_or_else(|| panic!("{} should parse", value));
            assert_eq!(date.date_naive(), may_17, "{}", value);
        }

        let offset = parse_date(&json!("1990-05-17T23:00:00-05:00")).unwrap();
        assert_eq!(offset.date_naive(), may_17);
        assert_eq!(offset.offset().local_minus_utc(), -5 * 3600);

        assert_eq!(
            parse_date(&json!("-1.5")).map(|d| d.timestamp_millis()),
            Some(-1)
        );
        for garbage in [json!("yesterday"), json!("1e12"), json!(""), json!(true), json!(1e300)] {
            assert!(parse_date(&garbage).is_none(), "{}", garbage);
        }
    }

    #[test]
    fn test_unknown_keys_reported_after_declared_fields() {
        let schema = sample_schema();
        let failure = schema
            .validate_at(&json!({ "nickname": "JJ", "name": "Jane" }), now())
            .unwrap_err();

        assert_eq!(failure.len(), 2);
        assert!(failure.violations()[0].kind == ViolationKind::Required);
        assert!(failure.has_violation("nickname", ViolationKind::Unknown));
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let schema = sample_schema();
        for payload in [json!([1, 2]), json!("text"), json!(null), json!(3)] {
            let failure = schema.validate_at(&payload, now()).unwrap_err();
            assert_eq!(failure.len(), 1);
            assert!(failure.has_violation("value", ViolationKind::Malformed));
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let schema = sample_schema();
        let payload = json!({ "id": 1, "email": "x", "palette": ["A", "A"], "extra": true });

        let first = schema.validate_at(&payload, now()).unwrap_err();
        let second = schema.validate_at(&payload, now()).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.aggregated_message(), second.aggregated_message());
    }

    #[test]
    fn test_build_rejects_undefined_domain() {
        let err = Schema::builder("broken")
            .field(TextField::new("color").one_of("colours"))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            SchemaError::UndefinedDomain {
                entity: "broken",
                field: "color",
                domain: "colours",
            }
        );
    }

    #[test]
    fn test_build_rejects_bad_declarations() {
        let duplicate = Schema::builder("broken")
            .forbid("id")
            .field(TextField::new("id"))
            .build();
        assert!(matches!(duplicate, Err(SchemaError::DuplicateField { field: "id", .. })));

        let pattern = Schema::builder("broken")
            .field(TextField::new("code").pattern("([a-z", "code"))
            .build();
        assert!(matches!(pattern, Err(SchemaError::InvalidPattern { field: "code", .. })));

        let bounds = Schema::builder("broken")
            .field(ListField::new("tags", TextField::item()).min_items(3).max_items(1))
            .build();
        assert!(matches!(
            bounds,
            Err(SchemaError::InvertedBounds { min: 3, max: 1, .. })
        ));

        let domains = Schema::builder("broken").domain(COLORS).domain(COLORS).build();
        assert!(matches!(domains, Err(SchemaError::DuplicateDomain { .. })));
    }
}
