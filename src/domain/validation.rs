use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Serialize, ser::SerializeMap};

use super::{BloodType, Config};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("valid phone pattern"));

/// Formats accepted for a local date-time without an offset.
const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The name of the offending field, e.g. `unitsNeeded`.
    pub field: &'static str,
    /// A message suitable for display next to the field.
    pub message: String,
}

/// The outcome of validating a form.
///
/// Failures are accumulated rather than short-circuited, so every invalid
/// field is reported at once. Errors are kept in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Creates an empty (valid) result.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records a failure for `field`.
    ///
    /// A later failure for the same field replaces the earlier message.
    pub fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        if let Some(existing) = self.errors.iter_mut().find(|e| e.field == field) {
            existing.message = message;
        } else {
            self.errors.push(FieldError { field, message });
        }
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the failures in the order they were recorded.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Returns the names of the failed fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Errors<'a>(&'a [FieldError]);

        impl Serialize for Errors<'_> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for error in self.0 {
                    map.serialize_entry(error.field, &error.message)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("isValid", &self.is_valid())?;
        map.serialize_entry("errors", &Errors(&self.errors))?;
        map.end()
    }
}

/// Returns `true` iff `value` is exactly one of the eight blood types.
///
/// Matching is case-sensitive and no whitespace is trimmed, so `"o+"` and
/// `" O+"` are rejected.
#[must_use]
pub fn is_valid_blood_type(value: &str) -> bool {
    value.parse::<BloodType>().is_ok()
}

/// Returns `true` iff `units` is in `1..=100`.
#[must_use]
pub fn is_valid_units(units: i64) -> bool {
    units_within(units, Config::default().max_units())
}

pub(crate) fn units_within(units: i64, max_units: u32) -> bool {
    units > 0 && units <= i64::from(max_units)
}

/// Minimal structural email check: `local@domain.tld` with no whitespace and
/// exactly one `@`.
///
/// This is deliberately permissive and says nothing about deliverability.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Checks a phone number after removing spaces, hyphens and parentheses.
///
/// The remainder must be an optional `+` followed by 1 to 16 digits, the first
/// of which is not `0`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    PHONE.is_match(&stripped)
}

/// Returns `true` iff the password has at least 6 characters.
///
/// Complexity is not enforced here; see [`password_strength`] for the
/// advisory score shown to users.
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    is_valid_password_with(password, &Config::default())
}

/// Like [`is_valid_password`], with the minimum length taken from `config`.
#[must_use]
pub fn is_valid_password_with(password: &str, config: &Config) -> bool {
    password.chars().count() >= config.min_password_length()
}

/// Returns `true` iff the trimmed name has at least 2 characters.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    is_valid_name_with(name, &Config::default())
}

/// Like [`is_valid_name`], with the minimum length taken from `config`.
#[must_use]
pub fn is_valid_name_with(name: &str, config: &Config) -> bool {
    name.trim().chars().count() >= config.min_name_length()
}

/// Parses a form date value into a local date-time.
///
/// Accepts RFC 3339 (converted to local time), `YYYY-MM-DDTHH:MM[:SS]`,
/// `YYYY-MM-DD HH:MM[:SS]` and a bare `YYYY-MM-DD` (taken as local midnight).
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Local).naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Returns `true` iff `value` parses as a date that is not before the start of
/// the day containing `now`.
///
/// Only `now` is truncated to midnight; the candidate keeps its time of day.
/// Any time today therefore passes, including times earlier than `now`.
#[must_use]
pub fn is_valid_required_date(value: &str, now: NaiveDateTime) -> bool {
    parse_date(value).is_some_and(|candidate| !is_before_today(candidate, now))
}

pub(crate) fn is_before_today(candidate: NaiveDateTime, now: NaiveDateTime) -> bool {
    candidate < now.date().and_time(NaiveTime::MIN)
}

/// Removes every `<` and `>` and trims surrounding whitespace.
///
/// This is cosmetic normalisation only. It is not an HTML sanitiser and does
/// not neutralise script injection; output encoding belongs at the rendering
/// and API boundaries.
///
/// ```
/// assert_eq!(bloodlink::domain::sanitize_input("<b>hi</b>"), "bhi/b");
/// ```
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Applies [`sanitize_input`] to string values and passes every other value
/// through unchanged.
#[must_use]
pub fn sanitize_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(sanitize_input(&s)),
        other => other,
    }
}

/// Advisory password strength shown alongside password fields.
///
/// This never gates submission; only [`is_valid_password`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    /// Too short or a single character class.
    Weak,
    /// Acceptable length with two character classes.
    Fair,
    /// Three character classes.
    Good,
    /// Long, with all four character classes.
    Strong,
}

impl PasswordStrength {
    /// Returns the lowercase textual form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Strong => "strong",
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores a password from its length and the character classes it uses
/// (lowercase, uppercase, digits, symbols).
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let classes = [
        password.chars().any(char::is_lowercase),
        password.chars().any(char::is_uppercase),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ]
    .into_iter()
    .filter(|&present| present)
    .count();

    if !is_valid_password(password) || classes <= 1 {
        PasswordStrength::Weak
    } else if classes == 4 && length >= 10 {
        PasswordStrength::Strong
    } else if classes >= 3 {
        PasswordStrength::Good
    } else {
        PasswordStrength::Fair
    }
}
