use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::{Local, NaiveDateTime};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use super::{
    BloodType, Config, ValidationResult,
    validation::{is_before_today, parse_date, sanitize_input, units_within},
};

const BLOOD_GROUP: &str = "bloodGroup";
const UNITS_NEEDED: &str = "unitsNeeded";
const REQUIRED_DATE: &str = "requiredDate";
const PATIENT_NAME: &str = "patientName";
const PATIENT_AGE: &str = "patientAge";
const CONTACT_PERSON: &str = "contactPerson";
const CONTACT_PHONE: &str = "contactPhone";

/// How urgently a request needs to be fulfilled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Routine replenishment.
    Low,
    /// The usual level for a new request.
    #[default]
    Medium,
    /// Needed soon.
    High,
    /// Needed immediately.
    Critical,
}

impl Urgency {
    /// Returns the lowercase textual form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not an urgency level.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid urgency '{0}': expected one of low, medium, high, critical")]
pub struct InvalidUrgencyError(String);

impl FromStr for Urgency {
    type Err = InvalidUrgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(InvalidUrgencyError(s.to_string())),
        }
    }
}

/// The unsaved state of a blood request form.
///
/// Text fields hold exactly what the user typed; nothing is parsed until the
/// draft is validated. A draft lives for one visit to a form and is dropped on
/// submit or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDraft {
    /// The requested blood type, e.g. `"A+"`.
    pub blood_group: String,
    /// Number of units, as typed.
    #[serde(deserialize_with = "number_or_text")]
    pub units_needed: String,
    /// Urgency level.
    pub urgency: Urgency,
    /// The date by which the blood is needed, as typed.
    pub required_date: String,
    /// The patient's name.
    pub patient_name: String,
    /// The patient's age in years, as typed.
    #[serde(deserialize_with = "number_or_text")]
    pub patient_age: String,
    /// Who to contact about the request.
    pub contact_person: String,
    /// The contact's phone number.
    pub contact_phone: String,
    /// Free-text notes.
    pub description: Option<String>,
}

/// Reads a numeric form field written either as text or as a number literal.
///
/// Numbers are kept in their textual form so that validation, not
/// deserialization, decides whether they are acceptable.
fn number_or_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// A single field update applied to a [`RequestDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestField {
    /// Set the blood group.
    BloodGroup(String),
    /// Set the number of units.
    UnitsNeeded(String),
    /// Set the urgency.
    Urgency(Urgency),
    /// Set the required date.
    RequiredDate(String),
    /// Set the patient's name.
    PatientName(String),
    /// Set the patient's age.
    PatientAge(String),
    /// Set the contact person.
    ContactPerson(String),
    /// Set the contact phone.
    ContactPhone(String),
    /// Set or clear the description.
    Description(Option<String>),
}

impl RequestField {
    /// The form name of the field this update targets, e.g. `unitsNeeded`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BloodGroup(_) => BLOOD_GROUP,
            Self::UnitsNeeded(_) => UNITS_NEEDED,
            Self::Urgency(_) => "urgency",
            Self::RequiredDate(_) => REQUIRED_DATE,
            Self::PatientName(_) => PATIENT_NAME,
            Self::PatientAge(_) => PATIENT_AGE,
            Self::ContactPerson(_) => CONTACT_PERSON,
            Self::ContactPhone(_) => CONTACT_PHONE,
            Self::Description(_) => "description",
        }
    }
}

impl RequestDraft {
    /// Returns the draft with one field replaced.
    #[must_use]
    pub fn apply_field(mut self, field: RequestField) -> Self {
        tracing::trace!("Updating draft field {}", field.name());
        match field {
            RequestField::BloodGroup(value) => self.blood_group = value,
            RequestField::UnitsNeeded(value) => self.units_needed = value,
            RequestField::Urgency(value) => self.urgency = value,
            RequestField::RequiredDate(value) => self.required_date = value,
            RequestField::PatientName(value) => self.patient_name = value,
            RequestField::PatientAge(value) => self.patient_age = value,
            RequestField::ContactPerson(value) => self.contact_person = value,
            RequestField::ContactPhone(value) => self.contact_phone = value,
            RequestField::Description(value) => self.description = value,
        }
        self
    }

    /// Validates the draft and converts it into a [`BloodRequest`].
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationResult`] if any field is invalid. In addition to
    /// the form checks, a blood group that is present but not one of the eight
    /// blood types is reported under `bloodGroup`.
    pub fn into_request(self, now: NaiveDateTime) -> Result<BloodRequest, ValidationResult> {
        self.into_request_with(now, &Config::default())
    }

    /// Like [`RequestDraft::into_request`], with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationResult`] if any field is invalid.
    pub fn into_request_with(
        self,
        now: NaiveDateTime,
        config: &Config,
    ) -> Result<BloodRequest, ValidationResult> {
        let mut result = validate_request_form_with(&self, now, config);

        let blood_type = self.blood_group.parse::<BloodType>();
        if result.error(BLOOD_GROUP).is_none() {
            if let Err(e) = &blood_type {
                result.add_error(BLOOD_GROUP, e.to_string());
            }
        }

        let patient_name = NonEmptyString::new(sanitize_input(&self.patient_name));
        if result.error(PATIENT_NAME).is_none() && patient_name.is_err() {
            result.add_error(PATIENT_NAME, "Patient name is required");
        }
        let contact_person = NonEmptyString::new(sanitize_input(&self.contact_person));
        if result.error(CONTACT_PERSON).is_none() && contact_person.is_err() {
            result.add_error(CONTACT_PERSON, "Contact person is required");
        }

        let (
            Ok(blood_type),
            Some(units),
            Some(required_date),
            Ok(patient_name),
            Some(patient_age),
            Ok(contact_person),
            Ok(contact_phone),
        ) = (
            blood_type,
            parse_integer(&self.units_needed)
                .and_then(|n| u32::try_from(n).ok())
                .and_then(NonZeroU32::new),
            parse_date(&self.required_date),
            patient_name,
            parse_integer(&self.patient_age).and_then(|n| u32::try_from(n).ok()),
            contact_person,
            NonEmptyString::new(self.contact_phone.trim().to_string()),
        )
        else {
            return Err(result);
        };

        if !result.is_valid() {
            return Err(result);
        }

        let description = self
            .description
            .as_deref()
            .map(sanitize_input)
            .filter(|d| !d.is_empty());

        Ok(BloodRequest {
            blood_type,
            units,
            urgency: self.urgency,
            required_date,
            patient_name,
            patient_age,
            contact_person,
            contact_phone,
            description,
        })
    }
}

/// A blood request whose fields have all been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodRequest {
    /// The requested blood type.
    pub blood_type: BloodType,
    /// Number of units requested.
    pub units: NonZeroU32,
    /// Urgency level.
    pub urgency: Urgency,
    /// The date by which the blood is needed.
    pub required_date: NaiveDateTime,
    /// The patient's name, with angle brackets removed.
    pub patient_name: NonEmptyString,
    /// The patient's age in years.
    pub patient_age: u32,
    /// Who to contact about the request.
    pub contact_person: NonEmptyString,
    /// The contact's phone number.
    pub contact_phone: NonEmptyString,
    /// Free-text notes, if any.
    pub description: Option<String>,
}

impl BloodRequest {
    /// The donor blood types that can fulfil this request.
    #[must_use]
    pub fn eligible_donors(&self) -> std::collections::BTreeSet<BloodType> {
        self.blood_type.donors()
    }
}

fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Validates a request draft against the current local time.
///
/// See [`validate_request_form_at`].
#[must_use]
pub fn validate_request_form(draft: &RequestDraft) -> ValidationResult {
    validate_request_form_at(draft, Local::now().naive_local())
}

/// Validates a request draft, accumulating every failing field.
///
/// Checks run in this order: blood group present, units in `1..=100`,
/// required date present and not before today, patient name present, patient
/// age in `1..=120`, contact person present, contact phone present.
#[must_use]
pub fn validate_request_form_at(draft: &RequestDraft, now: NaiveDateTime) -> ValidationResult {
    validate_request_form_with(draft, now, &Config::default())
}

/// Like [`validate_request_form_at`], with limits taken from `config`.
///
/// Units and age must be whole numbers once trimmed. A value with trailing
/// text such as `"12abc"` or a fraction such as `"2.5"` is rejected rather
/// than truncated to its leading integer.
#[must_use]
#[instrument(level = "debug", skip(draft, config))]
pub fn validate_request_form_with(
    draft: &RequestDraft,
    now: NaiveDateTime,
    config: &Config,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if draft.blood_group.trim().is_empty() {
        result.add_error(BLOOD_GROUP, "Blood group is required");
    }

    if !parse_integer(&draft.units_needed).is_some_and(|n| units_within(n, config.max_units())) {
        result.add_error(
            UNITS_NEEDED,
            format!("Units needed must be between 1 and {}", config.max_units()),
        );
    }

    if draft.required_date.trim().is_empty() {
        result.add_error(REQUIRED_DATE, "Required date is required");
    } else {
        match parse_date(&draft.required_date) {
            Some(date) if is_before_today(date, now) => {
                result.add_error(REQUIRED_DATE, "Required date cannot be in the past");
            }
            Some(_) => {}
            None => result.add_error(REQUIRED_DATE, "Required date is not a valid date"),
        }
    }

    if draft.patient_name.trim().is_empty() {
        result.add_error(PATIENT_NAME, "Patient name is required");
    }

    let ages = config.patient_age_range();
    let age_ok = parse_integer(&draft.patient_age)
        .and_then(|n| u32::try_from(n).ok())
        .is_some_and(|n| ages.contains(&n));
    if !age_ok {
        result.add_error(
            PATIENT_AGE,
            format!(
                "Patient age must be between {} and {}",
                ages.start(),
                ages.end()
            ),
        );
    }

    if draft.contact_person.trim().is_empty() {
        result.add_error(CONTACT_PERSON, "Contact person is required");
    }

    if draft.contact_phone.trim().is_empty() {
        result.add_error(CONTACT_PHONE, "Contact phone is required");
    }

    if !result.is_valid() {
        tracing::debug!(
            "Request draft has {} invalid field(s)",
            result.errors().len()
        );
    }

    result
}
