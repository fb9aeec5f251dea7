use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{
    Config, ValidationResult,
    validation::{
        is_valid_blood_type, is_valid_email, is_valid_name_with, is_valid_password_with,
        is_valid_phone,
    },
};

/// The kind of account being registered.
///
/// Anything other than the four known roles parses as [`Role::Unknown`],
/// which only receives the common checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// An individual donor.
    Donor,
    /// A hospital that raises blood requests.
    Hospital,
    /// A blood bank that holds inventory.
    BloodBank,
    /// A platform administrator.
    Admin,
    /// Any unrecognised role.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Returns the lowercase textual form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Hospital => "hospital",
            Self::BloodBank => "bloodbank",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "donor" => Self::Donor,
            "hospital" => Self::Hospital,
            "bloodbank" => Self::BloodBank,
            "admin" => Self::Admin,
            _ => Self::Unknown,
        })
    }
}

/// Hospital-specific registration fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HospitalDetails {
    /// The hospital's official registration number.
    pub registration_number: String,
}

/// Blood-bank-specific registration fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BloodBankDetails {
    /// The blood bank's licence or registration identifier.
    pub registration_id: String,
}

/// The raw state of a registration or profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationData {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Password. Absent when editing an existing profile.
    pub password: Option<String>,
    /// Repeated password.
    pub confirm_password: Option<String>,
    /// Donor blood group.
    pub blood_group: Option<String>,
    /// Present for hospital accounts.
    pub hospital_details: Option<HospitalDetails>,
    /// Present for blood bank accounts.
    pub blood_bank_details: Option<BloodBankDetails>,
}

/// Validates registration data for the given role, accumulating every
/// failing field.
///
/// Password checks only run when a password is supplied.
#[must_use]
pub fn validate_registration(data: &RegistrationData, role: Role) -> ValidationResult {
    validate_registration_with(data, role, &Config::default())
}

/// Like [`validate_registration`], with limits taken from `config`.
#[must_use]
#[instrument(level = "debug", skip(data, config))]
pub fn validate_registration_with(
    data: &RegistrationData,
    role: Role,
    config: &Config,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !is_valid_name_with(&data.name, config) {
        result.add_error(
            "name",
            format!(
                "Name must be at least {} characters",
                config.min_name_length()
            ),
        );
    }

    if !is_valid_email(&data.email) {
        result.add_error("email", "Please enter a valid email address");
    }

    if !is_valid_phone(&data.phone) {
        result.add_error("phone", "Please enter a valid phone number");
    }

    if let Some(password) = &data.password {
        if !is_valid_password_with(password, config) {
            result.add_error(
                "password",
                format!(
                    "Password must be at least {} characters",
                    config.min_password_length()
                ),
            );
        }
        if data.confirm_password.as_ref() != Some(password) {
            result.add_error("confirmPassword", "Passwords do not match");
        }
    }

    match role {
        Role::Donor => {
            if !data.blood_group.as_deref().is_some_and(is_valid_blood_type) {
                result.add_error("bloodGroup", "Please select a valid blood group");
            }
        }
        Role::Hospital => {
            let missing = data
                .hospital_details
                .as_ref()
                .is_none_or(|d| d.registration_number.trim().is_empty());
            if missing {
                result.add_error(
                    "hospitalDetails.registrationNumber",
                    "Registration number is required",
                );
            }
        }
        Role::BloodBank => {
            let missing = data
                .blood_bank_details
                .as_ref()
                .is_none_or(|d| d.registration_id.trim().is_empty());
            if missing {
                result.add_error(
                    "bloodBankDetails.registrationId",
                    "Registration ID is required",
                );
            }
        }
        Role::Admin | Role::Unknown => {}
    }

    if !result.is_valid() {
        tracing::debug!(
            "Registration for role {role} has {} invalid field(s)",
            result.errors().len()
        );
    }

    result
}
