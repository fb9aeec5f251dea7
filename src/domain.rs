//! Domain models for blood donation coordination.
//!
//! This module contains the blood-type compatibility table, the field and
//! form validation rules, and configuration of the validation limits.

/// Blood types and the donor-to-recipient compatibility table.
pub mod blood_type;
pub use blood_type::{BloodType, UnknownBloodTypeError, compatible_donors, compatible_recipients};

pub mod config;
pub use config::Config;

/// Field-level predicates and the [`ValidationResult`] type.
pub mod validation;
pub use validation::{
    PasswordStrength, ValidationResult, is_valid_blood_type, is_valid_email, is_valid_name,
    is_valid_name_with, is_valid_password, is_valid_password_with, is_valid_phone,
    is_valid_required_date, is_valid_units, password_strength, sanitize_input, sanitize_value,
};

/// Blood request drafts and their validation.
pub mod request;
pub use request::{
    BloodRequest, RequestDraft, RequestField, Urgency, validate_request_form,
    validate_request_form_at,
};

/// Account registration data and its validation.
pub mod registration;
pub use registration::{RegistrationData, Role, validate_registration};
