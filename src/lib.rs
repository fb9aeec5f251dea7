//! Blood Donation Coordination Core
//!
//! Blood-type compatibility, form validation and the confirm/notify
//! interaction pattern shared by every page of the donation application.

pub mod domain;
pub use domain::{
    BloodRequest, BloodType, Config, RegistrationData, RequestDraft, RequestField, Role,
    UnknownBloodTypeError, Urgency, ValidationResult,
};

/// Decoding of failure bodies returned by the remote API.
pub mod api;
pub use api::ApiFailure;

/// The reusable confirmation/notification surface.
pub mod notification;
pub use notification::{Controller, Notification, NotificationKind, Notifier};
