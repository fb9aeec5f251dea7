use serde::{Deserialize, Serialize};

use crate::notification::{Notification, Notifier};

/// Message shown when a failure body carries no usable message.
pub const GENERIC_FAILURE: &str = "The request failed. Please try again.";

/// The optional body of a failed API response.
///
/// Both fields are optional; a body that is not a JSON object, or that fails
/// to parse, decodes to an empty failure rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiFailure {
    /// Human-readable explanation from the server.
    pub message: Option<String>,
    /// Machine-readable error code.
    pub code: Option<String>,
}

impl ApiFailure {
    /// Decodes a response body.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|e| {
            tracing::debug!("Unrecognised failure body: {e}");
            Self::default()
        })
    }

    /// Returns the server's message verbatim, or `fallback` if it is missing
    /// or blank.
    #[must_use]
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
    }
}

impl<E> Notification<E> {
    /// A single-button danger notification reporting a failed action.
    #[must_use]
    pub fn failure(title: impl Into<String>, failure: &ApiFailure) -> Self {
        Self::danger(title, failure.user_message(GENERIC_FAILURE))
    }
}

/// Reports the outcome of an API action through `notifier`.
///
/// A success shows a success notification carrying the returned message; a
/// failure shows the server's message, or a generic one. Returns `true` if
/// the action succeeded.
pub fn report<N: Notifier>(
    notifier: &mut N,
    title: &str,
    outcome: Result<String, ApiFailure>,
) -> bool {
    match outcome {
        Ok(message) => {
            notifier.show(Notification::success(title, message));
            true
        }
        Err(failure) => {
            tracing::warn!(
                code = failure.code.as_deref().unwrap_or("none"),
                "{title} failed"
            );
            notifier.show(Notification::failure(title, &failure));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{Controller, NotificationKind};

    #[test]
    fn decodes_message_and_code() {
        let failure = ApiFailure::from_body(r#"{"message":"Insufficient stock","code":"E_STOCK"}"#);
        assert_eq!(failure.message.as_deref(), Some("Insufficient stock"));
        assert_eq!(failure.code.as_deref(), Some("E_STOCK"));
        assert_eq!(failure.user_message(GENERIC_FAILURE), "Insufficient stock");
    }

    #[test_case(""; "empty body")]
    #[test_case("<html>502</html>"; "html")]
    #[test_case("[1,2]"; "array")]
    #[test_case(r#"{"message":42}"#; "wrong field type")]
    #[test_case(r#"{"message":"   "}"#; "blank message")]
    #[test_case(r#"{"error":"x"}"#; "other fields only")]
    fn malformed_bodies_degrade_to_generic_message(body: &str) {
        let failure = ApiFailure::from_body(body);
        assert_eq!(failure.user_message(GENERIC_FAILURE), GENERIC_FAILURE);
    }

    #[test]
    fn report_shows_server_message_verbatim() {
        let mut controller: Controller = Controller::new();
        let failure =
            ApiFailure::from_body(r#"{"message":"Donor is not eligible until 2026-12-01"}"#);

        assert!(!report(&mut controller, "Respond to request", Err(failure)));

        let shown = controller.current().unwrap();
        assert_eq!(shown.kind(), NotificationKind::Danger);
        assert_eq!(shown.title(), "Respond to request");
        assert_eq!(shown.message(), "Donor is not eligible until 2026-12-01");
    }

    #[test]
    fn report_success() {
        let mut controller: Controller = Controller::new();

        assert!(report(
            &mut controller,
            "Create request",
            Ok("Request created".to_string())
        ));

        let shown = controller.current().unwrap();
        assert_eq!(shown.kind(), NotificationKind::Success);
        assert_eq!(shown.message(), "Request created");
    }
}
