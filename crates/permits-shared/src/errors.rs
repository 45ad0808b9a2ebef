use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
}

/// Raised by form checks before anything is sent to the backend
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("Please fill in all required fields")]
    IncompleteForm,
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("{0} must be a date formatted as YYYY-MM-DD")]
    InvalidDate(&'static str),
    #[error("Valid to must not be before valid from")]
    DateOrder,
    #[error("No changes to save")]
    NoChanges,
}

/// A response from the backend with a status outside of the 2xx range
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub struct ApiFailure {
    pub status: StatusCode,
    /// Message extracted from the response body if one was found
    pub backend_message: Option<String>,
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend_message {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "request failed with status code: {}", self.status),
        }
    }
}

impl ApiFailure {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            backend_message: extract_error_message(body),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

/// Extracts the message to show the user from an error response body.
///
/// Order of preference is `detail`, then the first of `non_field_errors`,
/// then `error`, then `message`. Registration errors nest these under
/// `errors`, which is checked last. Returns `None` if none of those are
/// present so the caller can fall back to a message specific to the action
/// attempted.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    message_from_value(&value)
}

fn message_from_value(value: &serde_json::Value) -> Option<String> {
    let obj = value.as_object()?;
    if let Some(detail) = obj.get("detail").and_then(non_empty_str) {
        return Some(detail);
    }
    if let Some(first) = obj
        .get("non_field_errors")
        .and_then(|x| x.as_array())
        .and_then(|x| x.first())
        .and_then(non_empty_str)
    {
        return Some(first);
    }
    obj.get("error")
        .and_then(non_empty_str)
        .or_else(|| obj.get("message").and_then(non_empty_str))
        .or_else(|| obj.get("errors").and_then(message_from_value))
}

fn non_empty_str(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(ToString::to_string)
}

/// Produces the text shown inline on a screen when a request fails.
///
/// Messages supplied by the backend are preferred, otherwise `fallback` is
/// used. Form validation errors are shown as is.
pub fn user_facing_message(err: &anyhow::Error, fallback: &str) -> String {
    if let Some(failure) = err.downcast_ref::<ApiFailure>() {
        if let Some(msg) = &failure.backend_message {
            return msg.clone();
        }
    }
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return validation.to_string();
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::detail(r#"{"detail": "Not found."}"#, Some("Not found."))]
    #[case::detail_preferred(
        r#"{"non_field_errors": ["Bad combo"], "detail": "Denied"}"#,
        Some("Denied")
    )]
    #[case::non_field_first(
        r#"{"non_field_errors": ["First", "Second"]}"#,
        Some("First")
    )]
    #[case::error_key(r#"{"error": "Invalid credentials"}"#, Some("Invalid credentials"))]
    #[case::non_field_before_error(
        r#"{"error": "x", "non_field_errors": ["y"]}"#,
        Some("y")
    )]
    #[case::message_key(r#"{"status": "error", "message": "Email taken"}"#, Some("Email taken"))]
    #[case::nested_errors(
        r#"{"errors": {"non_field_errors": ["Username exists"]}}"#,
        Some("Username exists")
    )]
    #[case::field_errors_only(r#"{"owner_cnic": ["This field is required."]}"#, None)]
    #[case::empty_detail(r#"{"detail": ""}"#, None)]
    #[case::empty_non_field_list(r#"{"non_field_errors": []}"#, None)]
    #[case::not_json("<html>Server Error</html>", None)]
    #[case::empty_body("", None)]
    #[case::array_body(r#"["x"]"#, None)]
    fn error_message_extraction(#[case] body: &str, #[case] expected: Option<&str>) {
        // Act
        let actual = extract_error_message(body);

        // Assert
        assert_eq!(actual.as_deref(), expected);
    }

    #[test]
    fn backend_message_preferred_over_fallback() {
        // Arrange
        let err: anyhow::Error =
            ApiFailure::new(StatusCode::BAD_REQUEST, r#"{"detail": "Already paid"}"#).into();

        // Act
        let actual = user_facing_message(&err, "Failed to mark as paid");

        // Assert
        assert_eq!(actual, "Already paid");
    }

    #[test]
    fn fallback_used_without_backend_message() {
        let err: anyhow::Error = ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "").into();
        assert_eq!(
            user_facing_message(&err, "Failed to load chalans"),
            "Failed to load chalans"
        );
    }

    #[test]
    fn fallback_used_for_transport_errors() {
        let err = anyhow::anyhow!("failed to send request");
        assert_eq!(
            user_facing_message(&err, "Failed to load chalans"),
            "Failed to load chalans"
        );
    }

    #[test]
    fn context_does_not_hide_backend_message() {
        let err = anyhow::Error::from(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            r#"{"non_field_errors": ["Chalan already cancelled"]}"#,
        ))
        .context("cancel request failed");
        assert_eq!(
            user_facing_message(&err, "Failed to cancel"),
            "Chalan already cancelled"
        );
    }

    #[test]
    fn unauthorized_detected() {
        let failure = ApiFailure::new(StatusCode::UNAUTHORIZED, "");
        assert!(failure.is_unauthorized());
        assert!(!failure.is_not_found());
        assert_eq!(
            failure.to_string(),
            "request failed with status code: 401 Unauthorized"
        );
    }
}
