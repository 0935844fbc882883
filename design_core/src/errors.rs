//! # Error Types
//!
//! Structured error types for design_core. These errors are designed to be
//! informative for both humans and API consumers, providing enough context to
//! understand and fix a rejected request programmatically.
//!
//! Only two families of failure exist:
//!
//! - **Client errors**: the request never reached computation
//!   ([`CalcError::Validation`], [`CalcError::UnknownElement`], ...)
//! - **Computation errors**: a derived quantity became NaN/∞ or a formula
//!   left its domain ([`CalcError::NonFinite`], [`CalcError::CalculationFailed`])
//!
//! An inadequate design is *not* an error; it is a normal result with
//! `isAdequate = false` and warnings.
//!
//! ## Example
//!
//! ```rust
//! use design_core::errors::{CalcError, CalcResult};
//!
//! fn check_width(width_mm: f64) -> CalcResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "columnWidth",
//!             width_mm.to_string(),
//!             "must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_width(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for design_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by API clients.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// One or more fields failed validation; every violation is listed
    #[error("{}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    /// The requested element type has no design module
    #[error("Unknown element type: {element}")]
    UnknownElement { element: String },

    /// A derived quantity evaluated to NaN or infinity
    #[error("Computation produced a non-finite value for '{quantity}'")]
    NonFinite { quantity: String },

    /// A formula was evaluated outside its domain
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Aggregate per-field errors into a single Validation error
    pub fn validation(errors: Vec<String>) -> Self {
        CalcError::Validation { errors }
    }

    /// Create an UnknownElement error
    pub fn unknown_element(element: impl Into<String>) -> Self {
        CalcError::UnknownElement {
            element: element.into(),
        }
    }

    /// Create a NonFinite error
    pub fn non_finite(quantity: impl Into<String>) -> Self {
        CalcError::NonFinite {
            quantity: quantity.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// True when the request itself was at fault (maps to HTTP 4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::Validation { .. }
                | CalcError::UnknownElement { .. }
        )
    }

    /// Individual violation messages. A single-field error yields one entry.
    pub fn messages(&self) -> Vec<String> {
        match self {
            CalcError::Validation { errors } => errors.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::Validation { .. } => "VALIDATION_ERROR",
            CalcError::UnknownElement { .. } => "UNKNOWN_ELEMENT",
            CalcError::NonFinite { .. } => "NON_FINITE",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("columnWidth", "-5", "must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::non_finite("grossArea").error_code(), "NON_FINITE");
        assert_eq!(CalcError::validation(vec![]).error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_validation_message_lists_every_violation() {
        let err = CalcError::validation(vec![
            CalcError::missing_field("axialLoad").to_string(),
            CalcError::invalid_input("columnWidth", "90", "must be between 150 and 2000").to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("axialLoad"));
        assert!(text.contains("columnWidth"));
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_client_vs_computation_errors() {
        assert!(CalcError::validation(vec!["x".into()]).is_client_error());
        assert!(CalcError::unknown_element("truss").is_client_error());
        assert!(!CalcError::non_finite("Ka").is_client_error());
        assert!(!CalcError::calculation_failed("Column", "negative root").is_client_error());
    }
}
