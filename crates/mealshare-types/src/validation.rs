//! Field validation types for the mealshare system.
//!
//! Order field constraints are enforced by the store as part of each atomic
//! write rather than pre-checked by callers, so a failed validation leaves
//! the targeted document untouched.

use thiserror::Error;

/// Errors that can occur when validating order fields at write time.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
}
