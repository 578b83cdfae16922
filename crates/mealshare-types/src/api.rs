//! API types for the mealshare HTTP API.
//!
//! This module defines the error envelope returned by the HTTP layer and
//! the status mapping it applies: absence renders as not-found, a write-time
//! validation failure renders as bad-request, and everything else renders as
//! an internal error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for seeding a new meal container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMealRequest {
	/// Display name of the offering.
	pub name: String,
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable description of the failure.
	#[serde(rename = "errorMsg")]
	pub error_msg: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Targeted meal or order does not exist (404).
	NotFound { message: String },
	/// Supplied order fields failed write-time validation (400).
	BadRequest { message: String },
	/// Store unreachable or any other unexpected failure (500).
	InternalServerError { message: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::NotFound { .. } => 404,
			ApiError::BadRequest { .. } => 400,
			ApiError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let message = match self {
			ApiError::NotFound { message }
			| ApiError::BadRequest { message }
			| ApiError::InternalServerError { message } => message.clone(),
		};
		ErrorResponse { error_msg: message }
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::NotFound { message } => write!(f, "Not Found: {}", message),
			ApiError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			ApiError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			}
		}
	}
}

impl std::error::Error for ApiError {}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}
