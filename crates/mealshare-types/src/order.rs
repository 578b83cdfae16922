//! Order types for the mealshare system.
//!
//! An order is a purchase request embedded inside its parent meal document.
//! This module defines the persisted order shape and the untrusted-input
//! draft that callers submit for creation and update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

/// A purchase order embedded within a meal's order collection.
///
/// Orders are identified by a store-assigned id that is unique across all
/// meals; callers never supply one. `cancel_at` stays absent until the order
/// is cancelled and is never cleared afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Store-assigned identifier for this order.
	pub id: String,
	/// When the buyer picks the order up.
	#[serde(rename = "pickupAt")]
	pub pickup_at: DateTime<Utc>,
	/// Number of portions requested.
	pub quantity: u32,
	/// Set at cancellation time; cancellation is terminal.
	#[serde(rename = "cancelAt", default, skip_serializing_if = "Option::is_none")]
	pub cancel_at: Option<DateTime<Utc>>,
}

impl Order {
	/// Creates a new order with a fresh store-assigned id and no cancellation.
	pub fn new(pickup_at: DateTime<Utc>, quantity: u32) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			pickup_at,
			quantity,
			cancel_at: None,
		}
	}
}

/// The recognized fields of a caller-supplied order payload.
///
/// Drafts are extracted from otherwise-untrusted input: unknown fields are
/// dropped and never reach the store. Values stay unvalidated here; the
/// store runs [`OrderDraft::validate`] as part of its atomic write so that
/// an invalid draft fails the write entirely.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
	/// Requested pickup time as an RFC 3339 date-time string.
	pub pickup_at: Option<String>,
	/// Requested portion count.
	pub quantity: Option<i64>,
}

impl OrderDraft {
	/// Extracts the recognized order fields from an arbitrary JSON payload.
	///
	/// Anything other than `pickupAt` and `quantity` is ignored. A field of
	/// the wrong JSON type is treated as missing and left for validation to
	/// reject.
	pub fn from_payload(payload: &serde_json::Value) -> Self {
		Self {
			pickup_at: payload
				.get("pickupAt")
				.and_then(serde_json::Value::as_str)
				.map(str::to_string),
			quantity: payload.get("quantity").and_then(serde_json::Value::as_i64),
		}
	}

	/// Validates the draft and resolves it into typed field values.
	///
	/// Both fields must be present; `pickupAt` must parse as RFC 3339 and
	/// `quantity` must be a positive integer.
	pub fn validate(&self) -> Result<(DateTime<Utc>, u32), ValidationError> {
		let pickup_at = self
			.pickup_at
			.as_deref()
			.ok_or_else(|| ValidationError::MissingField("pickupAt".to_string()))?;
		let pickup_at = DateTime::parse_from_rfc3339(pickup_at)
			.map_err(|e| ValidationError::InvalidValue {
				field: "pickupAt".to_string(),
				message: format!("not a valid RFC 3339 date-time: {}", e),
			})?
			.with_timezone(&Utc);

		let quantity = self
			.quantity
			.ok_or_else(|| ValidationError::MissingField("quantity".to_string()))?;
		let quantity = u32::try_from(quantity)
			.ok()
			.filter(|q| *q >= 1)
			.ok_or_else(|| ValidationError::InvalidValue {
				field: "quantity".to_string(),
				message: format!("must be a positive integer, got {}", quantity),
			})?;

		Ok((pickup_at, quantity))
	}
}
