//! Meal aggregate types for the mealshare system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Order;

/// A sellable meal offering that owns an embedded collection of orders.
///
/// Meals are created outside the order lifecycle; the order subsystem only
/// ever appends to or rewrites single elements of the `orders` collection,
/// which keeps insertion order and is never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
	/// Store-assigned identifier for this meal.
	pub id: String,
	/// Display name of the offering.
	pub name: String,
	/// Orders placed against this meal, in insertion order.
	#[serde(default)]
	pub orders: Vec<Order>,
}

impl Meal {
	/// Creates an empty meal with a fresh store-assigned id.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			name: name.into(),
			orders: Vec::new(),
		}
	}

	/// Returns a copy of this meal with `orders` narrowed to the given
	/// entries. Used by store operations that project a single matching
	/// order back out of the document.
	pub fn with_orders(&self, orders: Vec<Order>) -> Self {
		Self {
			id: self.id.clone(),
			name: self.name.clone(),
			orders,
		}
	}
}
