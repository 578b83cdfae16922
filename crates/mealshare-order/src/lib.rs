//! Order orchestration module for the mealshare system.
//!
//! This module is the layer the request-handling code talks to. It shapes
//! caller intent into store calls: each operation extracts only the
//! recognized order fields from an otherwise-untrusted payload, delegates to
//! the store adapter, and passes the meal-or-absent result through
//! unchanged. Validation failures raised by the store's atomic write
//! propagate verbatim; the service never pre-validates, recovers, or
//! retries.

use mealshare_store::{MealStore, StoreError};
use mealshare_types::{Meal, OrderDraft};
use std::sync::Arc;

/// Stateless service mediating between callers and the meal store.
///
/// Each call is independent; there is no cross-operation coordination and
/// no in-process state beyond the shared store handle.
pub struct OrderService {
	/// Shared handle to the meal store.
	store: Arc<MealStore>,
}

impl OrderService {
	/// Creates a new OrderService over the given store.
	pub fn new(store: Arc<MealStore>) -> Self {
		Self { store }
	}

	/// Creates an order against the identified meal from a caller-supplied
	/// payload. Unknown payload fields are dropped before the store sees
	/// them. Returns the updated meal with its full order collection, or
	/// absence if the meal does not exist.
	pub async fn create_order(
		&self,
		meal_id: &str,
		payload: &serde_json::Value,
	) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(meal_id, "create order requested");
		let draft = OrderDraft::from_payload(payload);
		self.store.append_order(meal_id, &draft).await
	}

	/// Returns the meal owning the identified order, projected to that one
	/// order, or absence if no meal contains it.
	pub async fn order_by_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(order_id, "order lookup requested");
		self.store.find_by_order_id(order_id).await
	}

	/// Returns the identified meal with all of its orders, or absence if
	/// the meal does not exist. A meal without orders comes back with an
	/// empty collection.
	pub async fn orders_for_meal(&self, meal_id: &str) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(meal_id, "order listing requested");
		self.store.find_orders_by_meal_id(meal_id).await
	}

	/// Rewrites the identified order's pickup time and quantity from a
	/// caller-supplied payload, ignoring unknown fields. Returns the meal
	/// projected to the updated order, or absence.
	pub async fn update_order(
		&self,
		order_id: &str,
		payload: &serde_json::Value,
	) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(order_id, "order update requested");
		let draft = OrderDraft::from_payload(payload);
		self.store.update_by_order_id(order_id, &draft).await
	}

	/// Cancels the identified order. Returns the meal projected to the
	/// cancelled order, or absence.
	pub async fn cancel_order(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(order_id, "order cancellation requested");
		self.store.cancel_by_order_id(order_id).await
	}
}
