//! Store module for the mealshare system.
//!
//! This module owns all atomic operations against the meal document store:
//! appending an order into a meal's order collection, locating a meal by an
//! embedded order's identifier, projecting the matching order back out,
//! rewriting the fields of one embedded order, and marking one embedded
//! order cancelled. Backends implement each operation as a single critical
//! section over the affected document, so concurrent mutations of different
//! orders within the same meal never lose updates.

use async_trait::async_trait;
use mealshare_types::{ApiError, ImplementationRegistry, Meal, OrderDraft, ValidationError};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during store operations.
///
/// Absence of the targeted meal or order is not an error: operations signal
/// it uniformly as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Error that occurs when supplied order fields fail write-time validation.
	#[error("Validation failed: {0}")]
	Validation(#[from] ValidationError),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

impl From<StoreError> for ApiError {
	fn from(err: StoreError) -> Self {
		match err {
			StoreError::Validation(e) => ApiError::BadRequest {
				message: e.to_string(),
			},
			other => ApiError::InternalServerError {
				message: other.to_string(),
			},
		}
	}
}

/// Trait defining the low-level interface for meal store backends.
///
/// Every operation that touches an embedded order matches it by its
/// store-assigned identifier, never by array position, and applies the whole
/// mutation atomically. `Ok(None)` uniformly means the targeted meal or
/// order does not exist; validation failures are reported as errors and
/// leave the document untouched.
#[async_trait]
pub trait MealStoreInterface: Send + Sync {
	/// Creates an empty meal container with a store-assigned id.
	async fn insert_meal(&self, name: &str) -> Result<Meal, StoreError>;

	/// Appends a new order to the identified meal, validating the draft as
	/// part of the same write. Returns the updated meal with its full order
	/// collection, including the new entry.
	async fn append_order(
		&self,
		meal_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError>;

	/// Locates the meal containing the identified order and returns it with
	/// `orders` projected to exactly that one entry.
	async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError>;

	/// Returns the identified meal with its full order collection. A meal
	/// with zero orders is returned as such, distinct from absence.
	async fn find_orders_by_meal_id(&self, meal_id: &str) -> Result<Option<Meal>, StoreError>;

	/// Rewrites `pickupAt` and `quantity` on exactly the identified order,
	/// re-validating the draft in the same write and leaving sibling orders
	/// untouched. Returns the meal projected to the updated entry.
	async fn update_by_order_id(
		&self,
		order_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError>;

	/// Sets `cancelAt` on exactly the identified order. The first
	/// cancellation timestamp wins; cancelling again succeeds without
	/// changing it. Returns the meal projected to the cancelled entry.
	async fn cancel_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError>;
}

/// Type alias for store factory functions.
///
/// This is the function signature that all store implementations must
/// provide to create instances of their store interface.
pub type StoreFactory = fn(&toml::Value) -> Result<Box<dyn MealStoreInterface>, StoreError>;

/// Registry trait for store implementations.
pub trait StoreRegistry: ImplementationRegistry<Factory = StoreFactory> {}

/// Get all registered store implementations.
///
/// Returns a vector of (name, factory) tuples for all available store
/// implementations, used by the service to wire the configured backend.
pub fn get_all_implementations() -> Vec<(&'static str, StoreFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level store handle consumed by the order service.
///
/// Wraps a backend and delegates each operation unchanged, emitting a debug
/// event per call. Holds no state of its own.
pub struct MealStore {
	/// The underlying store backend implementation.
	backend: Box<dyn MealStoreInterface>,
}

impl MealStore {
	/// Creates a new MealStore with the specified backend.
	pub fn new(backend: Box<dyn MealStoreInterface>) -> Self {
		Self { backend }
	}

	/// Creates an empty meal container.
	pub async fn insert_meal(&self, name: &str) -> Result<Meal, StoreError> {
		tracing::debug!(name, "inserting meal");
		self.backend.insert_meal(name).await
	}

	/// Appends a new order to the identified meal.
	pub async fn append_order(
		&self,
		meal_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(meal_id, "appending order");
		self.backend.append_order(meal_id, draft).await
	}

	/// Locates the meal containing the identified order.
	pub async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(order_id, "looking up order");
		self.backend.find_by_order_id(order_id).await
	}

	/// Returns the identified meal with its full order collection.
	pub async fn find_orders_by_meal_id(&self, meal_id: &str) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(meal_id, "listing orders for meal");
		self.backend.find_orders_by_meal_id(meal_id).await
	}

	/// Rewrites the fields of exactly the identified order.
	pub async fn update_by_order_id(
		&self,
		order_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(order_id, "updating order");
		self.backend.update_by_order_id(order_id, draft).await
	}

	/// Marks exactly the identified order cancelled.
	pub async fn cancel_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		tracing::debug!(order_id, "cancelling order");
		self.backend.cancel_by_order_id(order_id).await
	}
}
