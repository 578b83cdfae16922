//! In-memory store backend implementation for the mealshare service.
//!
//! This module provides a memory-based implementation of the
//! MealStoreInterface trait, useful for testing and development scenarios
//! where persistence is not required.

use crate::{MealStoreInterface, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use mealshare_types::{ImplementationRegistry, Meal, Order, OrderDraft};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory store implementation.
///
/// Meal documents live in a HashMap behind a read-write lock. Every
/// mutation holds the write guard for the full match-and-rewrite, which is
/// what makes single-element updates atomic with respect to concurrent
/// mutations of sibling orders.
pub struct MemoryStore {
	/// Meal documents keyed by meal id.
	meals: Arc<RwLock<HashMap<String, Meal>>>,
}

impl MemoryStore {
	/// Creates a new MemoryStore instance.
	pub fn new() -> Self {
		Self {
			meals: Arc::new(RwLock::new(HashMap::new())),
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl MealStoreInterface for MemoryStore {
	async fn insert_meal(&self, name: &str) -> Result<Meal, StoreError> {
		let meal = Meal::new(name);
		let mut meals = self.meals.write().await;
		meals.insert(meal.id.clone(), meal.clone());
		Ok(meal)
	}

	async fn append_order(
		&self,
		meal_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError> {
		let mut meals = self.meals.write().await;
		let Some(meal) = meals.get_mut(meal_id) else {
			return Ok(None);
		};

		// Validation runs inside the same critical section as the append,
		// so a rejected draft leaves the document untouched.
		let (pickup_at, quantity) = draft.validate()?;
		meal.orders.push(Order::new(pickup_at, quantity));
		Ok(Some(meal.clone()))
	}

	async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		let meals = self.meals.read().await;
		for meal in meals.values() {
			if let Some(order) = meal.orders.iter().find(|o| o.id == order_id) {
				return Ok(Some(meal.with_orders(vec![order.clone()])));
			}
		}
		Ok(None)
	}

	async fn find_orders_by_meal_id(&self, meal_id: &str) -> Result<Option<Meal>, StoreError> {
		let meals = self.meals.read().await;
		Ok(meals.get(meal_id).cloned())
	}

	async fn update_by_order_id(
		&self,
		order_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError> {
		let mut meals = self.meals.write().await;
		for meal in meals.values_mut() {
			if let Some(order) = meal.orders.iter_mut().find(|o| o.id == order_id) {
				let (pickup_at, quantity) = draft.validate()?;
				order.pickup_at = pickup_at;
				order.quantity = quantity;
				let order = order.clone();
				return Ok(Some(meal.with_orders(vec![order])));
			}
		}
		Ok(None)
	}

	async fn cancel_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		let mut meals = self.meals.write().await;
		for meal in meals.values_mut() {
			if let Some(order) = meal.orders.iter_mut().find(|o| o.id == order_id) {
				// First cancellation wins; repeating it is a no-op.
				order.cancel_at.get_or_insert_with(Utc::now);
				let order = order.clone();
				return Ok(Some(meal.with_orders(vec![order])));
			}
		}
		Ok(None)
	}
}

/// Registry for the in-memory store implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::StoreFactory;

	fn factory() -> Self::Factory {
		create_store
	}
}

impl crate::StoreRegistry for Registry {}

/// Factory function to create a memory store backend from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_store(_config: &toml::Value) -> Result<Box<dyn MealStoreInterface>, StoreError> {
	Ok(Box::new(MemoryStore::new()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use mealshare_types::ValidationError;

	fn draft(pickup_at: &str, quantity: i64) -> OrderDraft {
		OrderDraft {
			pickup_at: Some(pickup_at.to_string()),
			quantity: Some(quantity),
		}
	}

	#[tokio::test]
	async fn test_append_grows_collection_and_returns_full_meal() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();

		let with_one = store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(with_one.orders.len(), 1);

		let with_two = store
			.append_order(&meal.id, &draft("2024-01-02T12:30:00Z", 1))
			.await
			.unwrap()
			.unwrap();
		// Append returns the whole collection, not just the new entry.
		assert_eq!(with_two.orders.len(), 2);

		let new = with_two.orders.last().unwrap();
		assert_eq!(new.pickup_at.to_rfc3339(), "2024-01-02T12:30:00+00:00");
		assert_eq!(new.quantity, 1);
		assert!(new.cancel_at.is_none());
	}

	#[tokio::test]
	async fn test_append_to_unknown_meal_is_absence() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();

		let result = store
			.append_order("no-such-meal", &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap();
		assert!(result.is_none());

		// Nothing was written anywhere.
		let untouched = store.find_orders_by_meal_id(&meal.id).await.unwrap().unwrap();
		assert!(untouched.orders.is_empty());
	}

	#[tokio::test]
	async fn test_append_with_invalid_quantity_fails_whole_write() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();

		for bad in [
			draft("2024-01-01T10:00:00Z", 0),
			draft("2024-01-01T10:00:00Z", -4),
			OrderDraft {
				pickup_at: Some("2024-01-01T10:00:00Z".to_string()),
				quantity: None,
			},
		] {
			let result = store.append_order(&meal.id, &bad).await;
			assert!(matches!(result, Err(StoreError::Validation(_))));
		}

		let untouched = store.find_orders_by_meal_id(&meal.id).await.unwrap().unwrap();
		assert!(untouched.orders.is_empty());
	}

	#[tokio::test]
	async fn test_find_by_order_id_projects_one_entry() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();
		store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap();
		let with_two = store
			.append_order(&meal.id, &draft("2024-01-02T12:30:00Z", 1))
			.await
			.unwrap()
			.unwrap();
		let target = with_two.orders[1].clone();

		let found = store.find_by_order_id(&target.id).await.unwrap().unwrap();
		assert_eq!(found.id, meal.id);
		assert_eq!(found.orders, vec![target]);

		assert!(store.find_by_order_id("no-such-order").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_empty_meal_is_distinct_from_absent_meal() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();

		let empty = store.find_orders_by_meal_id(&meal.id).await.unwrap().unwrap();
		assert!(empty.orders.is_empty());

		assert!(store
			.find_orders_by_meal_id("no-such-meal")
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_update_touches_only_the_target_order() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();
		store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap();
		let with_two = store
			.append_order(&meal.id, &draft("2024-01-02T12:30:00Z", 1))
			.await
			.unwrap()
			.unwrap();
		let sibling = with_two.orders[0].clone();
		let target = with_two.orders[1].clone();

		let updated = store
			.update_by_order_id(&target.id, &draft("2024-01-03T09:15:00Z", 5))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(updated.orders.len(), 1);
		assert_eq!(updated.orders[0].id, target.id);
		assert_eq!(updated.orders[0].quantity, 5);
		assert_eq!(
			updated.orders[0].pickup_at.to_rfc3339(),
			"2024-01-03T09:15:00+00:00"
		);

		// Sibling is unchanged on re-fetch.
		let refetched = store.find_by_order_id(&sibling.id).await.unwrap().unwrap();
		assert_eq!(refetched.orders, vec![sibling]);

		assert!(store
			.update_by_order_id("no-such-order", &draft("2024-01-03T09:15:00Z", 5))
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_update_revalidates_fields() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();
		let with_order = store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap()
			.unwrap();
		let order = with_order.orders[0].clone();

		let result = store
			.update_by_order_id(&order.id, &draft("not a timestamp", 2))
			.await;
		assert!(matches!(
			result,
			Err(StoreError::Validation(ValidationError::InvalidValue { .. }))
		));

		let unchanged = store.find_by_order_id(&order.id).await.unwrap().unwrap();
		assert_eq!(unchanged.orders, vec![order]);
	}

	#[tokio::test]
	async fn test_cancel_sets_cancel_at_once() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();
		let with_order = store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap()
			.unwrap();
		let order_id = with_order.orders[0].id.clone();

		let cancelled = store.cancel_by_order_id(&order_id).await.unwrap().unwrap();
		let first_stamp = cancelled.orders[0].cancel_at.unwrap();

		// Cancelling again succeeds but keeps the original timestamp.
		let again = store.cancel_by_order_id(&order_id).await.unwrap().unwrap();
		assert_eq!(again.orders[0].cancel_at, Some(first_stamp));

		assert!(store
			.cancel_by_order_id("no-such-order")
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_update_after_cancel_keeps_cancel_at() {
		let store = MemoryStore::new();
		let meal = store.insert_meal("dumplings").await.unwrap();
		let with_order = store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 3))
			.await
			.unwrap()
			.unwrap();
		let order_id = with_order.orders[0].id.clone();

		let cancelled = store.cancel_by_order_id(&order_id).await.unwrap().unwrap();
		let stamp = cancelled.orders[0].cancel_at.unwrap();

		let updated = store
			.update_by_order_id(&order_id, &draft("2024-02-01T18:00:00Z", 7))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(updated.orders[0].quantity, 7);
		assert_eq!(updated.orders[0].cancel_at, Some(stamp));
	}

	#[tokio::test]
	async fn test_concurrent_updates_of_different_orders_both_land() {
		let store = Arc::new(MemoryStore::new());
		let meal = store.insert_meal("dumplings").await.unwrap();
		store
			.append_order(&meal.id, &draft("2024-01-01T10:00:00Z", 1))
			.await
			.unwrap();
		let with_two = store
			.append_order(&meal.id, &draft("2024-01-01T11:00:00Z", 1))
			.await
			.unwrap()
			.unwrap();
		let first = with_two.orders[0].id.clone();
		let second = with_two.orders[1].id.clone();

		let store_a = Arc::clone(&store);
		let id_a = first.clone();
		let task_a = tokio::spawn(async move {
			store_a
				.update_by_order_id(&id_a, &draft("2024-01-05T10:00:00Z", 10))
				.await
		});
		let store_b = Arc::clone(&store);
		let id_b = second.clone();
		let task_b = tokio::spawn(async move {
			store_b
				.update_by_order_id(&id_b, &draft("2024-01-06T10:00:00Z", 20))
				.await
		});

		task_a.await.unwrap().unwrap().unwrap();
		task_b.await.unwrap().unwrap().unwrap();

		let final_meal = store.find_orders_by_meal_id(&meal.id).await.unwrap().unwrap();
		let a = final_meal.orders.iter().find(|o| o.id == first).unwrap();
		let b = final_meal.orders.iter().find(|o| o.id == second).unwrap();
		assert_eq!(a.quantity, 10);
		assert_eq!(b.quantity, 20);
	}
}
