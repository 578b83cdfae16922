//! File-based store backend implementation for the mealshare service.
//!
//! Each meal document is persisted as one JSON file under a base directory,
//! so a single document rewrite stays a single file replacement. Writes are
//! staged to a temp file and renamed into place, and a store-wide lock
//! serializes every read-modify-rename cycle, which keeps single-element
//! order updates atomic with respect to concurrent writers.

use crate::{MealStoreInterface, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use mealshare_types::{ImplementationRegistry, Meal, Order, OrderDraft};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// File-based store implementation.
///
/// Provides simple persistence without external dependencies. Suitable for
/// a single service process; the lock that makes document mutations atomic
/// is process-local.
pub struct FileStore {
	/// Base directory path for meal documents.
	base_path: PathBuf,
	/// Serializes read-modify-rename cycles across all documents.
	lock: RwLock<()>,
}

impl FileStore {
	/// Creates a new FileStore instance with the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self {
			base_path,
			lock: RwLock::new(()),
		}
	}

	/// Converts a meal id to a filesystem-safe document path.
	///
	/// Ids are store-assigned UUIDs, but lookups receive caller-supplied
	/// opaque strings, so path-relevant characters are replaced before the
	/// id touches the filesystem.
	fn meal_path(&self, meal_id: &str) -> PathBuf {
		let safe_id = meal_id.replace(['/', '\\', ':', '.'], "_");
		self.base_path.join(format!("{}.json", safe_id))
	}

	/// Reads and deserializes one meal document, mapping a missing file to
	/// absence.
	async fn read_meal(&self, path: &Path) -> Result<Option<Meal>, StoreError> {
		let data = match fs::read(path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};
		let meal = serde_json::from_slice(&data)
			.map_err(|e| StoreError::Serialization(e.to_string()))?;
		Ok(Some(meal))
	}

	/// Writes a meal document atomically by staging to a temp file and
	/// renaming it into place.
	async fn write_meal(&self, meal: &Meal) -> Result<(), StoreError> {
		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		let data = serde_json::to_vec(meal)
			.map_err(|e| StoreError::Serialization(e.to_string()))?;

		let path = self.meal_path(&meal.id);
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, data)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		Ok(())
	}

	/// Scans the document directory for the meal containing the given
	/// order. Returns the full document, not a projection.
	async fn scan_for_order(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(StoreError::Backend(e.to_string())),
		};

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("json")) {
				continue;
			}
			match self.read_meal(&path).await {
				Ok(Some(meal)) => {
					if meal.orders.iter().any(|o| o.id == order_id) {
						return Ok(Some(meal));
					}
				}
				Ok(None) => {}
				Err(e) => {
					tracing::warn!("Skipping unreadable document {:?}: {}", path, e);
				}
			}
		}
		Ok(None)
	}
}

#[async_trait]
impl MealStoreInterface for FileStore {
	async fn insert_meal(&self, name: &str) -> Result<Meal, StoreError> {
		let _guard = self.lock.write().await;
		let meal = Meal::new(name);
		self.write_meal(&meal).await?;
		Ok(meal)
	}

	async fn append_order(
		&self,
		meal_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError> {
		let _guard = self.lock.write().await;
		let Some(mut meal) = self.read_meal(&self.meal_path(meal_id)).await? else {
			return Ok(None);
		};

		let (pickup_at, quantity) = draft.validate()?;
		meal.orders.push(Order::new(pickup_at, quantity));
		self.write_meal(&meal).await?;
		Ok(Some(meal))
	}

	async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		let _guard = self.lock.read().await;
		let Some(meal) = self.scan_for_order(order_id).await? else {
			return Ok(None);
		};
		let order = match meal.orders.iter().find(|o| o.id == order_id) {
			Some(order) => order.clone(),
			None => return Ok(None),
		};
		Ok(Some(meal.with_orders(vec![order])))
	}

	async fn find_orders_by_meal_id(&self, meal_id: &str) -> Result<Option<Meal>, StoreError> {
		let _guard = self.lock.read().await;
		self.read_meal(&self.meal_path(meal_id)).await
	}

	async fn update_by_order_id(
		&self,
		order_id: &str,
		draft: &OrderDraft,
	) -> Result<Option<Meal>, StoreError> {
		let _guard = self.lock.write().await;
		let Some(mut meal) = self.scan_for_order(order_id).await? else {
			return Ok(None);
		};

		let (pickup_at, quantity) = draft.validate()?;
		let Some(order) = meal.orders.iter_mut().find(|o| o.id == order_id) else {
			return Ok(None);
		};
		order.pickup_at = pickup_at;
		order.quantity = quantity;
		let order = order.clone();

		self.write_meal(&meal).await?;
		Ok(Some(meal.with_orders(vec![order])))
	}

	async fn cancel_by_order_id(&self, order_id: &str) -> Result<Option<Meal>, StoreError> {
		let _guard = self.lock.write().await;
		let Some(mut meal) = self.scan_for_order(order_id).await? else {
			return Ok(None);
		};

		let Some(order) = meal.orders.iter_mut().find(|o| o.id == order_id) else {
			return Ok(None);
		};
		order.cancel_at.get_or_insert_with(Utc::now);
		let order = order.clone();

		self.write_meal(&meal).await?;
		Ok(Some(meal.with_orders(vec![order])))
	}
}

/// Registry for the file store implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = crate::StoreFactory;

	fn factory() -> Self::Factory {
		create_store
	}
}

impl crate::StoreRegistry for Registry {}

/// Factory function to create a file store backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for meal documents (default: "./data/meals")
pub fn create_store(config: &toml::Value) -> Result<Box<dyn MealStoreInterface>, StoreError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/meals")
		.to_string();

	Ok(Box::new(FileStore::new(PathBuf::from(storage_path))))
}
