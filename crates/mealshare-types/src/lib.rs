//! Common types module for the mealshare system.
//!
//! This module defines the core data types and structures shared by the
//! store, order, and service crates. It provides a centralized location
//! for domain types to ensure consistency across all components.

/// API types for HTTP endpoints and error responses.
pub mod api;
/// Meal aggregate types.
pub mod meal;
/// Embedded order types and untrusted input shaping.
pub mod order;
/// Registry trait for self-registering store backends.
pub mod registry;
/// Field validation types enforced at write time.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use meal::*;
pub use order::*;
pub use registry::*;
pub use validation::*;
