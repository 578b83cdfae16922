//! HTTP server for the mealshare API.
//!
//! Thin request-handling layer over the order service: it maps absence to a
//! not-found response, write-time validation failures to bad-request, and
//! anything else to an internal error, serializing successful results as
//! the meal payload each operation returns.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json},
	routing::{get, post},
	Router,
};
use mealshare_config::ApiConfig;
use mealshare_order::OrderService;
use mealshare_store::MealStore;
use mealshare_types::{ApiError, CreateMealRequest, Meal};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Order lifecycle operations.
	pub orders: Arc<OrderService>,
	/// Direct store handle, used only for meal container seeding.
	pub store: Arc<MealStore>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for the order endpoints.
pub async fn start_server(
	api_config: ApiConfig,
	store: Arc<MealStore>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState {
		orders: Arc::new(OrderService::new(Arc::clone(&store))),
		store,
	};

	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/meals", post(handle_create_meal))
				.route(
					"/meals/{id}/orders",
					get(handle_orders_for_meal).post(handle_create_order),
				)
				.route(
					"/orders/{orderId}",
					get(handle_get_order)
						.put(handle_update_order)
						.delete(handle_cancel_order),
				),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("mealshare API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles POST /api/meals requests.
///
/// Seeds an empty meal container. Meal management beyond seeding lives
/// outside this service.
async fn handle_create_meal(
	State(state): State<AppState>,
	Json(request): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<Meal>), ApiError> {
	let meal = state.store.insert_meal(&request.name).await?;
	Ok((StatusCode::CREATED, Json(meal)))
}

/// Handles POST /api/meals/{id}/orders requests.
async fn handle_create_order(
	Path(meal_id): Path<String>,
	State(state): State<AppState>,
	Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Meal>), ApiError> {
	match state.orders.create_order(&meal_id, &payload).await? {
		Some(meal) => Ok((StatusCode::CREATED, Json(meal))),
		None => Err(meal_not_found(&meal_id)),
	}
}

/// Handles GET /api/meals/{id}/orders requests.
async fn handle_orders_for_meal(
	Path(meal_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Meal>, ApiError> {
	match state.orders.orders_for_meal(&meal_id).await? {
		Some(meal) => Ok(Json(meal)),
		None => Err(meal_not_found(&meal_id)),
	}
}

/// Handles GET /api/orders/{orderId} requests.
async fn handle_get_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Meal>, ApiError> {
	match state.orders.order_by_id(&order_id).await? {
		Some(meal) => Ok(Json(meal)),
		None => Err(order_not_found(&order_id)),
	}
}

/// Handles PUT /api/orders/{orderId} requests.
async fn handle_update_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
	Json(payload): Json<Value>,
) -> Result<Json<Meal>, ApiError> {
	match state.orders.update_order(&order_id, &payload).await? {
		Some(meal) => Ok(Json(meal)),
		None => Err(order_not_found(&order_id)),
	}
}

/// Handles DELETE /api/orders/{orderId} requests.
async fn handle_cancel_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	match state.orders.cancel_order(&order_id).await? {
		Some(_) => Ok(StatusCode::NO_CONTENT),
		None => Err(order_not_found(&order_id)),
	}
}

fn meal_not_found(meal_id: &str) -> ApiError {
	ApiError::NotFound {
		message: format!("Meal with {} not found.", meal_id),
	}
}

fn order_not_found(order_id: &str) -> ApiError {
	ApiError::NotFound {
		message: format!("Order with {} not found.", order_id),
	}
}
