use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{BookingService, SeaOrmBookingService};

pub mod auth;
mod bookings;
mod error;
mod system;
mod tables;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub booking_service: Arc<dyn BookingService>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn booking_service(&self) -> &Arc<dyn BookingService> {
        &self.booking_service
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_options(
        &config.general.database_path,
        config.security.clone(),
        5,
        1,
    )
    .await?;

    Ok(create_app_state_with_store(config, store))
}

#[must_use]
pub fn create_app_state_with_store(config: Config, store: Store) -> Arc<AppState> {
    let booking_service: Arc<dyn BookingService> =
        Arc::new(SeaOrmBookingService::new(store.clone()));

    Arc::new(AppState {
        config,
        store,
        booking_service,
        start_time: std::time::Instant::now(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/change-password", post(auth::change_password))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/tables",
            get(tables::list_tables).post(tables::create_table),
        )
        .route("/tables/available", get(tables::list_available_tables))
        .route(
            "/tables/{id}",
            get(tables::get_table)
                .put(tables::update_table)
                .delete(tables::delete_table),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/upcoming", get(bookings::upcoming_bookings))
        .route(
            "/bookings/{id}",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/availability", get(bookings::check_availability))
        .route("/system/status", get(system::status))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
