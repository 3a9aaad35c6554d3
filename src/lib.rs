pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod geocode;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod routes;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use geocode::Geocoder;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
    pub geocoder: Geocoder,
}
