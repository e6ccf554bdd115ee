//! Doctor directory: a PostgreSQL-backed REST service for doctor profiles, their categories,
//! specialities and practice locations.

pub mod case;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod serializer;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, MigrationError};
pub use filter::DoctorFilter;
pub use migration::apply_migrations;
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{app, common_routes, doctor_routes, docs_routes, ApiDoc};
pub use service::{DoctorService, LocationService, LookupService, RequestValidator, WriteMode};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
