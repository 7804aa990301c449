pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::AppError;
pub use service::{run_all_validations, CheckContext, ValidatorService};
