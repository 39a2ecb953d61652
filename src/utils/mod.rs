//! Utility modules for common functionality

pub mod config;
pub mod logging;

pub use config::{load_config, AppConfig};
pub use logging::init_logging;
