//! Common utilities and shared infrastructure
//!
//! This module contains core infrastructure used across the application:
//! - Error handling
//! - Logging setup

pub mod error;
pub mod logger;

pub use error::{ServiceError, ServiceResult};
pub use logger::{init_logger, init_logger_with_file};
