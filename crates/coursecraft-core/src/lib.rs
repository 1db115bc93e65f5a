//! Coursecraft Core Library
//!
//! Domain models, request payloads, upload validation rules, error types
//! and configuration shared by all coursecraft crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

pub use config::Config;
pub use error::AppError;
