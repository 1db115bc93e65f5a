//! Coursecraft Services Library
//!
//! The media ingestor (validate -> store -> verify pipeline for uploaded
//! files) and the course service that reconciles a submitted course tree
//! with its file attachments and drives the repository.

pub mod course_service;
pub mod ingestor;

pub use course_service::CourseService;
pub use ingestor::MediaIngestor;
