//! HTTP handlers

pub mod course;
