//! HTTP request logging middleware for axum.
//!
//! Each request is timed from the moment the hook is armed until its response
//! body has been fully sent (or failed), then logged once at a level derived
//! from the status code, as a positional text line or a structured record.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
