//! students-api: HTTP API layer
//!
//! This crate provides the HTTP layer for the students service:
//! - REST endpoints via Axum
//! - Request payload validation
//! - Configuration loading
//! - Logging bootstrap
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               students-api                   │
//! ├─────────────────────────────────────────────┤
//! │  http/        - HTTP REST endpoints          │
//! │  validation.rs - Payload validation rules    │
//! │  config.rs    - Configuration loading        │
//! │  logging.rs   - tracing subscriber setup     │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod validation;
