//! # sunswitch-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON control API** over a running scheduler
//!   (`/api/switches`, `/api/timers`, …)
//! - Map HTTP requests into scheduler calls (driving adapter)
//! - Map scheduler errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `sunswitch-app` (for the scheduler and port traits) and
//! `sunswitch-domain` (for the types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
