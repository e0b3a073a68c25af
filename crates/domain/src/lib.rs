//! # sunswitch-domain
//!
//! Pure domain model for the sunswitch timer engine.
//!
//! ## Responsibilities
//! - Foundational types: timer identifiers, error conventions, time-of-day helpers
//! - Define **Triggers** (daily, sunrise-relative, sunset-relative points in the day)
//! - Define **Timer rules** (an on/off trigger pair with optional minimum duration)
//! - Define **Switches** (mode, timers, on value) and how their rules combine
//! - Define the **solar clock** seam used by sun-relative triggers
//! - Define the declarative **switch configuration** shape (load/dump)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod solar;
pub mod switch;
pub mod switch_config;
pub mod timer_rule;
pub mod trigger;
