//! # sunswitch-app
//!
//! Application layer — the scheduler and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceClient` — push a value to a physical switch
//!   - `Clock` — wall-clock time the loop aligns to
//!   - `SolarClock` — sunrise/sunset (defined in the domain, re-exported here)
//! - Provide the **driving/inbound** use-case struct:
//!   - `Scheduler` — load/dump switches, set modes, add/remove timers,
//!     run the periodic evaluation loop
//! - Orchestrate domain objects without knowing *how* devices or the sun work
//!
//! ## Dependency rule
//! Depends on `sunswitch-domain` only (plus `tokio` for sync and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod scheduler;
