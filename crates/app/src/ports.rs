//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the scheduler and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! The solar clock port lives in the domain crate
//! ([`sunswitch_domain::solar::SolarClock`]) because triggers resolve through
//! it directly; it is re-exported here for adapters.

pub mod clock;
pub mod device;

pub use clock::{Clock, SystemClock};
pub use device::DeviceClient;
pub use sunswitch_domain::solar::SolarClock;
