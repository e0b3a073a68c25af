//! Device port — sets the value of a physical switch.

use std::future::Future;

use sunswitch_domain::error::DispatchError;

/// Sends switch values to the device-control endpoint.
pub trait DeviceClient {
    /// Set `switch` to `value`.
    ///
    /// Called again on every evaluation tick whether or not the value
    /// changed, so implementations must be idempotent.
    fn set_value(
        &self,
        switch: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

impl<T: DeviceClient + Send + Sync> DeviceClient for std::sync::Arc<T> {
    fn set_value(
        &self,
        switch: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        (**self).set_value(switch, value)
    }
}
