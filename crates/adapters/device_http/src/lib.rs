//! # sunswitch-adapter-device-http
//!
//! [`DeviceClient`] implementation talking to the device controller over
//! HTTP with [reqwest](https://docs.rs/reqwest).
//!
//! Setting a switch is a single `PUT http://{host}:{port}/api/switch/{name}`
//! whose body is the JSON-encoded integer value. Any non-2xx answer is a
//! failure. Nothing is retried here; the scheduler logs the failure and the
//! next tick sends the value again.
//!
//! ## Dependency rule
//! Depends on `sunswitch-app` (for the port trait) and `sunswitch-domain`
//! (for [`DispatchError`]).

pub mod config;
pub mod error;

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use sunswitch_app::ports::DeviceClient;
use sunswitch_domain::error::DispatchError;

pub use config::DeviceHttpConfig;
pub use error::DeviceHttpError;

/// Sends switch values to the controller's `/api/switch/{name}` endpoint.
#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDeviceClient {
    /// Build a client for the controller described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHttpError::InvalidUrl`] if `host` and `port` do not
    /// form a valid URL, and [`DeviceHttpError::Client`] if the underlying
    /// HTTP client cannot be initialised.
    pub fn new(config: &DeviceHttpConfig) -> Result<Self, DeviceHttpError> {
        let base = config.base_url();
        let base_url = Url::parse(&base).map_err(|_| DeviceHttpError::InvalidUrl { url: base })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DeviceHttpError::Client)?;
        Ok(Self { client, base_url })
    }

    /// URL that sets `switch`. The name is one percent-encoded path segment.
    #[must_use]
    pub fn switch_url(&self, switch: &str) -> Url {
        let mut url = self.base_url.clone();
        // an http(s) URL always has path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "switch", switch]);
        }
        url
    }

    async fn put_value(&self, switch: &str, value: i64) -> Result<(), DeviceHttpError> {
        let url = self.switch_url(switch);
        let response = self
            .client
            .put(url.clone())
            .json(&value)
            .send()
            .await
            .map_err(|source| DeviceHttpError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceHttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        tracing::debug!(%url, value, "switch set");
        Ok(())
    }
}

impl DeviceClient for HttpDeviceClient {
    fn set_value(
        &self,
        switch: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        async move {
            self.put_value(switch, value)
                .await
                .map_err(|err| DispatchError {
                    switch: switch.to_string(),
                    value,
                    source: Box::new(err),
                })
        }
    }
}
