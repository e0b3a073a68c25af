//! Device adapter error types.

/// Errors specific to the HTTP device adapter.
#[derive(Debug, thiserror::Error)]
pub enum DeviceHttpError {
    /// `host` and `port` do not form a valid base URL.
    #[error("invalid controller URL {url:?}")]
    InvalidUrl { url: String },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connection, timeout, ...).
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The controller answered with a non-success status.
    #[error("controller answered {status} for {url}")]
    Status { url: String, status: u16 },
}
