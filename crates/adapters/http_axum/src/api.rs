//! JSON control API handlers.
//!
//! - `GET    /api/switches`                — every switch, in load format
//! - `POST   /api/switches`                — register a switch
//! - `GET    /api/switches/{name}`         — one switch, in load format
//! - `PUT    /api/switches/{name}/mode`    — change a switch's mode
//! - `POST   /api/switches/{name}/timers`  — add a timer
//! - `DELETE /api/timers/{id}`             — remove a timer

#[allow(clippy::missing_errors_doc)]
pub mod switches;
#[allow(clippy::missing_errors_doc)]
pub mod timers;

use axum::Router;
use axum::routing::{delete, get, post, put};

use sunswitch_app::ports::{Clock, DeviceClient, SolarClock};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, D, C>() -> Router<AppState<S, D, C>>
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/switches",
            get(switches::list::<S, D, C>).post(switches::create::<S, D, C>),
        )
        .route("/switches/{name}", get(switches::get::<S, D, C>))
        .route("/switches/{name}/mode", put(switches::set_mode::<S, D, C>))
        .route("/switches/{name}/timers", post(timers::create::<S, D, C>))
        .route("/timers/{id}", delete(timers::delete::<S, D, C>))
}
