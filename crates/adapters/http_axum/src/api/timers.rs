//! JSON handlers for timers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sunswitch_app::ports::{Clock, DeviceClient, SolarClock};
use sunswitch_domain::id::TimerId;
use sunswitch_domain::switch_config::TimerSpec;
use sunswitch_domain::timer_rule::TimerRule;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for a newly added timer.
#[derive(Serialize)]
pub struct CreatedTimer {
    pub id: TimerId,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedTimer>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/switches/:name/timers`
pub async fn create<S, D, C>(
    State(state): State<AppState<S, D, C>>,
    Path(name): Path<String>,
    Json(spec): Json<TimerSpec>,
) -> Result<CreateResponse, ApiError>
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let rule = TimerRule::try_from(&spec)?;
    let id = state.scheduler.add_timer(&name, rule).await?;
    Ok(CreateResponse::Created(Json(CreatedTimer { id })))
}

/// `DELETE /api/timers/:id`
pub async fn delete<S, D, C>(
    State(state): State<AppState<S, D, C>>,
    Path(id): Path<TimerId>,
) -> Result<DeleteResponse, ApiError>
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.scheduler.remove_timer(id).await?;
    Ok(DeleteResponse::NoContent)
}
