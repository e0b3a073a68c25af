//! JSON handlers for switches.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use sunswitch_app::ports::{Clock, DeviceClient, SolarClock};
use sunswitch_domain::error::{NotFoundError, SunswitchError};
use sunswitch_domain::switch::SwitchMode;
use sunswitch_domain::switch_config::{SwitchSpec, SwitchesSpec};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a switch.
#[derive(Deserialize)]
pub struct CreateSwitchRequest {
    pub name: String,
    pub mode: String,
    pub on_value: Option<i64>,
}

/// Request body for changing a switch's mode.
#[derive(Deserialize)]
pub struct SetModeRequest {
    pub mode: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<SwitchesSpec>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<SwitchSpec>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<SwitchSpec>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the set-mode endpoint.
pub enum SetModeResponse {
    NoContent,
}

impl IntoResponse for SetModeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/switches`
pub async fn list<S, D, C>(State(state): State<AppState<S, D, C>>) -> ListResponse
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.scheduler.dump().await))
}

/// `GET /api/switches/:name`
pub async fn get<S, D, C>(
    State(state): State<AppState<S, D, C>>,
    Path(name): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let switch = state
        .scheduler
        .switch(&name)
        .await
        .ok_or_else(|| SunswitchError::from(NotFoundError::Switch(name)))?;
    Ok(GetResponse::Ok(Json(SwitchSpec::from(&switch))))
}

/// `POST /api/switches`
pub async fn create<S, D, C>(
    State(state): State<AppState<S, D, C>>,
    Json(req): Json<CreateSwitchRequest>,
) -> Result<CreateResponse, ApiError>
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mode: SwitchMode = req.mode.parse()?;
    state
        .scheduler
        .add_switch(&req.name, mode, req.on_value)
        .await?;
    let switch = state
        .scheduler
        .switch(&req.name)
        .await
        .ok_or_else(|| SunswitchError::from(NotFoundError::Switch(req.name)))?;
    Ok(CreateResponse::Created(Json(SwitchSpec::from(&switch))))
}

/// `PUT /api/switches/:name/mode`
pub async fn set_mode<S, D, C>(
    State(state): State<AppState<S, D, C>>,
    Path(name): Path<String>,
    Json(req): Json<SetModeRequest>,
) -> Result<SetModeResponse, ApiError>
where
    S: SolarClock + Send + Sync + 'static,
    D: DeviceClient + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mode: SwitchMode = req.mode.parse()?;
    state.scheduler.set_mode(&name, mode).await?;
    Ok(SetModeResponse::NoContent)
}
