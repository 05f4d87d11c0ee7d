use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use encore_store::{EventSummary, SeatMapLayout};

use crate::auth::{require_admin, Claims};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateEventRequest {
    name: String,
    venue: String,
    starts_at: DateTime<Utc>,
    layout: SeatMapLayout,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events", get(list_events).post(create_event))
        .route("/v1/events/{event_id}", get(get_event).delete(delete_event))
}

/// POST /v1/events — create an event and seed its seat map.
async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<EventSummary>, AppError> {
    require_admin(&claims)?;

    let event = state
        .catalog
        .create_event(req.name, req.venue, req.starts_at, req.layout)
        .await?;

    let seats = event.layout.generate_seats(event.id);
    state.store.insert_seats(event.id, seats).await?;

    tracing::info!(event_id = %event.id, rows = event.layout.rows, columns = event.layout.columns, "event created");
    Ok(Json(event))
}

async fn list_events(State(state): State<AppState>) -> Json<Vec<EventSummary>> {
    Json(state.catalog.list_events().await)
}

async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventSummary>, AppError> {
    Ok(Json(state.catalog.get_event(event_id).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_admin(&claims)?;

    state.catalog.remove_event(event_id).await?;
    state.store.remove_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
