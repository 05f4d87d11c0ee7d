use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use encore_booking::{reconcile_session, HoldSession, LockOutcome};
use encore_domain::Seat;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SeatSelectionRequest {
    seat_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    session: Option<HoldSession>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events/{event_id}/seats", get(list_seats))
        .route("/v1/events/{event_id}/seats/lock", post(lock_seats))
        .route("/v1/events/{event_id}/seats/unlock", post(unlock_seats))
        .route("/v1/events/{event_id}/session", get(get_session))
        .route("/v1/events/{event_id}/stream", get(stream_seat_events))
}

/// GET /v1/events/{id}/seats — snapshot ordered by (row, column). Lapsed
/// holds are already corrected by the registry, so clients never see them.
async fn list_seats(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Seat>>, AppError> {
    Ok(Json(state.store.list_seats(event_id).await?))
}

/// POST /v1/events/{id}/seats/lock — per-seat outcome, partial success is
/// the normal shape: the client re-renders failed seats, it does not retry.
async fn lock_seats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<SeatSelectionRequest>,
) -> Result<Json<LockOutcome>, AppError> {
    let outcome = state
        .coordinator
        .request_lock(event_id, &claims.sub, &req.seat_ids)
        .await?;
    Ok(Json(outcome))
}

async fn unlock_seats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<SeatSelectionRequest>,
) -> Result<StatusCode, AppError> {
    state
        .coordinator
        .request_unlock(event_id, &claims.sub, &req.seat_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/events/{id}/session — countdown reconstructed from the
/// server-recorded hold timestamps, never reset to the full window.
async fn get_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let seats = state.store.list_seats(event_id).await?;
    let session = reconcile_session(&seats, &claims.sub, &state.policy, Utc::now());
    Ok(Json(SessionResponse { session }))
}

/// GET /v1/events/{id}/stream — SSE feed of seat transitions for one event.
async fn stream_seat_events(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.seat_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(seat_event) if seat_event.event_id() == event_id => {
                let data = serde_json::to_string(&seat_event).ok()?;
                Some(Ok::<_, Infallible>(
                    Event::default().event("seat_update").data(data),
                ))
            }
            _ => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
