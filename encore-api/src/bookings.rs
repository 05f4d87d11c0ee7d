use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use encore_domain::Booking;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct FinalizeRequest {
    seat_ids: Vec<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events/{event_id}/bookings", post(finalize_booking))
        .route("/v1/bookings", get(list_bookings))
        .route("/v1/bookings/{booking_id}", get(get_booking))
}

/// POST /v1/events/{id}/bookings — convert the caller's holds into a
/// booking. All-or-nothing: 409 when a seat is not held by the caller,
/// 410 when the hold window lapsed, no partial outcome.
async fn finalize_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<FinalizeRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .finalizer
        .finalize(event_id, &claims.sub, &req.seat_ids)
        .await?;
    Ok(Json(booking))
}

/// GET /v1/bookings — the caller's bookings, newest first.
async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<Vec<Booking>> {
    Json(state.finalizer.list_bookings(&claims.sub).await)
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .finalizer
        .get_booking(booking_id)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", booking_id)))?;

    if booking.user_id != claims.sub {
        return Err(AppError::AuthorizationError(
            "Booking does not belong to you".to_string(),
        ));
    }
    Ok(Json(booking))
}
