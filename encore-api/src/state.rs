use std::sync::Arc;

use encore_booking::{BookingFinalizer, LockCoordinator};
use encore_domain::{HoldPolicy, SeatEvent};
use encore_registry::SeatStore;
use encore_store::EventCatalog;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SeatStore>,
    pub catalog: Arc<EventCatalog>,
    pub coordinator: Arc<LockCoordinator>,
    pub finalizer: Arc<BookingFinalizer>,
    pub policy: HoldPolicy,
    pub seat_tx: broadcast::Sender<SeatEvent>,
    pub auth: AuthSettings,
}
