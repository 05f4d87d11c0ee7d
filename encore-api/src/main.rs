use std::net::SocketAddr;
use std::sync::Arc;

use encore_api::{app, state::{AppState, AuthSettings}};
use encore_booking::{BookingFinalizer, ExpirySweeper, LockCoordinator};
use encore_domain::HoldPolicy;
use encore_registry::MemorySeatStore;
use encore_store::EventCatalog;
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = encore_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Encore API on port {}", config.server.port);

    let policy = HoldPolicy::new(config.business_rules.seat_hold_seconds);
    let store = Arc::new(MemorySeatStore::new(policy));
    let catalog = Arc::new(EventCatalog::new());

    // Seat event fan-out for SSE subscribers
    let (seat_tx, _) = tokio::sync::broadcast::channel(100);

    let coordinator = Arc::new(LockCoordinator::new(
        store.clone(),
        seat_tx.clone(),
        config.business_rules.max_seats_per_user,
    ));
    let finalizer = Arc::new(BookingFinalizer::new(store.clone(), seat_tx.clone()));

    let sweeper = ExpirySweeper::new(store.clone(), seat_tx.clone());
    tokio::spawn(sweeper.run(Duration::from_secs(
        config.business_rules.sweep_interval_seconds,
    )));

    let app_state = AppState {
        store,
        catalog,
        coordinator,
        finalizer,
        policy,
        seat_tx,
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
