use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use notification_cell::{spawn_dispatcher, LogSender};
use persistence_cell::{seed_appointments, JsonFileStore};
use queue_cell::{AppointmentStore, QueueController, QueueState, SnapshotStore};
use shared_config::AppConfig;

const ETA_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedQueue API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Restore the queue, falling back to the seed dataset so the clinic
    // always boots into a usable state
    let snapshots: Arc<dyn SnapshotStore> =
        Arc::new(JsonFileStore::new(config.data_path.clone()));
    let now = Utc::now();
    let appointments = match snapshots.load().await {
        Ok(appointments) => {
            info!("restored {} appointments from snapshot", appointments.len());
            appointments
        }
        Err(e) => {
            warn!("no usable snapshot ({}), starting from seed dataset", e);
            seed_appointments(now.date_naive())
        }
    };

    // Outbound notifications drain through a dedicated worker
    let (events, receiver) = mpsc::unbounded_channel();
    spawn_dispatcher(receiver, Arc::new(LogSender::new(config.clinic.name.clone())));

    let store =
        AppointmentStore::with_appointments(config.clinic.slot_duration_minutes, appointments);
    let controller = QueueController::new(store, snapshots, events, now);
    let state = Arc::new(QueueState::new(controller, config));

    // Periodic re-projection keeps announced ETAs honest as the clock moves
    let refresh_state = state.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(ETA_REFRESH_INTERVAL);
        tick.tick().await; // the first tick completes immediately
        loop {
            tick.tick().await;
            let mut controller = refresh_state.controller.lock().await;
            controller.refresh(Utc::now());
        }
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
