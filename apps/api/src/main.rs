use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::handlers::BookingContext;
use appointment_cell::services::intake::IntakeService;
use appointment_cell::services::live_list::{AppointmentHub, ListSyncService};
use appointment_cell::services::notify::{NotificationSink, RecordingNotifier};
use appointment_cell::services::review::ReviewDesk;
use session_cell::SessionService;
use shared_config::AppConfig;
use shared_store::StoreClient;

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

    info!("Starting salon booking API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    // Establish the process session against the hosted store
    let store = Arc::new(StoreClient::new(&config));
    let session = Arc::new(SessionService::new(Arc::clone(&config), Arc::clone(&store)));
    session.bootstrap().await;

    // Mirror of the appointments collection, kept in sync while the session
    // is the administrator
    let hub = Arc::new(AppointmentHub::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let sync = ListSyncService::new(
        Arc::clone(&store),
        Arc::clone(&session),
        Arc::clone(&hub),
        Arc::clone(&notifier) as Arc<dyn NotificationSink>,
        Duration::from_secs(config.snapshot_poll_seconds),
    );
    tokio::spawn(sync.run());

    let booking = Arc::new(BookingContext {
        intake: IntakeService::new(Arc::clone(&store), Arc::clone(&session)),
        review: ReviewDesk::new(Arc::clone(&store), Arc::clone(&session), Arc::clone(&hub)),
        hub,
        notifier,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(booking, session)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .await
        .unwrap();
}
