use std::net::SocketAddr;
use std::sync::Arc;

use tripline_api::{
    app,
    state::{AppState, AuthConfig},
};
use tripline_order::{BookingWriter, StatusManager};
use tripline_store::{
    Config, DbClient, PostgresBookingRepository, PostgresCatalogRepository,
    PostgresDiscountRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tripline_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Tripline API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let catalog = Arc::new(PostgresCatalogRepository::new(db.pool.clone()));
    let discounts = Arc::new(PostgresDiscountRepository::new(db.pool.clone()));
    let bookings = Arc::new(PostgresBookingRepository::new(db.pool.clone()));

    let writer = Arc::new(BookingWriter::new(
        catalog.clone(),
        discounts,
        bookings.clone(),
    ));
    let status = Arc::new(StatusManager::new(bookings.clone()));

    let app_state = AppState {
        catalog,
        bookings,
        writer,
        status,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
