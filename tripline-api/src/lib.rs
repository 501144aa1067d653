use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod catalog;
pub mod error;
pub mod manager;
pub mod middleware;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let client_routes = bookings::routes().merge(catalog::routes()).layer(
        axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::client_auth_middleware,
        ),
    );

    let manager_routes = manager::routes().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth::manager_auth_middleware,
    ));

    Router::new()
        .route("/health", get(health))
        .merge(client_routes)
        .merge(manager_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
