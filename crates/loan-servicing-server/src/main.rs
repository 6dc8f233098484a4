mod error;
mod handlers;
mod models;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use loan_servicing_core::InMemoryStore;

/// Shared volatile store; the lock serializes every mutation.
pub type SharedStore = Arc<Mutex<InMemoryStore>>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let store: SharedStore = Arc::new(Mutex::new(InMemoryStore::new()));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/loans/{id}", get(handlers::get_loan))
        .route("/loans/{id}/reset", post(handlers::reset_loan))
        .route("/loans/{id}/actions/nsf", post(handlers::nsf_action))
        .route("/loans/{id}/actions/post", post(handlers::post_action))
        .route("/loans/{id}/actions/retry", post(handlers::retry_action))
        .route(
            "/loans/{id}/actions/arrears/resolve",
            post(handlers::resolve_action),
        )
        .route("/loans/{id}/actions/report", post(handlers::report_action))
        .with_state(store);

    let app = Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = "0.0.0.0:8080";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await.expect("server error");
}
