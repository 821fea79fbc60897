use axum::Router;
use diesel::{
    r2d2::{ConnectionManager, Pool},
    SqliteConnection,
};
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::features::review::{CacheInvalidationHook, NotificationSink, ReviewListeners, SrsConfig};

mod data;
mod features;
mod handlers;
mod schema;
mod utils;

#[cfg(test)]
mod test_support;

type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[tokio::main]
async fn main() {
    // Database configuration
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://study.db".into());

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .build(manager)
        .expect("Failed to create DB pool");

    // Mastery thresholds are calibrated and can be tuned per deployment
    let srs_config = SrsConfig::from_env();

    // Review side effects: built once, shared by reference everywhere
    let listeners = Arc::new(
        ReviewListeners::new()
            .with(Box::new(NotificationSink))
            .with(Box::new(CacheInvalidationHook)),
    );

    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_secure(false);

    // Main application router
    let app = Router::new()
        .nest(
            "/api/study",
            handlers::study::study_router(pool.clone(), listeners.clone(), srs_config),
        )
        .layer(session_layer);

    // Start server
    let listener = match TcpListener::bind("127.0.0.1:5000").await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to address: {}", e);
            std::process::exit(1);
        }
    };

    println!("Study scheduler running on http://localhost:5000");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
