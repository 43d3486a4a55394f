use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::service::BookService;

pub mod routes;

/// Server state
pub struct AppState {
    pub service: BookService,
}

/// Build the HTTP router around a book service
pub fn router(service: BookService) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/hello", get(routes::hello))
        .route("/books", get(routes::list_books).post(routes::create_book))
        .route(
            "/books/{id}",
            get(routes::get_book)
                .put(routes::update_book)
                .delete(routes::delete_book),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, service: BookService) -> anyhow::Result<()> {
    let app = router(service);

    tracing::info!("Starting server on {}", addr);
    println!("📚 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
