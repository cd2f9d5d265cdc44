use crate::handlers::{self, AppState};
use axum::{routing::get, Router};
use demand_forecast_core::AppConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState {
                config: Arc::new(config),
            },
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/options", get(handlers::get_options))
            .route("/api/categories", get(handlers::get_categories))
            .route(
                "/api/categories/:cat_id/products",
                get(handlers::get_category_products),
            )
            .route("/api/forecast/:product_id", get(handlers::get_forecast))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            dataset = %self.state.config.dataset.path,
            "Web API listening on {}",
            addr
        );

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
