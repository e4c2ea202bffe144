//! API服务器

use axum::Router;
use tracing::info;

use crate::handlers::{create_routes, AppState};

/// API服务器
pub struct ApiServer {
    app: Router,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        let app = create_routes(state).layer(tower_http::cors::CorsLayer::permissive());
        Self { app }
    }

    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        info!("Starting API server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }
}
