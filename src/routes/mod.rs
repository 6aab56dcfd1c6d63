use std::sync::Arc;

use axum::Router;
use tower_http::{compression::CompressionLayer, services::ServeDir};

use crate::ledger::LedgerService;
use crate::uploads::ScreenshotStore;
use auth::AuthService;

pub mod auth;
pub mod contributions;
pub mod expenses;
pub mod health;
pub mod summary;
pub mod utils;

#[cfg(test)]
pub mod test_support;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub ledger: Arc<LedgerService>,
    pub screenshots: Arc<ScreenshotStore>,
}

/// Every route the service exposes, without the transport-level layers.
pub fn app(state: AppState) -> Router {
    let finance_routes = Router::new()
        .merge(summary::summary_routes(state.clone()))
        .merge(contributions::contribution_routes(state.clone()))
        .merge(expenses::expense_routes(state.clone()))
        .route_layer(CompressionLayer::new().gzip(true));

    Router::new()
        .nest("/api/finance", finance_routes)
        .merge(health::health_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(state.screenshots.root()))
}
