use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;

use acctsvc_core::command::{commands_with_builder, Commands};
use acctsvc_core::query::{queries_with_builder, Queries};
use acctsvc_storage::Database;
use acctsvc_util::Environment;

use crate::accounts;
use crate::builder::AppBuilder;
use crate::telemetry;

pub const SERVICE_NAME: &str = "acctsvc";

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    commands: Commands,
    // Wired but unread until a read model populates the query side.
    #[allow(dead_code)]
    queries: Queries,
    environment: Environment,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, storage: Database, environment: Environment) -> Self {
        let builder = AppBuilder::new(storage);
        let commands = commands_with_builder(&builder);
        let queries = queries_with_builder(&builder);
        Self {
            metrics,
            commands,
            queries,
            environment,
        }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/metrics", get(metrics))
        .nest("/api/v1", accounts::routes())
        .with_state(state)
}

async fn ping() -> impl IntoResponse {
    Json(json!({ "message": format!("{SERVICE_NAME} response: pong") }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .unwrap()
}
