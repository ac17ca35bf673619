//! API Gateway
//!
//! Single HTTP entry point for the certification platform. Serves the
//! REST routes and the GraphQL endpoint over the same listener and
//! forwards every operation to the record services over gRPC. Holds no
//! state of its own.

use std::sync::Arc;

use async_graphql_axum::GraphQL;
use axum::Router;
use certhub_core::{CerthubError, CerthubService, MicroserviceRuntime, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod clients;
mod config;
mod error;
mod graphql;
mod rest;

use clients::ServiceClients;
use config::GatewayConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_gateway=debug".parse().unwrap()),
        )
        .json()
        .init();

    info!("starting api gateway");

    let service = Arc::new(ApiGatewayService::new()?);
    MicroserviceRuntime::run(service).await
}

pub struct ApiGatewayService {
    config: GatewayConfig,
}

impl ApiGatewayService {
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: GatewayConfig::from_env()?,
        })
    }

    fn build_router(&self) -> Result<Router> {
        let clients = ServiceClients::connect(&self.config)?;
        let schema = graphql::build_schema(clients.clone());

        Ok(rest::router(clients)
            .route_service("/graphql", GraphQL::new(schema))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }
}

#[async_trait::async_trait]
impl CerthubService for ApiGatewayService {
    fn service_id(&self) -> &'static str {
        "api-gateway"
    }

    async fn start(&self) -> Result<()> {
        let app = self.build_router()?;
        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;

        info!(bind = %self.config.http_bind, "api gateway listening");
        axum::serve(listener, app)
            .await
            .map_err(|err| CerthubError::Internal(err.to_string()))?;
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutting down api gateway");
        Ok(())
    }
}
