//! # SAML Identity Provider Server
//!
//! Main entry point for the SAML identity provider server.

#![forbid(unsafe_code)]

mod auth;
mod config;
mod providers;

use std::sync::Arc;

use axum::{middleware, Router};
use idp_protocol_saml::defaults::ProtocolDefaults;
use idp_protocol_saml::endpoints::{saml_router, InitiationProcessor, SamlState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::AuthConfig;
use config::ServerConfig;
use providers::StaticResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, prefix = %config.idp_prefix, "starting identity provider");

    let resolver = Arc::new(StaticResolver::from_file(
        &config.sp_registry_path,
        config.idp_prefix.clone(),
    )?);
    let processor = Arc::new(InitiationProcessor::new(
        resolver,
        ProtocolDefaults::default(),
        config.idp_prefix.clone(),
    ));
    let state = SamlState::new(processor, config.base_url.clone());

    let auth_config = AuthConfig {
        remote_user_header: config.remote_user_header.clone(),
    };
    let app = Router::new()
        .merge(saml_router(&config.idp_prefix))
        .layer(middleware::from_fn_with_state(auth_config, auth::extract_principal))
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
