// ABOUTME: Server binary for the Widget Store HTTP API
// ABOUTME: Loads configuration, opens the database and serves storefront and admin routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Widget Store API Server Binary
//!
//! Starts the storefront and admin API with Stripe payments, the HTTP invoice
//! client and the logging mailer.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use widget_store::{
    config::{Environment, ServerConfig},
    constants::service_names,
    database::Database,
    invoice::HttpInvoiceClient,
    logging,
    mailer::LogMailer,
    payments::StripeClient,
    resources::ServerResources,
    routes::WidgetStoreRoutes,
};

#[derive(Parser)]
#[command(name = "widget-store-api")]
#[command(about = "Widget Store API - widget checkout, subscriptions and admin dashboard backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override environment (development, production, maintenance)
    #[arg(long)]
    environment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env(service_names::WIDGET_STORE_API)?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(environment) = args.environment.as_deref() {
        config.environment = Environment::from_str_or_default(environment);
    }
    config.validate()?;

    info!("Starting Widget Store API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.to_connection_string()).await?;
    let config = Arc::new(config);

    let resources = Arc::new(ServerResources::new(
        database,
        Arc::new(StripeClient::new(&config.stripe)),
        Arc::new(HttpInvoiceClient::new(config.invoice_service_url.clone())),
        Arc::new(LogMailer),
        config.clone(),
    ));

    let app = WidgetStoreRoutes::routes(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on {addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Widget Store API stopped");
    Ok(())
}

/// Resolve once Ctrl-C is received
async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolve when `signal` fires; never resolve if it cannot be listened for
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal, serving until killed: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
