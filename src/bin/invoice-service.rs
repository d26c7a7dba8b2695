// ABOUTME: Server binary for the invoice microservice
// ABOUTME: Accepts invoice payloads from the API and acknowledges them with the generated file name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use widget_store::{
    config::environment::env_var_or,
    constants::{ports, service_names},
    invoice::service::InvoiceServiceRoutes,
    logging,
};

#[derive(Parser)]
#[command(name = "invoice-service")]
#[command(about = "Widget Store invoice microservice")]
pub struct Args {
    /// Override INVOICE_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env(service_names::INVOICE_SERVICE)?;

    let port = match args.port {
        Some(port) => port,
        None => env_var_or("INVOICE_PORT", &ports::DEFAULT_INVOICE_PORT.to_string())
            .parse()
            .context("Invalid INVOICE_PORT value")?,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Invoice service listening on {addr}");

    axum::serve(listener, InvoiceServiceRoutes::routes())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal, serving until killed: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Invoice service stopped");
    Ok(())
}
