// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leisedruck — silent label-print bridge
//
// Entry point. Initialises logging, loads the config, wires the backend
// services, starts the bus listener, and serves line-delimited JSON commands
// on stdin/stdout until the pipe closes.

mod ipc;
mod services;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use leisedruck_bus::{BusListener, UnavailableConnector};
use leisedruck_core::config::AppConfig;
use leisedruck_dispatch::surface::{StubSurfaceHost, SurfaceHost};
use leisedruck_spooler::runner::{PowerShellRunner, QueryRunner};

use services::BridgeServices;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Leisedruck starting");

    let data_dir = std::env::current_dir()?;
    let config = AppConfig::load_or_default(&data_dir);

    let runner = PowerShellRunner::new(config.shell_output_limit);
    // The hidden-window host is provided by the embedding shell; this
    // standalone binary runs with the stub and reports prints as unavailable.
    let services = BridgeServices::new(
        runner,
        StubSurfaceHost,
        &config,
        data_dir.join("static"),
    );

    let listener = BusListener::new(
        UnavailableConnector,
        config.bus_endpoint.clone(),
        config.bus_user_code.clone(),
        config.bus_topic.clone(),
    );
    tokio::spawn(listener.run());

    serve(&services).await
}

/// Read commands until stdin closes. Responses go to stdout, logs to stderr.
async fn serve<R, H>(services: &BridgeServices<R, H>) -> std::io::Result<()>
where
    R: QueryRunner + Clone,
    H: SurfaceHost,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(request) => ipc::dispatch(services, request).await,
            Err(e) => ipc::Response::parse_failure(&e),
        };

        match serde_json::to_string(&response) {
            Ok(json) => {
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => error!(error = %e, "failed to encode response"),
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}
