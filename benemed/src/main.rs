//! Beneme Daemon - background wellness session service
//!
//! This daemon owns one wellness engine and manages:
//! - The simulated headband connection and its timers
//! - Challenge, session and insight state
//! - IPC server for UI clients (newline-delimited JSON over TCP)
//!
//! Configuration locations:
//! - Linux: ~/.local/share/beneme/config.json
//! - Windows: %APPDATA%\beneme\config.json
//! - MacOS: ~/Library/Application Support/beneme/config.json

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod paths;
mod protocol;
mod runtime;
mod settings;

use error::DaemonError;
use paths::AppPaths;
use protocol::{Request, Response};
use runtime::{DaemonState, SharedState};
use settings::Settings;

// ═══════════════════════════════════════════════════════════════════════════
// Client Handler
// ═══════════════════════════════════════════════════════════════════════════

async fn write_response<W>(writer: &mut W, response: &Response) -> Result<(), DaemonError>
where
    W: AsyncWriteExt + Unpin,
{
    writer
        .write_all(serde_json::to_string(response)?.as_bytes())
        .await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

async fn handle_client(stream: TcpStream, state: SharedState) -> Result<(), DaemonError> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let resp = Response::error(format!("Invalid request: {}", e));
                write_response(&mut writer, &resp).await?;
                continue;
            }
        };

        let shutdown = matches!(request, Request::Shutdown);
        let response = handler::handle_request(&state, request).await;
        write_response(&mut writer, &response).await?;

        if shutdown {
            tokio::spawn(async {
                // Give the response a moment to flush before exiting.
                time::sleep(Duration::from_millis(50)).await;
                std::process::exit(0);
            });
        }
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (RUST_LOG, default info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let paths = AppPaths::new()?;
    info!("Data directory: {:?}", paths.data_dir());

    let settings = Settings::load_or_default(&paths.config_file());
    let addr = settings.listen_addr.clone();
    let state = DaemonState::new(settings).into_shared();

    // Stop timers on Ctrl-C before exiting.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                runtime::disconnect(&state).await;
                info!("Ctrl-C: shutting down");
                std::process::exit(0);
            }
        });
    }

    // Start IPC server
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| DaemonError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("Beneme daemon listening on {}", addr);

    // Accept client connections
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Client connected: {}", peer);
        let state_clone = Arc::clone(&state);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, state_clone).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}
