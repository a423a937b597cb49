// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvasmaid CLI entrypoint.
//!
//! By default this runs the interactive TUI. `--mcp-http-port` additionally serves MCP over
//! streamable HTTP at `http://127.0.0.1:<port>/mcp`, driving the same session as the TUI.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations), or
//! `--print FILE` to convert once and write the Mermaid source to stdout.

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

use canvasmaid::config::{self, ColorOverride, LOG_ENV};
use canvasmaid::convert::{Direction, FlowchartEngine};
use canvasmaid::ingest::{ingest, PathFile};
use canvasmaid::mcp::CanvasmaidMcp;
use canvasmaid::session::{shared, RegenerationController};

#[derive(Debug, Parser)]
#[command(name = "canvasmaid", version, about = "Convert JSON Canvas files to Mermaid flowcharts")]
struct Cli {
    /// `.canvas` file to load on startup.
    file: Option<PathBuf>,

    /// Override a color group, e.g. `-c 1=#ff0000` (repeatable).
    #[arg(short = 'c', long = "color", value_name = "N=#HEX")]
    colors: Vec<ColorOverride>,

    /// Flowchart direction (TB, LR, RL or BT).
    #[arg(short, long, default_value = "TB")]
    direction: Direction,

    /// Convert FILE once and print the Mermaid source to stdout.
    #[arg(long, requires = "file", conflicts_with_all = ["mcp", "mcp_http_port"])]
    print: bool,

    /// Serve MCP over stdio instead of running the TUI.
    #[arg(long, conflicts_with = "mcp_http_port")]
    mcp: bool,

    /// Also serve MCP over streamable HTTP on this port while the TUI runs (0 = ephemeral).
    #[arg(long, value_name = "PORT")]
    mcp_http_port: Option<u16>,

    /// Debug logging on stderr in headless modes (overrides CANVASMAID_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Print(PathBuf),
    McpStdio,
    Tui { mcp_http_port: Option<u16> },
}

impl Cli {
    fn mode(&self) -> Mode {
        match (&self.file, self.print, self.mcp) {
            (Some(file), true, _) => Mode::Print(file.clone()),
            (_, _, true) => Mode::McpStdio,
            _ => Mode::Tui { mcp_http_port: self.mcp_http_port },
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("canvasmaid: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let palette = config::palette_from_env(&cli.colors)?;
    let mut controller =
        RegenerationController::with_palette(FlowchartEngine::new(cli.direction), palette);

    match cli.mode() {
        Mode::Print(path) => {
            init_logging(cli.verbose);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

            let document = runtime.block_on(ingest(&PathFile::new(path)))?;
            controller.load_document(document)?;
            let diagram = controller.diagram().ok_or("no diagram generated")?;

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(diagram.as_str().as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Mode::McpStdio => {
            init_logging(cli.verbose);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

            if let Some(path) = cli.file {
                let document = runtime.block_on(ingest(&PathFile::new(path)))?;
                controller.load_document(document)?;
            }
            runtime.block_on(CanvasmaidMcp::new(controller).serve_stdio())?;
            Ok(())
        }
        Mode::Tui { mcp_http_port } => {
            let controller = shared(controller);
            let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

            let server = match mcp_http_port {
                Some(port) => {
                    let mcp = CanvasmaidMcp::with_shared(controller.clone());
                    let config = StreamableHttpServerConfig {
                        stateful_mode: true,
                        ..StreamableHttpServerConfig::default()
                    };
                    let shutdown_token = config.cancellation_token.clone();
                    let server_handle = runtime.block_on(spawn_http_server(mcp, port, config))?;
                    Some((shutdown_token, server_handle))
                }
                None => None,
            };

            let tui_result = canvasmaid::tui::run(controller, runtime.handle().clone(), cli.file)
                .map_err(|err| err.to_string());

            if let Some((shutdown_token, server_handle)) = server {
                shutdown_token.cancel();
                let _ = runtime.block_on(server_handle);
            }

            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })
        }
    }
}

async fn spawn_http_server(
    mcp: CanvasmaidMcp,
    port: u16,
    config: StreamableHttpServerConfig,
) -> Result<tokio::task::JoinHandle<()>, Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let server_shutdown = config.cancellation_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

    let router = Router::new().nest_service("/mcp", mcp_service);
    let server_handle = tokio::spawn(async move {
        let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
            server_shutdown.cancelled().await;
        });
        if let Err(err) = serve.await {
            // The TUI owns the terminal while this task runs.
            tracing::warn!(%err, "MCP HTTP server error");
        }
    });

    Ok(server_handle)
}
