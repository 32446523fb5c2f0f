use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

mod handlers;

use crate::handlers::ping_handler;

/// Serves the editor page, the wasm bundle and the item images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding index.html, pkg/ and img/.
    #[arg(long)]
    public_dir: Option<PathBuf>,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn app(public_dir: PathBuf) -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        // pkg/ is rebuilt in place.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    if !public_dir.join("index.html").is_file() {
        tracing::warn!(dir = %public_dir.display(), "index.html not found in public dir");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(port = args.port, dir = %public_dir.display(), "Editor running at http://localhost:{}", args.port);

    axum::serve(listener, app(public_dir))
        .await
        .context("server stopped unexpectedly")?;
    Ok(())
}
