pub mod routes;
pub mod session;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, process::Command, time::Duration};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = notefold_config::load(args.config.as_deref())?;
	init_tracing(&config)?;
	let frontend_dir = config.service.frontend_dir.clone();
	if !frontend_dir.is_dir() {
		return Err(eyre::eyre!(
			"frontend_dir {} does not exist; nothing to serve.",
			frontend_dir.display()
		));
	}
	if !frontend_dir.join("index.html").is_file() {
		return Err(eyre::eyre!("frontend_dir {} is missing index.html.", frontend_dir.display()));
	}
	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let open_browser = config.service.open_browser;
	let db_path = config.storage.sqlite.path.clone();
	let state = AppState::new(config).await?;
	let app = routes::router(state, &frontend_dir);

	let listener = TcpListener::bind(http_addr).await?;
	tracing::info!(%http_addr, db_path = %db_path.display(), "HTTP server listening.");
	if open_browser {
		spawn_browser_open(http_addr);
	}
	axum::serve(listener, app).await?;
	Ok(())
}

fn init_tracing(config: &notefold_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();
	Ok(())
}

/// Points the local default browser at the served frontend shortly after the
/// listener is up. Failures are logged and otherwise ignored; the server keeps
/// running headless.
fn spawn_browser_open(addr: SocketAddr) {
	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_millis(1_500)).await;

		let url = format!("http://{addr}");

		if let Err(err) = browser_command(&url).spawn() {
			tracing::warn!(error = %err, %url, "Failed to open the browser.");
		}
	});
}

fn browser_command(url: &str) -> Command {
	if cfg!(target_os = "macos") {
		let mut cmd = Command::new("open");

		cmd.arg(url);

		cmd
	} else if cfg!(target_os = "windows") {
		let mut cmd = Command::new("cmd");

		cmd.args(["/C", "start", "", url]);

		cmd
	} else {
		let mut cmd = Command::new("xdg-open");

		cmd.arg(url);

		cmd
	}
}
