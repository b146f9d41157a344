mod alternation;
mod cli;
mod config;
mod error;
mod logging;
mod output;
mod query;
mod records;
mod responder;
mod server;
mod wire;

use clap::Parser;
use tracing::{error, warn};

use crate::cli::Cli;
use crate::responder::Responder;
use crate::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init(cli.log_level)?;

	let config = cli.into_config();
	output::log_config_summary(&config);

	let server = match Server::bind(Responder::new(config)).await {
		Ok(server) => server,
		Err(e) => {
			error!(error = %e, "Failed to start server");
			return Err(e.into());
		}
	};

	server.serve_until(shutdown_signal()).await?;
	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		// Without a signal handler, serve until killed
		warn!(error = %e, "Failed to listen for Ctrl-C");
		std::future::pending::<()>().await;
	}
}
