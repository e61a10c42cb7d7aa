use clap::Parser;
use tracing::error;
use vp_cli::{cli::Cli, host, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = host::run(cli).await {
		let message = format!("{err:#}");
		error!(target = "vp", error = %message, "host failed");
		std::process::exit(1);
	}
}
