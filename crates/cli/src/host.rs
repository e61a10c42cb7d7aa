//! Request loop over the in-memory platform.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use vp_runtime::memory::MemoryPlatformBuilder;
use vp_runtime::{PluginConfig, VideoPlayerPlugin};

use crate::cli::Cli;
use crate::dispatch::dispatch_line;

/// Loads plugin configuration, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> Result<PluginConfig> {
	let Some(path) = path else {
		return Ok(PluginConfig::default());
	};
	let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
	serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

/// Attaches the plugin, answers every request line, then detaches.
pub async fn run(cli: Cli) -> Result<()> {
	let config = load_config(cli.config.as_deref())?;

	let mut builder = MemoryPlatformBuilder::new()
		.surface_failures(cli.surface_failures)
		.build_failures(cli.build_failures);
	if cli.reject_rtsp {
		builder = builder.reject_rtsp();
	}
	let (binding, controller) = builder.build();
	let plugin = VideoPlayerPlugin::attach(binding, config).context("failed to attach plugin")?;

	let input: Box<dyn AsyncRead + Unpin + Send> = match &cli.script {
		Some(path) => Box::new(
			tokio::fs::File::open(path)
				.await
				.with_context(|| format!("failed to open script {}", path.display()))?,
		),
		None => Box::new(tokio::io::stdin()),
	};

	let mut lines = BufReader::new(input).lines();
	let mut stdout = tokio::io::stdout();
	let mut handled = 0usize;

	while let Some(line) = lines.next_line().await.context("failed to read request")? {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		let response = dispatch_line(&plugin, line).await;
		let mut encoded = serde_json::to_string(&response).context("failed to encode response")?;
		encoded.push('\n');
		stdout.write_all(encoded.as_bytes()).await.context("failed to write response")?;
		handled += 1;
	}
	stdout.flush().await.context("failed to flush responses")?;

	debug!(target = "vp", handled, "input exhausted");
	plugin.detach();

	let live_surfaces = controller.live_surfaces();
	let live_players = controller.live_players();
	if live_surfaces > 0 || live_players > 0 {
		warn!(target = "vp", live_surfaces, live_players, "resources outlived the plugin");
	} else {
		info!(target = "vp", handled, "host finished");
	}
	Ok(())
}
