use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "vp")]
#[command(about = "Drive the video player plugin with line-delimited JSON requests")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Plugin configuration (JSON, e.g. {"retry":{"maxAttempts":5}})
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Read requests from a file instead of stdin
	#[arg(long, value_name = "FILE")]
	pub script: Option<PathBuf>,

	/// Fail the next N surface allocations
	#[arg(long, value_name = "N", default_value_t = 0)]
	pub surface_failures: u32,

	/// Fail the next N player constructions
	#[arg(long, value_name = "N", default_value_t = 0)]
	pub build_failures: u32,

	/// Refuse RTSP sources as unsupported
	#[arg(long)]
	pub reject_rtsp: bool,
}
