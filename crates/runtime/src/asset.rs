//! Classification of creation options into typed media sources.

use std::collections::HashMap;

use vp_protocol::{CreationOptions, PlatformVideoFormat};

const ASSET_SCHEME: &str = "asset:";
const RTSP_SCHEME: &str = "rtsp:";

/// Adaptive streaming protocol of a remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamingFormat {
	#[default]
	Unknown,
	Smooth,
	DynamicAdaptive,
	HttpLive,
}

impl From<Option<PlatformVideoFormat>> for StreamingFormat {
	fn from(hint: Option<PlatformVideoFormat>) -> Self {
		match hint {
			Some(PlatformVideoFormat::Ss) => Self::Smooth,
			Some(PlatformVideoFormat::Dash) => Self::DynamicAdaptive,
			Some(PlatformVideoFormat::Hls) => Self::HttpLive,
			Some(PlatformVideoFormat::Unrecognized) | None => Self::Unknown,
		}
	}
}

/// Immutable description of where a player reads its media from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoAsset {
	/// Bundled asset, addressed by its `asset:` URL.
	Local { asset_url: String },
	/// Network source, possibly adaptive.
	Remote {
		url: String,
		streaming_format: StreamingFormat,
		http_headers: HashMap<String, String>,
		user_agent: Option<String>,
	},
	/// RTSP stream.
	Rtsp { url: String },
}

impl VideoAsset {
	/// Maps a source descriptor to an asset. Never fails.
	///
	/// The URI scheme decides the variant; the format hint, headers, and user
	/// agent only apply to remote sources.
	pub fn classify(uri: &str, format_hint: Option<PlatformVideoFormat>, http_headers: &HashMap<String, String>, user_agent: Option<&str>) -> Self {
		if uri.starts_with(ASSET_SCHEME) {
			Self::Local { asset_url: uri.to_string() }
		} else if uri.starts_with(RTSP_SCHEME) {
			Self::Rtsp { url: uri.to_string() }
		} else {
			Self::Remote {
				url: uri.to_string(),
				streaming_format: StreamingFormat::from(format_hint),
				http_headers: http_headers.clone(),
				user_agent: user_agent.map(str::to_string),
			}
		}
	}

	/// The URI this asset was classified from.
	pub fn uri(&self) -> &str {
		match self {
			Self::Local { asset_url } => asset_url,
			Self::Remote { url, .. } | Self::Rtsp { url } => url,
		}
	}
}

impl From<&CreationOptions> for VideoAsset {
	fn from(options: &CreationOptions) -> Self {
		Self::classify(&options.uri, options.format_hint, &options.http_headers, options.user_agent.as_deref())
	}
}
