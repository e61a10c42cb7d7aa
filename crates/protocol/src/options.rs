//! Player creation options.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Caller-supplied hint about a remote source's adaptive streaming protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformVideoFormat {
	/// MPEG-DASH.
	Dash,
	/// HTTP Live Streaming.
	Hls,
	/// Smooth Streaming.
	Ss,
	/// Any hint this build does not know about.
	#[serde(other)]
	Unrecognized,
}

/// Options describing the media source of a new player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationOptions {
	/// Source URI. `asset:` and `rtsp:` prefixes select non-remote sources.
	pub uri: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format_hint: Option<PlatformVideoFormat>,
	#[serde(default)]
	pub http_headers: HashMap<String, String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
}

impl CreationOptions {
	/// Creates options for `uri` with no hint, headers, or user agent.
	pub fn new(uri: impl Into<String>) -> Self {
		Self {
			uri: uri.into(),
			..Default::default()
		}
	}

	/// Sets the streaming format hint.
	pub fn with_format_hint(mut self, hint: PlatformVideoFormat) -> Self {
		self.format_hint = Some(hint);
		self
	}

	/// Adds one HTTP header sent with remote requests.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.http_headers.insert(name.into(), value.into());
		self
	}

	/// Overrides the user agent for remote requests.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}
}
