//! Identifier types shared by requests and responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a player session.
///
/// Allocated by the runtime from a counter starting at 1 and never reused for
/// the lifetime of the process. The decimal form doubles as the suffix of the
/// per-player event and control channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<i64> for PlayerId {
	fn from(value: i64) -> Self {
		Self(value)
	}
}

/// Identifiers returned for a render-surface-backed player.
///
/// `texture_id` is owned by the platform texture registry and passed through
/// unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturePlayerIds {
	pub player_id: PlayerId,
	pub texture_id: i64,
}
