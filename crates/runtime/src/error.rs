//! Error types for the player runtime.

use std::fmt;

use thiserror::Error;
use vp_protocol::{ApiResponse, PlayerId};

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Failures reported by platform collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
	#[error("surface allocation failed: {0}")]
	SurfaceAllocation(String),

	#[error("player construction failed: {0}")]
	PlayerConstruction(String),

	#[error("channel binding failed: {0}")]
	Channel(String),

	#[error("release failed: {0}")]
	Release(String),

	/// The platform cannot play this source at all; retrying will not help.
	#[error("unsupported: {0}")]
	Unsupported(String),
}

impl PlatformError {
	/// Whether a fresh attempt may succeed where this one failed.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::SurfaceAllocation(_) | Self::PlayerConstruction(_) | Self::Channel(_))
	}
}

/// Extra context appended to an unknown-player message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownPlayerHint {
	/// Other players are registered; only this id is missing.
	Missing,
	/// The registry is empty, typically after a reset.
	RegistryEmpty,
}

impl fmt::Display for UnknownPlayerHint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Missing => Ok(()),
			Self::RegistryEmpty => f.write_str(" and no active players created by the plugin"),
		}
	}
}

/// Errors surfaced to the API dispatcher.
#[derive(Debug, Error)]
pub enum PlayerError {
	#[error("no player found with id <{id}>{hint}")]
	UnknownPlayer { id: PlayerId, hint: UnknownPlayerHint },

	/// Ids are allocated monotonically, so this is a programming error.
	#[error("player id {0} is already registered")]
	DuplicateId(PlayerId),

	#[error("player initialization failed after {attempts} attempt(s): {source}")]
	ResourceAcquisition {
		attempts: u32,
		#[source]
		source: PlatformError,
	},

	#[error(transparent)]
	Platform(#[from] PlatformError),
}

impl PlayerError {
	/// Builds the lookup-miss error for `id`.
	pub fn unknown(id: PlayerId, registry_empty: bool) -> Self {
		let hint = if registry_empty {
			UnknownPlayerHint::RegistryEmpty
		} else {
			UnknownPlayerHint::Missing
		};
		Self::UnknownPlayer { id, hint }
	}

	/// Stable code a dispatcher reports alongside the message.
	pub fn code(&self) -> &'static str {
		match self {
			Self::UnknownPlayer { .. } => "unknown_player",
			Self::DuplicateId(_) => "duplicate_player_id",
			Self::ResourceAcquisition { .. } => "resource_acquisition",
			Self::Platform(_) => "platform",
		}
	}
}

impl From<PlayerError> for ApiResponse {
	fn from(err: PlayerError) -> Self {
		Self::Error {
			code: err.code().to_string(),
			message: err.to_string(),
		}
	}
}
