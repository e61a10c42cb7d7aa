//! Platform collaborators the runtime drives but does not implement.
//!
//! A host supplies these through a [`PluginBinding`] when attaching the
//! plugin. The runtime only acquires, hands over, and releases what they
//! produce; decoding, rendering, and event delivery happen behind them.

use std::sync::Arc;

use serde_json::Value;

use crate::asset::VideoAsset;
use crate::config::VideoPlayerOptions;
use crate::error::PlatformError;
use crate::registry::PlayerLookup;

/// A rendering target a player draws frames into.
pub trait SurfaceProducer: Send + Sync {
	/// Texture id reported back to the caller.
	fn id(&self) -> i64;

	/// Returns the surface to the platform. Must be called for every surface
	/// that does not end up owned by a registered player.
	fn release(&self) -> Result<(), PlatformError>;
}

/// Allocator for [`SurfaceProducer`]s.
pub trait TextureRegistry: Send + Sync {
	fn create_surface_producer(&self) -> Result<Arc<dyn SurfaceProducer>, PlatformError>;
}

/// Per-player event stream. Payloads are opaque to the runtime.
pub trait EventSink: Send + Sync {
	fn success(&self, event: Value);
	fn error(&self, code: &str, message: &str, details: Option<Value>);
	fn end_of_stream(&self);
}

/// Playback resource backing one session.
pub trait VideoPlayer: Send + Sync {
	/// Stops playback and frees decoder resources.
	fn dispose(&self) -> Result<(), PlatformError>;
}

/// Message channel binding keyed by instance name (the player id string).
pub trait Messenger: Send + Sync {
	/// Opens the event stream for `instance`.
	fn event_sink(&self, instance: &str) -> Result<Arc<dyn EventSink>, PlatformError>;

	/// Installs the control handler for `instance`, or removes it when `player` is `None`.
	fn set_instance_handler(&self, instance: &str, player: Option<Arc<dyn VideoPlayer>>) -> Result<(), PlatformError>;
}

/// Builds playback resources for classified assets.
pub trait PlayerFactory: Send + Sync {
	fn create_platform_view_player(&self, events: Arc<dyn EventSink>, asset: &VideoAsset, options: &VideoPlayerOptions) -> Result<Arc<dyn VideoPlayer>, PlatformError>;

	fn create_texture_player(
		&self,
		events: Arc<dyn EventSink>,
		surface: Arc<dyn SurfaceProducer>,
		asset: &VideoAsset,
		options: &VideoPlayerOptions,
	) -> Result<Arc<dyn VideoPlayer>, PlatformError>;
}

/// Resolves bundled asset paths to platform lookup keys.
pub trait AssetKeyResolver: Send + Sync {
	fn key_for_asset(&self, asset: &str) -> String;
	fn key_for_asset_and_package(&self, asset: &str, package_name: &str) -> String;
}

/// Registry of native view factories.
pub trait PlatformViewRegistry: Send + Sync {
	fn register_view_factory(&self, view_type: &str, lookup: PlayerLookup) -> Result<(), PlatformError>;
}

/// Collaborators handed to the plugin for one attachment.
#[derive(Clone)]
pub struct PluginBinding {
	pub messenger: Arc<dyn Messenger>,
	pub textures: Arc<dyn TextureRegistry>,
	pub players: Arc<dyn PlayerFactory>,
	pub assets: Arc<dyn AssetKeyResolver>,
	pub views: Arc<dyn PlatformViewRegistry>,
}
