//! Plugin lifecycle and creation pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};
use vp_protocol::{CreationOptions, PlayerId, TexturePlayerIds};

use crate::api::VideoPlayerApi;
use crate::asset::VideoAsset;
use crate::config::{PluginConfig, VideoPlayerOptions};
use crate::error::Result;
use crate::platform::{PluginBinding, SurfaceProducer, VideoPlayer};
use crate::registry::PlayerRegistry;
use crate::retry::create_with_retry;
use crate::session::PlayerSession;

/// View type under which the platform-view factory is registered.
pub const PLATFORM_VIEW_TYPE: &str = "vp.dev/video_player_view";

/// The video player plugin for one attachment to a host.
///
/// Owns the player registry and shared options. Every player still registered
/// when the plugin is detached or dropped is disposed.
pub struct VideoPlayerPlugin {
	binding: PluginBinding,
	config: PluginConfig,
	registry: PlayerRegistry,
	shared_options: RwLock<VideoPlayerOptions>,
}

impl VideoPlayerPlugin {
	/// Attaches to the host: registers the platform-view factory and starts
	/// with an empty registry.
	pub fn attach(binding: PluginBinding, config: PluginConfig) -> Result<Self> {
		let registry = PlayerRegistry::new();
		binding.views.register_view_factory(PLATFORM_VIEW_TYPE, registry.lookup())?;
		info!(
			target = "vp.plugin",
			max_attempts = config.retry.attempts(),
			base_delay_ms = config.retry.base_delay_ms,
			worst_case_delay_ms = u64::try_from(config.retry.worst_case_delay().as_millis()).unwrap_or(u64::MAX),
			"plugin attached"
		);
		Ok(Self {
			binding,
			config,
			registry,
			shared_options: RwLock::new(VideoPlayerOptions::default()),
		})
	}

	/// Detaches from the host, disposing every player.
	pub fn detach(self) {
		info!(target = "vp.plugin", live = self.registry.len(), "plugin detaching");
	}

	/// Looks up a live player session.
	pub fn player(&self, id: PlayerId) -> Result<Arc<PlayerSession>> {
		self.registry.get(id)
	}

	pub fn player_count(&self) -> usize {
		self.registry.len()
	}

	pub fn shared_options(&self) -> VideoPlayerOptions {
		*self.shared_options.read()
	}

	/// Binds the instance channel for a freshly built player and records it.
	///
	/// On failure the player and surface are released here, so a broken
	/// session is never left behind.
	fn register_player_instance(&self, id: PlayerId, player: Arc<dyn VideoPlayer>, surface: Option<Arc<dyn SurfaceProducer>>) -> Result<()> {
		let instance = id.to_string();
		let messenger = Arc::clone(&self.binding.messenger);

		if let Err(err) = messenger.set_instance_handler(&instance, Some(Arc::clone(&player))) {
			discard_unregistered(id, &player, surface.as_deref());
			return Err(err.into());
		}

		let session = PlayerSession::new(id, Arc::clone(&player), surface.clone())
			.with_dispose_handler(Box::new(move || messenger.set_instance_handler(&instance, None)));

		if let Err(err) = self.registry.register(session) {
			// Ids come from a monotonic counter; reaching this is a bug.
			error!(target = "vp.plugin", player_id = %id, error = %err, "player id collision");
			discard_unregistered(id, &player, surface.as_deref());
			return Err(err);
		}
		Ok(())
	}
}

impl Drop for VideoPlayerPlugin {
	fn drop(&mut self) {
		self.registry.dispose_all();
	}
}

#[async_trait]
impl VideoPlayerApi for VideoPlayerPlugin {
	async fn initialize(&self) -> Result<()> {
		let disposed = self.registry.dispose_all();
		debug!(target = "vp.plugin", disposed, "initialized");
		Ok(())
	}

	async fn create_for_platform_view(&self, options: CreationOptions) -> Result<PlayerId> {
		let asset = VideoAsset::from(&options);
		let id = self.registry.allocate_id();
		let instance = id.to_string();
		let shared = self.shared_options();

		let events = self.binding.messenger.event_sink(&instance)?;
		let player = self.binding.players.create_platform_view_player(events, &asset, &shared)?;
		self.register_player_instance(id, player, None)?;

		debug!(target = "vp.plugin", player_id = %id, uri = asset.uri(), "platform view player created");
		Ok(id)
	}

	async fn create_for_texture_view(&self, options: CreationOptions) -> Result<TexturePlayerIds> {
		let asset = VideoAsset::from(&options);
		let id = self.registry.allocate_id();
		let instance = id.to_string();
		let shared = self.shared_options();
		let PluginBinding {
			messenger,
			textures,
			players,
			..
		} = &self.binding;

		let (surface, player) = create_with_retry(
			&self.config.retry,
			|| textures.create_surface_producer(),
			|surface| {
				let events = messenger.event_sink(&instance)?;
				players.create_texture_player(events, Arc::clone(surface), &asset, &shared)
			},
		)
		.await?;

		let texture_id = surface.id();
		self.register_player_instance(id, player, Some(surface))?;

		debug!(target = "vp.plugin", player_id = %id, texture_id, uri = asset.uri(), "texture player created");
		Ok(TexturePlayerIds { player_id: id, texture_id })
	}

	async fn dispose(&self, player_id: PlayerId) -> Result<()> {
		self.registry.dispose(player_id)
	}

	async fn set_mix_with_others(&self, mix_with_others: bool) -> Result<()> {
		self.shared_options.write().mix_with_others = mix_with_others;
		Ok(())
	}

	async fn lookup_key_for_asset(&self, asset: &str, package_name: Option<&str>) -> Result<String> {
		let assets = &self.binding.assets;
		Ok(match package_name {
			Some(package_name) => assets.key_for_asset_and_package(asset, package_name),
			None => assets.key_for_asset(asset),
		})
	}
}

fn discard_unregistered(id: PlayerId, player: &Arc<dyn VideoPlayer>, surface: Option<&dyn SurfaceProducer>) {
	if let Err(err) = player.dispose() {
		warn!(target = "vp.plugin", player_id = %id, error = %err, "failed to dispose unregistered player");
	}
	if let Some(surface) = surface {
		if let Err(err) = surface.release() {
			warn!(target = "vp.plugin", player_id = %id, error = %err, "failed to release surface of unregistered player");
		}
	}
}
