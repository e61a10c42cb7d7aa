//! Host-facing API surface.

use async_trait::async_trait;
use vp_protocol::{CreationOptions, PlayerId, TexturePlayerIds};

use crate::error::Result;

/// Operations a host dispatcher forwards to the plugin.
#[async_trait]
pub trait VideoPlayerApi: Send + Sync {
	/// Disposes every existing player. Used to recover after a host reset.
	async fn initialize(&self) -> Result<()>;

	/// Creates a player rendered by a native platform view.
	async fn create_for_platform_view(&self, options: CreationOptions) -> Result<PlayerId>;

	/// Creates a player drawing into a texture; retries surface allocation.
	async fn create_for_texture_view(&self, options: CreationOptions) -> Result<TexturePlayerIds>;

	async fn dispose(&self, player_id: PlayerId) -> Result<()>;

	/// Applies to players created after this call only.
	async fn set_mix_with_others(&self, mix_with_others: bool) -> Result<()>;

	async fn lookup_key_for_asset(&self, asset: &str, package_name: Option<&str>) -> Result<String>;
}
