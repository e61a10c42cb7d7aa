//! Registered player sessions.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;
use vp_protocol::PlayerId;

use crate::error::{PlatformError, Result};
use crate::platform::{SurfaceProducer, VideoPlayer};

/// Teardown hook run once when a session is disposed.
pub type DisposeHandler = Box<dyn FnOnce() -> std::result::Result<(), PlatformError> + Send>;

/// One live player: its playback resource, an optional render surface, and
/// the hook that unbinds its side channels.
pub struct PlayerSession {
	id: PlayerId,
	player: Arc<dyn VideoPlayer>,
	surface: Option<Arc<dyn SurfaceProducer>>,
	dispose_handler: Mutex<Option<DisposeHandler>>,
}

impl PlayerSession {
	/// Wraps an already-constructed player. `surface` is `None` for
	/// platform-view-backed players.
	pub fn new(id: PlayerId, player: Arc<dyn VideoPlayer>, surface: Option<Arc<dyn SurfaceProducer>>) -> Self {
		Self {
			id,
			player,
			surface,
			dispose_handler: Mutex::new(None),
		}
	}

	/// Installs the teardown hook, replacing any previous one.
	pub fn with_dispose_handler(self, handler: DisposeHandler) -> Self {
		*self.dispose_handler.lock() = Some(handler);
		self
	}

	pub fn id(&self) -> PlayerId {
		self.id
	}

	/// Texture id of the render surface, if this player draws into one.
	pub fn texture_id(&self) -> Option<i64> {
		self.surface.as_ref().map(|surface| surface.id())
	}

	/// Releases the player, then its surface, then runs the teardown hook.
	///
	/// A player release failure is returned with the surface and hook left in
	/// place. Surface and hook failures are logged and swallowed.
	pub(crate) fn dispose(&self) -> Result<()> {
		self.player.dispose()?;
		self.release_attachments();
		Ok(())
	}

	/// Best-effort disposal for bulk teardown: the surface and hook are
	/// released even when the player refuses to stop.
	pub(crate) fn teardown(&self) {
		if let Err(err) = self.player.dispose() {
			warn!(target = "vp.registry", player_id = %self.id, error = %err, "player dispose failed during teardown");
		}
		self.release_attachments();
	}

	/// The hook is taken before it runs so it can never fire twice.
	fn release_attachments(&self) {
		if let Some(surface) = &self.surface {
			if let Err(err) = surface.release() {
				warn!(target = "vp.registry", player_id = %self.id, error = %err, "surface release failed during dispose");
			}
		}

		let handler = self.dispose_handler.lock().take();
		if let Some(handler) = handler {
			if let Err(err) = handler() {
				warn!(target = "vp.registry", player_id = %self.id, error = %err, "dispose handler failed");
			}
		}
	}
}

impl fmt::Debug for PlayerSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PlayerSession")
			.field("id", &self.id)
			.field("texture_id", &self.texture_id())
			.field("has_dispose_handler", &self.dispose_handler.lock().is_some())
			.finish()
	}
}
