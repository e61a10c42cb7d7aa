//! Disposal of one or all registered players.

use tracing::{debug, info};
use vp_protocol::PlayerId;

use crate::error::Result;
use crate::registry::PlayerRegistry;

impl PlayerRegistry {
	/// Disposes the player registered under `id`, then removes it.
	///
	/// If the player itself fails to release, the error is returned and the
	/// session stays registered so it can still be inspected. A failing
	/// dispose handler is logged and does not prevent removal.
	pub fn dispose(&self, id: PlayerId) -> Result<()> {
		let session = self.get(id)?;
		session.dispose()?;
		self.remove(id);
		debug!(target = "vp.registry", player_id = %id, "player disposed");
		Ok(())
	}

	/// Disposes every registered player and empties the registry, even when
	/// individual disposals fail. Surfaces and dispose handlers of players
	/// that fail to stop are still released. Returns how many players were
	/// torn down.
	pub fn dispose_all(&self) -> usize {
		let sessions = self.all();
		let count = sessions.len();
		for session in sessions {
			session.teardown();
		}
		self.clear();
		if count > 0 {
			info!(target = "vp.registry", count, "disposed all players");
		}
		count
	}
}
