//! Player registry: id allocation and the id-to-session mapping.
//!
//! Ids come from a counter starting at 1 and are never reused, so a stale id
//! held by a caller can never address a newer player. The counter and the map
//! share one lock; it is never held while calling into a player.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use vp_protocol::PlayerId;

use crate::error::{PlayerError, Result};
use crate::session::PlayerSession;

const FIRST_PLAYER_ID: i64 = 1;

struct RegistryState {
	next_id: i64,
	players: HashMap<PlayerId, Arc<PlayerSession>>,
}

/// Owned mapping from [`PlayerId`] to live [`PlayerSession`]s.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct PlayerRegistry {
	state: Arc<Mutex<RegistryState>>,
}

impl Default for PlayerRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl PlayerRegistry {
	pub fn new() -> Self {
		Self {
			state: Arc::new(Mutex::new(RegistryState {
				next_id: FIRST_PLAYER_ID,
				players: HashMap::new(),
			})),
		}
	}

	/// Returns an id strictly greater than every id handed out before.
	pub fn allocate_id(&self) -> PlayerId {
		let mut state = self.state.lock();
		let id = PlayerId(state.next_id);
		state.next_id += 1;
		id
	}

	/// Inserts `session` under its own id.
	pub fn register(&self, session: PlayerSession) -> Result<Arc<PlayerSession>> {
		let id = session.id();
		let mut state = self.state.lock();
		if state.players.contains_key(&id) {
			return Err(PlayerError::DuplicateId(id));
		}
		let session = Arc::new(session);
		state.players.insert(id, Arc::clone(&session));
		debug!(target = "vp.registry", player_id = %id, live = state.players.len(), "player registered");
		Ok(session)
	}

	pub fn get(&self, id: PlayerId) -> Result<Arc<PlayerSession>> {
		let state = self.state.lock();
		state
			.players
			.get(&id)
			.cloned()
			.ok_or_else(|| PlayerError::unknown(id, state.players.is_empty()))
	}

	/// Removes `id` if present.
	pub fn remove(&self, id: PlayerId) {
		if self.state.lock().players.remove(&id).is_some() {
			debug!(target = "vp.registry", player_id = %id, "player removed");
		}
	}

	/// Snapshot of the sessions registered right now, in id order.
	///
	/// The returned list is detached from the registry, so disposing its
	/// entries while iterating is safe.
	pub fn all(&self) -> Vec<Arc<PlayerSession>> {
		let mut sessions: Vec<_> = self.state.lock().players.values().cloned().collect();
		sessions.sort_by_key(|session| session.id());
		sessions
	}

	pub fn len(&self) -> usize {
		self.state.lock().players.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub(crate) fn clear(&self) {
		self.state.lock().players.clear();
	}

	/// Read-only view handed to platform view factories.
	pub fn lookup(&self) -> PlayerLookup {
		PlayerLookup { registry: self.clone() }
	}
}

/// Read-only access to registered players by id.
#[derive(Clone)]
pub struct PlayerLookup {
	registry: PlayerRegistry,
}

impl PlayerLookup {
	pub fn get(&self, id: PlayerId) -> Result<Arc<PlayerSession>> {
		self.registry.get(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::{PlatformError, UnknownPlayerHint};
	use crate::platform::VideoPlayer;

	struct NoopPlayer;

	impl VideoPlayer for NoopPlayer {
		fn dispose(&self) -> std::result::Result<(), PlatformError> {
			Ok(())
		}
	}

	fn session(id: PlayerId) -> PlayerSession {
		PlayerSession::new(id, Arc::new(NoopPlayer), None)
	}

	#[test]
	fn ids_start_at_one_and_increase() {
		let registry = PlayerRegistry::new();
		let ids: Vec<_> = (0..5).map(|_| registry.allocate_id()).collect();
		assert_eq!(ids, [1, 2, 3, 4, 5].map(PlayerId));
	}

	#[test]
	fn ids_are_not_reused_after_removal() {
		let registry = PlayerRegistry::new();
		let first = registry.allocate_id();
		registry.register(session(first)).unwrap();
		registry.remove(first);
		assert!(registry.allocate_id() > first);
	}

	#[test]
	fn duplicate_registration_is_rejected() {
		let registry = PlayerRegistry::new();
		let id = registry.allocate_id();
		registry.register(session(id)).unwrap();
		let err = registry.register(session(id)).unwrap_err();
		assert!(matches!(err, PlayerError::DuplicateId(dup) if dup == id));
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn lookup_miss_reports_whether_registry_is_empty() {
		let registry = PlayerRegistry::new();
		let err = registry.get(PlayerId(9)).unwrap_err();
		assert!(matches!(
			err,
			PlayerError::UnknownPlayer {
				hint: UnknownPlayerHint::RegistryEmpty,
				..
			}
		));

		let id = registry.allocate_id();
		registry.register(session(id)).unwrap();
		let err = registry.get(PlayerId(9)).unwrap_err();
		assert!(matches!(
			err,
			PlayerError::UnknownPlayer {
				hint: UnknownPlayerHint::Missing,
				..
			}
		));
	}

	#[test]
	fn remove_is_idempotent() {
		let registry = PlayerRegistry::new();
		let id = registry.allocate_id();
		registry.register(session(id)).unwrap();
		registry.remove(id);
		registry.remove(id);
		assert!(registry.is_empty());
	}

	#[test]
	fn snapshot_is_detached_from_later_mutation() {
		let registry = PlayerRegistry::new();
		for _ in 0..3 {
			let id = registry.allocate_id();
			registry.register(session(id)).unwrap();
		}
		let snapshot = registry.all();
		for entry in &snapshot {
			registry.remove(entry.id());
		}
		assert_eq!(snapshot.len(), 3);
		assert!(registry.is_empty());
	}

	#[test]
	fn lookup_sees_later_registrations() {
		let registry = PlayerRegistry::new();
		let lookup = registry.lookup();
		let id = registry.allocate_id();
		assert!(lookup.get(id).is_err());
		registry.register(session(id)).unwrap();
		assert_eq!(lookup.get(id).unwrap().id(), id);
	}
}
