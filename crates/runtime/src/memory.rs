//! In-memory platform for running the plugin without a device.
//!
//! Every collaborator trait is backed by one shared state. The controller
//! injects failures and inspects what the runtime acquired and released.
//!
//! # Example
//!
//! ```ignore
//! let (binding, controller) = MemoryPlatformBuilder::new().surface_failures(2).build();
//! let plugin = VideoPlayerPlugin::attach(binding, PluginConfig::default())?;
//!
//! let ids = plugin.create_for_texture_view(CreationOptions::new("https://host/a.mp4")).await?;
//! assert_eq!(controller.live_surfaces(), 1);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::asset::VideoAsset;
use crate::config::VideoPlayerOptions;
use crate::error::PlatformError;
use crate::platform::{
	AssetKeyResolver, EventSink, Messenger, PlatformViewRegistry, PlayerFactory, PluginBinding, SurfaceProducer, TextureRegistry, VideoPlayer,
};
use crate::registry::PlayerLookup;

/// A surface handed out by the memory texture registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRecord {
	pub id: i64,
	pub released: bool,
}

/// A player built by the memory player factory.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
	pub asset: VideoAsset,
	pub options: VideoPlayerOptions,
	pub texture_id: Option<i64>,
	pub disposed: bool,
}

#[derive(Default)]
struct MemoryState {
	next_texture_id: i64,
	surface_failures: u32,
	build_failures: u32,
	reject_rtsp: bool,
	fail_player_disposal: bool,
	fail_handler_install: bool,
	fail_handler_teardown: bool,
	surfaces: Vec<SurfaceRecord>,
	players: Vec<PlayerRecord>,
	handlers: BTreeSet<String>,
	events: Vec<(String, Value)>,
	views: HashMap<String, PlayerLookup>,
}

type SharedState = Arc<Mutex<MemoryState>>;

/// Builder for an in-memory [`PluginBinding`].
#[derive(Debug, Default)]
pub struct MemoryPlatformBuilder {
	surface_failures: u32,
	build_failures: u32,
	reject_rtsp: bool,
}

impl MemoryPlatformBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fails the next `count` surface allocations.
	pub fn surface_failures(mut self, count: u32) -> Self {
		self.surface_failures = count;
		self
	}

	/// Fails the next `count` player constructions.
	pub fn build_failures(mut self, count: u32) -> Self {
		self.build_failures = count;
		self
	}

	/// Makes the player factory refuse RTSP sources as unsupported.
	pub fn reject_rtsp(mut self) -> Self {
		self.reject_rtsp = true;
		self
	}

	pub fn build(self) -> (PluginBinding, MemoryPlatformController) {
		let state: SharedState = Arc::new(Mutex::new(MemoryState {
			surface_failures: self.surface_failures,
			build_failures: self.build_failures,
			reject_rtsp: self.reject_rtsp,
			..Default::default()
		}));
		let platform = Arc::new(MemoryPlatform {
			state: Arc::clone(&state),
		});
		let binding = PluginBinding {
			messenger: platform.clone(),
			textures: platform.clone(),
			players: platform.clone(),
			assets: platform.clone(),
			views: platform,
		};
		(binding, MemoryPlatformController { state })
	}
}

/// Failure injection and inspection for a memory platform.
#[derive(Clone)]
pub struct MemoryPlatformController {
	state: SharedState,
}

impl MemoryPlatformController {
	pub fn fail_next_surface_allocations(&self, count: u32) {
		self.state.lock().surface_failures = count;
	}

	pub fn fail_next_player_builds(&self, count: u32) {
		self.state.lock().build_failures = count;
	}

	pub fn set_fail_player_disposal(&self, fail: bool) {
		self.state.lock().fail_player_disposal = fail;
	}

	pub fn set_fail_handler_install(&self, fail: bool) {
		self.state.lock().fail_handler_install = fail;
	}

	pub fn set_fail_handler_teardown(&self, fail: bool) {
		self.state.lock().fail_handler_teardown = fail;
	}

	pub fn surfaces(&self) -> Vec<SurfaceRecord> {
		self.state.lock().surfaces.clone()
	}

	/// Surfaces handed out and not yet released.
	pub fn live_surfaces(&self) -> usize {
		self.state.lock().surfaces.iter().filter(|surface| !surface.released).count()
	}

	pub fn players(&self) -> Vec<PlayerRecord> {
		self.state.lock().players.clone()
	}

	/// Players built and not yet disposed.
	pub fn live_players(&self) -> usize {
		self.state.lock().players.iter().filter(|player| !player.disposed).count()
	}

	/// Instance names with an installed control handler, sorted.
	pub fn instance_handlers(&self) -> Vec<String> {
		self.state.lock().handlers.iter().cloned().collect()
	}

	/// Events emitted on the stream of `instance`, oldest first.
	pub fn events(&self, instance: &str) -> Vec<Value> {
		self.state
			.lock()
			.events
			.iter()
			.filter(|(name, _)| name == instance)
			.map(|(_, event)| event.clone())
			.collect()
	}

	/// Lookup registered for `view_type`, as a view factory would hold it.
	pub fn view_lookup(&self, view_type: &str) -> Option<PlayerLookup> {
		self.state.lock().views.get(view_type).cloned()
	}
}

struct MemoryPlatform {
	state: SharedState,
}

impl MemoryPlatform {
	fn build_player(&self, events: Arc<dyn EventSink>, asset: &VideoAsset, options: &VideoPlayerOptions, texture_id: Option<i64>) -> Result<Arc<dyn VideoPlayer>, PlatformError> {
		let mut state = self.state.lock();
		if state.reject_rtsp && matches!(asset, VideoAsset::Rtsp { .. }) {
			return Err(PlatformError::Unsupported(format!("rtsp source {}", asset.uri())));
		}
		if state.build_failures > 0 {
			state.build_failures -= 1;
			return Err(PlatformError::PlayerConstruction("decoder unavailable".into()));
		}

		let index = state.players.len();
		state.players.push(PlayerRecord {
			asset: asset.clone(),
			options: *options,
			texture_id,
			disposed: false,
		});
		drop(state);

		events.success(json!({ "event": "initialized" }));
		Ok(Arc::new(MemoryPlayer {
			index,
			events,
			state: Arc::clone(&self.state),
		}))
	}
}

impl TextureRegistry for MemoryPlatform {
	fn create_surface_producer(&self) -> Result<Arc<dyn SurfaceProducer>, PlatformError> {
		let mut state = self.state.lock();
		if state.surface_failures > 0 {
			state.surface_failures -= 1;
			return Err(PlatformError::SurfaceAllocation("no buffer available".into()));
		}
		let id = state.next_texture_id;
		state.next_texture_id += 1;
		state.surfaces.push(SurfaceRecord { id, released: false });
		Ok(Arc::new(MemorySurface {
			id,
			state: Arc::clone(&self.state),
		}))
	}
}

impl Messenger for MemoryPlatform {
	fn event_sink(&self, instance: &str) -> Result<Arc<dyn EventSink>, PlatformError> {
		Ok(Arc::new(MemoryEventSink {
			instance: instance.to_string(),
			state: Arc::clone(&self.state),
		}))
	}

	fn set_instance_handler(&self, instance: &str, player: Option<Arc<dyn VideoPlayer>>) -> Result<(), PlatformError> {
		let mut state = self.state.lock();
		match player {
			Some(_) if state.fail_handler_install => Err(PlatformError::Channel(format!("cannot bind {instance}"))),
			Some(_) => {
				state.handlers.insert(instance.to_string());
				Ok(())
			}
			None if state.fail_handler_teardown => Err(PlatformError::Channel(format!("cannot unbind {instance}"))),
			None => {
				state.handlers.remove(instance);
				Ok(())
			}
		}
	}
}

impl PlayerFactory for MemoryPlatform {
	fn create_platform_view_player(&self, events: Arc<dyn EventSink>, asset: &VideoAsset, options: &VideoPlayerOptions) -> Result<Arc<dyn VideoPlayer>, PlatformError> {
		self.build_player(events, asset, options, None)
	}

	fn create_texture_player(
		&self,
		events: Arc<dyn EventSink>,
		surface: Arc<dyn SurfaceProducer>,
		asset: &VideoAsset,
		options: &VideoPlayerOptions,
	) -> Result<Arc<dyn VideoPlayer>, PlatformError> {
		self.build_player(events, asset, options, Some(surface.id()))
	}
}

impl AssetKeyResolver for MemoryPlatform {
	fn key_for_asset(&self, asset: &str) -> String {
		format!("assets/{asset}")
	}

	fn key_for_asset_and_package(&self, asset: &str, package_name: &str) -> String {
		format!("assets/packages/{package_name}/{asset}")
	}
}

impl PlatformViewRegistry for MemoryPlatform {
	fn register_view_factory(&self, view_type: &str, lookup: PlayerLookup) -> Result<(), PlatformError> {
		self.state.lock().views.insert(view_type.to_string(), lookup);
		Ok(())
	}
}

struct MemorySurface {
	id: i64,
	state: SharedState,
}

impl SurfaceProducer for MemorySurface {
	fn id(&self) -> i64 {
		self.id
	}

	fn release(&self) -> Result<(), PlatformError> {
		let mut state = self.state.lock();
		let record = state
			.surfaces
			.iter_mut()
			.find(|surface| surface.id == self.id)
			.ok_or_else(|| PlatformError::Release(format!("unknown surface {}", self.id)))?;
		if record.released {
			return Err(PlatformError::Release(format!("surface {} released twice", self.id)));
		}
		record.released = true;
		Ok(())
	}
}

struct MemoryPlayer {
	index: usize,
	events: Arc<dyn EventSink>,
	state: SharedState,
}

impl VideoPlayer for MemoryPlayer {
	fn dispose(&self) -> Result<(), PlatformError> {
		let mut state = self.state.lock();
		if state.fail_player_disposal {
			drop(state);
			self.events.error("dispose_failed", "decoder refused to stop", None);
			return Err(PlatformError::Release("decoder refused to stop".into()));
		}
		state.players[self.index].disposed = true;
		drop(state);
		self.events.end_of_stream();
		Ok(())
	}
}

struct MemoryEventSink {
	instance: String,
	state: SharedState,
}

impl MemoryEventSink {
	fn push(&self, event: Value) {
		self.state.lock().events.push((self.instance.clone(), event));
	}
}

impl EventSink for MemoryEventSink {
	fn success(&self, event: Value) {
		self.push(event);
	}

	fn error(&self, code: &str, message: &str, details: Option<Value>) {
		self.push(json!({ "error": code, "message": message, "details": details }));
	}

	fn end_of_stream(&self) {
		self.push(json!({ "event": "endOfStream" }));
	}
}
