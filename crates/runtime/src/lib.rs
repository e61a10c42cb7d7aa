//! Video player session lifecycle for host-embedded playback.
//!
//! The runtime sits between a host dispatcher that speaks in integer player
//! ids and the platform resources that actually decode and render media. It
//! covers:
//! - Classifying creation options into a [`VideoAsset`]
//! - Acquiring render surfaces with bounded linear backoff ([`create_with_retry`])
//! - Allocating ids and tracking live sessions ([`PlayerRegistry`])
//! - Disposing one or all sessions without leaking handles or channel bindings
//!
//! The platform side is abstracted behind the traits in [`platform`]; the
//! [`memory`] module provides an in-process implementation.

pub mod api;
pub mod asset;
pub mod config;
mod disposal;
pub mod error;
pub mod memory;
pub mod platform;
pub mod plugin;
pub mod registry;
pub mod retry;
pub mod session;

pub use api::VideoPlayerApi;
pub use asset::{StreamingFormat, VideoAsset};
pub use config::{PluginConfig, RetryPolicy, VideoPlayerOptions};
pub use error::{PlatformError, PlayerError, Result, UnknownPlayerHint};
pub use platform::PluginBinding;
pub use plugin::{PLATFORM_VIEW_TYPE, VideoPlayerPlugin};
pub use registry::{PlayerLookup, PlayerRegistry};
pub use retry::create_with_retry;
pub use session::PlayerSession;
