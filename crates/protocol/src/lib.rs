//! Wire types for the video player host API.
//!
//! This crate contains the serde-serializable types exchanged between a host
//! dispatcher and the player runtime. These types represent the "protocol
//! layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * Stable: Changes only when the wire protocol changes
//!
//! Classification, retry, and lifecycle live in `vp-runtime`.

pub mod api;
pub mod options;
pub mod types;

pub use api::*;
pub use options::*;
pub use types::*;
