//! Host for the video player runtime.
//!
//! Attaches the plugin to the in-memory platform and answers line-delimited
//! JSON requests, one response line per request.

pub mod cli;
pub mod dispatch;
pub mod host;
pub mod logging;
