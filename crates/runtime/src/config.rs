//! Plugin configuration and shared player options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 80;

/// Options applied to every player created after they are set.
///
/// Players receive a copy at creation time, so later changes are never
/// retroactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlayerOptions {
	/// Mix audio with other active audio sessions instead of taking focus.
	pub mix_with_others: bool,
}

/// Bounded linear backoff used when acquiring render surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			base_delay_ms: DEFAULT_BASE_DELAY_MS,
		}
	}
}

impl RetryPolicy {
	pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
		Self {
			max_attempts,
			base_delay_ms: u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX),
		}
	}

	/// Number of attempts actually made; a configured zero still tries once.
	pub fn attempts(&self) -> u32 {
		self.max_attempts.max(1)
	}

	pub fn base_delay(&self) -> Duration {
		Duration::from_millis(self.base_delay_ms)
	}

	/// Delay after the failed zero-based `attempt`.
	pub fn delay_for(&self, attempt: u32) -> Duration {
		self.base_delay().saturating_mul(attempt.saturating_add(1))
	}

	/// Total time slept when every attempt fails, saturating at [`Duration::MAX`].
	pub fn worst_case_delay(&self) -> Duration {
		(0..self.attempts() - 1).fold(Duration::ZERO, |total, attempt| total.saturating_add(self.delay_for(attempt)))
	}
}

/// Configuration fixed for one plugin attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
	pub retry: RetryPolicy,
}
