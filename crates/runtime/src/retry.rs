//! Bounded retry for render-surface-backed player creation.
//!
//! Surface allocation fails transiently on some platform/driver combinations.
//! [`create_with_retry`] acquires a handle, builds on it, and on failure
//! releases the handle and backs off linearly before the next attempt. Every
//! handle that does not end up inside a built value is released before the
//! loop moves on or returns.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::{PlatformError, PlayerError, Result};
use crate::platform::SurfaceProducer;

/// Handle that has to be given back when nothing was built on it.
pub trait Releasable {
	fn release(&self) -> std::result::Result<(), PlatformError>;
}

impl<S: SurfaceProducer + ?Sized> Releasable for Arc<S> {
	fn release(&self) -> std::result::Result<(), PlatformError> {
		SurfaceProducer::release(&**self)
	}
}

/// Runs `acquire` then `build` until one attempt succeeds or `policy` is exhausted.
///
/// Attempt `n` (zero-based) that fails is followed by a sleep of
/// `base_delay * (n + 1)`, except after the final attempt. Failures that are
/// not transient end the loop early. The returned error wraps the most recent
/// failure only.
pub async fn create_with_retry<H, T, A, B>(policy: &RetryPolicy, mut acquire: A, mut build: B) -> Result<(H, T)>
where
	H: Releasable,
	A: FnMut() -> std::result::Result<H, PlatformError>,
	B: FnMut(&H) -> std::result::Result<T, PlatformError>,
{
	let max_attempts = policy.attempts();
	let mut attempt = 0;

	loop {
		let failure = match acquire() {
			Ok(handle) => match build(&handle) {
				Ok(value) => {
					if attempt > 0 {
						debug!(target = "vp.retry", attempts = attempt + 1, "player initialized after retry");
					}
					return Ok((handle, value));
				}
				Err(err) => {
					release_quietly(&handle);
					err
				}
			},
			Err(err) => err,
		};

		let made = attempt + 1;
		warn!(
			target = "vp.retry",
			attempt = made,
			max_attempts,
			error = %failure,
			"player initialization attempt failed"
		);

		if made >= max_attempts || !failure.is_transient() {
			return Err(PlayerError::ResourceAcquisition {
				attempts: made,
				source: failure,
			});
		}

		tokio::time::sleep(policy.delay_for(attempt)).await;
		attempt = made;
	}
}

fn release_quietly<H: Releasable>(handle: &H) {
	if let Err(err) = handle.release() {
		debug!(target = "vp.retry", error = %err, "ignoring release failure of unused handle");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::time::Duration;
	use tokio::time::Instant;

	#[derive(Debug, Default)]
	struct Counters {
		acquired: AtomicU32,
		released: AtomicU32,
		built: AtomicU32,
	}

	#[derive(Debug)]
	struct Handle {
		counters: Arc<Counters>,
		fail_release: bool,
	}

	impl Releasable for Handle {
		fn release(&self) -> std::result::Result<(), PlatformError> {
			self.counters.released.fetch_add(1, Ordering::SeqCst);
			if self.fail_release {
				Err(PlatformError::Release("already gone".into()))
			} else {
				Ok(())
			}
		}
	}

	fn policy() -> RetryPolicy {
		RetryPolicy::new(3, Duration::from_millis(80))
	}

	#[tokio::test(start_paused = true)]
	async fn acquire_failing_twice_then_succeeding_returns_value() {
		let counters = Arc::new(Counters::default());
		let started = Instant::now();

		let (handle, value) = create_with_retry(
			&policy(),
			|| {
				let n = counters.acquired.fetch_add(1, Ordering::SeqCst) + 1;
				if n < 3 {
					Err(PlatformError::SurfaceAllocation(format!("attempt {n}")))
				} else {
					Ok(Handle {
						counters: Arc::clone(&counters),
						fail_release: false,
					})
				}
			},
			|_| {
				counters.built.fetch_add(1, Ordering::SeqCst);
				Ok("player")
			},
		)
		.await
		.unwrap();

		assert_eq!(value, "player");
		assert_eq!(counters.acquired.load(Ordering::SeqCst), 3);
		assert_eq!(counters.built.load(Ordering::SeqCst), 1);
		assert_eq!(counters.released.load(Ordering::SeqCst), 0);
		assert_eq!(started.elapsed(), Duration::from_millis(80 + 160));
		drop(handle);
	}

	#[tokio::test(start_paused = true)]
	async fn failed_builds_release_their_handles() {
		let counters = Arc::new(Counters::default());

		let result = create_with_retry(
			&policy(),
			|| {
				counters.acquired.fetch_add(1, Ordering::SeqCst);
				Ok(Handle {
					counters: Arc::clone(&counters),
					fail_release: false,
				})
			},
			|_| {
				let n = counters.built.fetch_add(1, Ordering::SeqCst) + 1;
				if n < 3 {
					Err(PlatformError::PlayerConstruction(format!("build {n}")))
				} else {
					Ok(n)
				}
			},
		)
		.await;

		let (_, built_on) = result.unwrap();
		assert_eq!(built_on, 3);
		assert_eq!(counters.acquired.load(Ordering::SeqCst), 3);
		assert_eq!(counters.released.load(Ordering::SeqCst), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn exhausted_attempts_surface_last_error() {
		let counters = Arc::new(Counters::default());
		let started = Instant::now();

		let err = create_with_retry(
			&policy(),
			|| {
				counters.acquired.fetch_add(1, Ordering::SeqCst);
				Ok(Handle {
					counters: Arc::clone(&counters),
					fail_release: false,
				})
			},
			|_| -> std::result::Result<(), PlatformError> {
				let n = counters.built.fetch_add(1, Ordering::SeqCst) + 1;
				Err(PlatformError::PlayerConstruction(format!("build {n}")))
			},
		)
		.await
		.unwrap_err();

		match err {
			PlayerError::ResourceAcquisition { attempts, source } => {
				assert_eq!(attempts, 3);
				assert_eq!(source, PlatformError::PlayerConstruction("build 3".into()));
			}
			other => panic!("unexpected error: {other:?}"),
		}
		assert_eq!(counters.acquired.load(Ordering::SeqCst), 3);
		assert_eq!(counters.released.load(Ordering::SeqCst), 3);
		// No sleep follows the final attempt.
		assert_eq!(started.elapsed(), Duration::from_millis(240));
	}

	#[tokio::test(start_paused = true)]
	async fn release_failure_does_not_abort_retry() {
		let counters = Arc::new(Counters::default());

		let result = create_with_retry(
			&policy(),
			|| {
				counters.acquired.fetch_add(1, Ordering::SeqCst);
				Ok(Handle {
					counters: Arc::clone(&counters),
					fail_release: true,
				})
			},
			|_| {
				let n = counters.built.fetch_add(1, Ordering::SeqCst) + 1;
				if n == 1 { Err(PlatformError::Channel("busy".into())) } else { Ok(()) }
			},
		)
		.await;

		assert!(result.is_ok());
		assert_eq!(counters.released.load(Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn non_transient_failure_stops_immediately() {
		let counters = Arc::new(Counters::default());
		let started = Instant::now();

		let err = create_with_retry(
			&policy(),
			|| {
				counters.acquired.fetch_add(1, Ordering::SeqCst);
				Ok(Handle {
					counters: Arc::clone(&counters),
					fail_release: false,
				})
			},
			|_| -> std::result::Result<(), PlatformError> { Err(PlatformError::Unsupported("rtsp".into())) },
		)
		.await
		.unwrap_err();

		assert!(matches!(err, PlayerError::ResourceAcquisition { attempts: 1, .. }));
		assert_eq!(counters.acquired.load(Ordering::SeqCst), 1);
		assert_eq!(counters.released.load(Ordering::SeqCst), 1);
		assert_eq!(started.elapsed(), Duration::ZERO);
	}
}
