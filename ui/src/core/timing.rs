//! Monotonic timestamps and sleeps for task engines.
//!
//! Stamps are whole nanoseconds since a process-local origin, so deltas add up
//! exactly no matter how often a caller samples the clock.

use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstantStamp {
    nanos: u64,
}

impl InstantStamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self {
            nanos: ms * 1_000_000,
        }
    }

    pub const fn as_nanos(self) -> u64 {
        self.nanos
    }

    /// Same contract as [`std::time::Instant::saturating_duration_since`]:
    /// zero when `earlier` is actually later.
    pub fn saturating_duration_since(self, earlier: InstantStamp) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(earlier.nanos))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> InstantStamp {
    use once_cell::sync::Lazy;
    use std::time::Instant;

    static ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);
    let elapsed = ORIGIN.elapsed().as_nanos();
    InstantStamp::from_nanos(u64::try_from(elapsed).unwrap_or(u64::MAX))
}

#[cfg(target_arch = "wasm32")]
pub fn now() -> InstantStamp {
    let ms = web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0);
    InstantStamp::from_nanos((ms.max(0.0) * 1_000_000.0) as u64)
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u64) {
    let ms = u32::try_from(ms).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backwards_delta_saturates_to_zero() {
        let later = InstantStamp::from_millis(20);
        let earlier = InstantStamp::from_millis(5);
        assert_eq!(
            later.saturating_duration_since(earlier),
            Duration::from_millis(15)
        );
        assert_eq!(earlier.saturating_duration_since(later), Duration::ZERO);
    }

    #[test]
    fn now_is_monotonic() {
        let first = now();
        let second = now();
        assert!(second >= first);
    }
}
