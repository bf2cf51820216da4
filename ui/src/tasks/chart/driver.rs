//! Timer loop that keeps the running trial's elapsed time fresh.
//!
//! The loop owns no state. Each cycle sleeps, reads the clock and hands the
//! stamp to a callback, which decides whether the loop carries on. Because the
//! callback re-reads the session every cycle, a completion or reset stops the
//! loop on the next wake-up.

use std::future::Future;

use crate::core::timing::InstantStamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Run until `on_tick` returns [`TickControl::Stop`]. Returns the number of
/// ticks that were applied.
pub async fn drive<S, Fut, C, T>(
    interval_ms: u64,
    mut sleep: S,
    mut clock: C,
    mut on_tick: T,
) -> usize
where
    S: FnMut(u64) -> Fut,
    Fut: Future<Output = ()>,
    C: FnMut() -> InstantStamp,
    T: FnMut(InstantStamp) -> TickControl,
{
    let mut applied = 0;
    loop {
        sleep(interval_ms).await;
        match on_tick(clock()) {
            TickControl::Continue => applied += 1,
            TickControl::Stop => break,
        }
    }
    tracing::debug!(applied, "tick loop stopped");
    applied
}
