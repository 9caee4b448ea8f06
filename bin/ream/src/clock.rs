use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::anyhow;
use ream_consensus_misc::constants::beacon::SECONDS_PER_SLOT;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

pub fn unix_now() -> anyhow::Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| anyhow!("System time before UNIX EPOCH: {err}"))?
        .as_secs())
}

/// Slot at `now`, or `None` before genesis.
pub fn slot_at(genesis_time: u64, now: u64) -> Option<u64> {
    now.checked_sub(genesis_time)
        .map(|elapsed| elapsed / SECONDS_PER_SLOT)
}

/// Seconds from `now` until the next slot starts. At or before genesis that is genesis itself.
pub fn seconds_until_next_slot(genesis_time: u64, now: u64) -> u64 {
    match now.checked_sub(genesis_time) {
        Some(elapsed) => SECONDS_PER_SLOT - elapsed % SECONDS_PER_SLOT,
        None => genesis_time - now,
    }
}

/// Ticks at every slot boundary, starting with the next one.
pub fn create_slot_interval(genesis_time: u64) -> anyhow::Result<Interval> {
    let delay = seconds_until_next_slot(genesis_time, unix_now()?);
    let mut interval = interval_at(
        Instant::now() + Duration::from_secs(delay),
        Duration::from_secs(SECONDS_PER_SLOT),
    );
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    Ok(interval)
}
