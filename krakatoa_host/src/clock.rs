// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host monotonic clock reads.
//!
//! On Unix targets (Android included) this is `CLOCK_MONOTONIC` read through
//! `rustix`, the same clock the native AR session timestamps camera frames
//! with. Elsewhere it falls back to nanoseconds since the first call.

use krakatoa_core::time::HostTime;

#[cfg(unix)]
const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Returns the current monotonic host time in nanoseconds.
#[cfg(unix)]
#[must_use]
pub fn now() -> HostTime {
    use rustix::time::{ClockId, clock_gettime};

    timespec_to_host_time(clock_gettime(ClockId::Monotonic))
}

/// Returns the current monotonic host time in nanoseconds.
#[cfg(not(unix))]
#[must_use]
pub fn now() -> HostTime {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let nanos = EPOCH.get_or_init(Instant::now).elapsed().as_nanos();
    HostTime(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[cfg(unix)]
fn timespec_to_host_time(timespec: rustix::time::Timespec) -> HostTime {
    let seconds = u64::try_from(timespec.tv_sec).unwrap_or(0);
    let nanos = u64::try_from(timespec.tv_nsec)
        .unwrap_or(0)
        .min(999_999_999);

    let ticks = u128::from(seconds)
        .saturating_mul(NANOS_PER_SECOND)
        .saturating_add(u128::from(nanos));
    HostTime(u64::try_from(ticks).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic_non_decreasing() {
        let first = now();
        let second = now();
        assert!(second >= first, "monotonic clock should not go backwards");
    }

    #[cfg(unix)]
    #[test]
    fn timespec_conversion() {
        use rustix::time::Timespec;

        let input = Timespec {
            tv_sec: 3,
            tv_nsec: 250_000_000,
        };
        assert_eq!(timespec_to_host_time(input), HostTime(3_250_000_000));

        let negative = Timespec {
            tv_sec: -1,
            tv_nsec: 5,
        };
        assert_eq!(timespec_to_host_time(negative), HostTime(5));
    }
}
