// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-iteration frame timing.
//!
//! The render loop calls [`FrameTimer::tick`] once per iteration with the
//! current host time and hands the resulting [`FrameTime`] to the native
//! draw call. While the host is backgrounded the timer is paused: frames
//! still carry an increasing index but report zero delta and a frozen total,
//! so animation does not jump when the app returns.

use crate::time::{Duration, HostTime};

/// Timing information for one render-loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTime {
    /// Zero-based frame counter for the current render loop.
    pub index: u64,
    /// Host time at which the frame started.
    pub now: HostTime,
    /// Time since the previous unpaused frame. Zero for the first frame and
    /// while paused.
    pub delta: Duration,
    /// Accumulated unpaused time since the loop started.
    pub total: Duration,
}

/// Produces [`FrameTime`] values with pause/resume support.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameTimer {
    next_index: u64,
    last: Option<HostTime>,
    total: Duration,
    paused: bool,
}

impl FrameTimer {
    /// Creates a timer that has not ticked yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_index: 0,
            last: None,
            total: Duration::ZERO,
            paused: false,
        }
    }

    /// Advances the timer to `now` and returns the frame's timing.
    pub fn tick(&mut self, now: HostTime) -> FrameTime {
        let index = self.next_index;
        self.next_index += 1;

        let delta = if self.paused {
            Duration::ZERO
        } else {
            let delta = self
                .last
                .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
            self.last = Some(now);
            delta
        };
        self.total = self.total.saturating_add(delta);

        FrameTime {
            index,
            now,
            delta,
            total: self.total,
        }
    }

    /// Freezes delta and total time until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreezes the timer. The paused interval is excluded from the next
    /// delta.
    pub fn resume(&mut self, now: HostTime) {
        if self.paused {
            self.paused = false;
            if self.last.is_some() {
                self.last = Some(now);
            }
        }
    }

    /// Whether the timer is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of frames ticked so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> HostTime {
        HostTime(millis * 1_000_000)
    }

    #[test]
    fn first_frame_has_zero_delta() {
        let mut timer = FrameTimer::new();
        let frame = timer.tick(ms(100));
        assert_eq!(frame.index, 0);
        assert_eq!(frame.delta, Duration::ZERO);
        assert_eq!(frame.total, Duration::ZERO);

        let frame = timer.tick(ms(116));
        assert_eq!(frame.index, 1);
        assert_eq!(frame.delta, Duration::from_millis(16));
        assert_eq!(frame.total, Duration::from_millis(16));
    }

    #[test]
    fn paused_frames_freeze_time() {
        let mut timer = FrameTimer::new();
        timer.tick(ms(0));
        timer.tick(ms(10));
        timer.pause();
        assert!(timer.is_paused());

        let frame = timer.tick(ms(20));
        assert_eq!(frame.delta, Duration::ZERO);
        assert_eq!(frame.total, Duration::from_millis(10));
        let frame = timer.tick(ms(500));
        assert_eq!(frame.delta, Duration::ZERO);
        assert_eq!(frame.index, 3);
    }

    #[test]
    fn resume_excludes_paused_interval() {
        let mut timer = FrameTimer::new();
        timer.tick(ms(0));
        timer.tick(ms(10));
        timer.pause();
        timer.tick(ms(20));
        timer.resume(ms(1_000));

        let frame = timer.tick(ms(1_016));
        assert_eq!(frame.delta, Duration::from_millis(16));
        assert_eq!(frame.total, Duration::from_millis(26));
    }

    #[test]
    fn resume_before_first_frame_keeps_zero_first_delta() {
        let mut timer = FrameTimer::new();
        timer.pause();
        timer.resume(ms(50));
        let frame = timer.tick(ms(80));
        assert_eq!(frame.delta, Duration::ZERO);
        assert_eq!(timer.frame_count(), 1);
    }

    #[test]
    fn clock_going_backwards_saturates() {
        let mut timer = FrameTimer::new();
        timer.tick(ms(100));
        let frame = timer.tick(ms(90));
        assert_eq!(frame.delta, Duration::ZERO);
    }
}
