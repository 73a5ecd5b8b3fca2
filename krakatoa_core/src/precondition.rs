// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Level-triggered join over the three readiness inputs.
//!
//! [`PreconditionTracker`] stores the latest value of each input and
//! recomputes the combined readiness on every write. It makes no assumption
//! about the order in which inputs arrive: readiness is a plain AND over the
//! current values, so any interleaving that ends in the same three values
//! yields the same answer.

use crate::error::FailureReason;
use crate::state::{ArReadiness, PermissionState, SurfaceState};

/// A new value for one of the three inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precondition {
    /// Permission result.
    Permission(PermissionState),
    /// Surface lifecycle transition.
    Surface(SurfaceState),
    /// AR availability / install result.
    Ar(ArReadiness),
}

/// Latest known value of each readiness input.
///
/// Terminal permission and AR values stick: once permission is granted or
/// denied, or AR is installed, unsupported or failed to install, later writes
/// to that input are ignored. Surface state is always accepted because a new
/// surface instance legitimately moves it back to
/// [`SurfaceState::NotReady`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreconditionTracker {
    permission: PermissionState,
    surface: SurfaceState,
    ar: ArReadiness,
}

impl PreconditionTracker {
    /// Creates a tracker with every input unknown.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            permission: PermissionState::Unknown,
            surface: SurfaceState::NotReady,
            ar: ArReadiness::Unknown,
        }
    }

    /// Applies an update and returns whether all three inputs are now ready.
    pub fn update(&mut self, update: Precondition) -> bool {
        match update {
            Precondition::Permission(value) => {
                if !self.permission.is_terminal() {
                    self.permission = value;
                }
            }
            Precondition::Surface(value) => self.surface = value,
            Precondition::Ar(value) => {
                if !self.ar.is_terminal() {
                    self.ar = value;
                }
            }
        }
        self.all_ready()
    }

    /// Whether permission is granted, the surface is ready and AR is
    /// installed.
    #[must_use]
    pub const fn all_ready(&self) -> bool {
        matches!(self.permission, PermissionState::Granted)
            && matches!(self.surface, SurfaceState::Ready)
            && matches!(self.ar, ArReadiness::Installed)
    }

    /// Returns the terminal-negative condition, if any. Permission is
    /// reported before AR.
    #[must_use]
    pub const fn failure(&self) -> Option<FailureReason> {
        if matches!(self.permission, PermissionState::Denied) {
            return Some(FailureReason::PermissionDenied);
        }
        self.ar.failure()
    }

    /// Current permission state.
    #[must_use]
    pub const fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Current surface state.
    #[must_use]
    pub const fn surface(&self) -> SurfaceState {
        self.surface
    }

    /// Current AR readiness.
    #[must_use]
    pub const fn ar(&self) -> ArReadiness {
        self.ar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SATISFYING: [Precondition; 3] = [
        Precondition::Permission(PermissionState::Granted),
        Precondition::Surface(SurfaceState::Ready),
        Precondition::Ar(ArReadiness::Installed),
    ];

    const ORDERS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    #[test]
    fn ready_only_after_all_three_in_any_order() {
        for order in ORDERS {
            let mut tracker = PreconditionTracker::new();
            let results = order.map(|i| tracker.update(SATISFYING[i]));
            assert_eq!(results, [false, false, true], "order {order:?}");
        }
    }

    #[test]
    fn transient_ar_values_do_not_satisfy() {
        let mut tracker = PreconditionTracker::new();
        tracker.update(Precondition::Permission(PermissionState::Granted));
        tracker.update(Precondition::Surface(SurfaceState::Ready));
        assert!(!tracker.update(Precondition::Ar(ArReadiness::Checking)));
        assert!(!tracker.update(Precondition::Ar(ArReadiness::InstallRequested)));
        assert_eq!(tracker.failure(), None);
        assert!(tracker.update(Precondition::Ar(ArReadiness::Installed)));
    }

    #[test]
    fn terminal_permission_sticks() {
        let mut tracker = PreconditionTracker::new();
        tracker.update(Precondition::Permission(PermissionState::Denied));
        tracker.update(Precondition::Permission(PermissionState::Granted));
        assert_eq!(tracker.permission(), PermissionState::Denied);
        assert_eq!(tracker.failure(), Some(FailureReason::PermissionDenied));
    }

    #[test]
    fn terminal_ar_sticks() {
        let mut tracker = PreconditionTracker::new();
        tracker.update(Precondition::Ar(ArReadiness::Installed));
        tracker.update(Precondition::Ar(ArReadiness::Checking));
        assert_eq!(tracker.ar(), ArReadiness::Installed);

        let mut tracker = PreconditionTracker::new();
        tracker.update(Precondition::Ar(ArReadiness::Unsupported));
        tracker.update(Precondition::Ar(ArReadiness::Installed));
        assert_eq!(tracker.failure(), Some(FailureReason::ArUnsupported));
    }

    #[test]
    fn surface_cycle_drops_readiness() {
        let mut tracker = PreconditionTracker::new();
        for update in SATISFYING {
            tracker.update(update);
        }
        assert!(tracker.all_ready());
        assert!(!tracker.update(Precondition::Surface(SurfaceState::Destroyed)));
        assert!(!tracker.update(Precondition::Surface(SurfaceState::NotReady)));
        assert!(tracker.update(Precondition::Surface(SurfaceState::Ready)));
        assert_eq!(tracker.permission(), PermissionState::Granted);
        assert_eq!(tracker.ar(), ArReadiness::Installed);
    }

    #[test]
    fn redundant_updates_are_harmless() {
        let mut tracker = PreconditionTracker::new();
        for _ in 0..3 {
            for update in SATISFYING {
                tracker.update(update);
            }
        }
        assert!(tracker.all_ready());
    }

    #[test]
    fn permission_failure_reported_before_ar() {
        let mut tracker = PreconditionTracker::new();
        tracker.update(Precondition::Ar(ArReadiness::Unsupported));
        tracker.update(Precondition::Permission(PermissionState::Denied));
        assert_eq!(tracker.failure(), Some(FailureReason::PermissionDenied));
    }
}
