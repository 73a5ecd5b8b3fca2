// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot activation gate.
//!
//! [`ActivationGate`] turns the tracker's level-triggered readiness into a
//! single edge: the first time all preconditions hold, it moves to `Active`
//! and runs the activation side effect. Every later call is a no-op until
//! [`reset`](ActivationGate::reset) starts a new surface instance.
//!
//! # Usage
//!
//! ```rust
//! use krakatoa_core::gate::{ActivationGate, GateOutcome};
//!
//! let mut gate = ActivationGate::new();
//! let mut activations = 0;
//!
//! assert_eq!(gate.on_preconditions_changed(false, None, || activations += 1), GateOutcome::Pending);
//! assert_eq!(gate.on_preconditions_changed(true, None, || activations += 1), GateOutcome::Activated(()));
//! assert_eq!(gate.on_preconditions_changed(true, None, || activations += 1), GateOutcome::Unchanged);
//! assert_eq!(activations, 1);
//! ```

use crate::error::FailureReason;
use crate::state::ActivationState;

/// Internal gate state, including the failure sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GateState {
    /// Waiting for all preconditions.
    #[default]
    Inactive,
    /// Activated; the side effect has run.
    Active,
    /// A terminal condition ruled activation out for this surface instance.
    Failed(FailureReason),
}

/// What a call to [`ActivationGate::on_preconditions_changed`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateOutcome<R = ()> {
    /// The gate activated and the side effect returned `R`.
    Activated(R),
    /// The gate entered the failed state for this reason.
    Failed(FailureReason),
    /// Still waiting; nothing happened.
    Pending,
    /// The gate had already activated or failed; the input was ignored.
    Unchanged,
}

/// Fires the activation side effect at most once per surface instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivationGate {
    state: GateState,
}

impl ActivationGate {
    /// Creates an inactive gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GateState::Inactive,
        }
    }

    /// Feeds the latest combined readiness into the gate.
    ///
    /// A terminal `failure` takes precedence over `all_ready`. The gate moves
    /// to `Active` before `activate` runs, so the side effect can never be
    /// observed twice for one instance.
    pub fn on_preconditions_changed<R>(
        &mut self,
        all_ready: bool,
        failure: Option<FailureReason>,
        activate: impl FnOnce() -> R,
    ) -> GateOutcome<R> {
        if self.state != GateState::Inactive {
            return GateOutcome::Unchanged;
        }
        if let Some(reason) = failure {
            self.state = GateState::Failed(reason);
            return GateOutcome::Failed(reason);
        }
        if !all_ready {
            return GateOutcome::Pending;
        }
        self.state = GateState::Active;
        GateOutcome::Activated(activate())
    }

    /// Returns the gate to `Inactive` for a new surface instance.
    pub fn reset(&mut self) {
        self.state = GateState::Inactive;
    }

    /// Returns the full gate state.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Returns the externally visible activation state. `Failed` reads as
    /// `Inactive`.
    #[must_use]
    pub const fn activation_state(&self) -> ActivationState {
        match self.state {
            GateState::Active => ActivationState::Active,
            GateState::Inactive | GateState::Failed(_) => ActivationState::Inactive,
        }
    }
}
