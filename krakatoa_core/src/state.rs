// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State model for the three readiness inputs and the activation outcome.
//!
//! Permission and AR readiness are properties of the host process and persist
//! across surface instances. Surface and activation state are per instance:
//! a recreated surface starts again at [`SurfaceState::NotReady`] and
//! [`ActivationState::Inactive`].

use crate::error::FailureReason;

/// Outcome of the runtime permission request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PermissionState {
    /// No result delivered yet.
    #[default]
    Unknown,
    /// The user granted the permission.
    Granted,
    /// The user denied the permission.
    Denied,
}

impl PermissionState {
    /// Converts the host's one-shot result into a state.
    #[must_use]
    pub const fn from_granted(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }

    /// Whether the value can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Granted | Self::Denied)
    }
}

/// Lifecycle of one platform drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    /// No native context exists for the current instance.
    #[default]
    NotReady,
    /// The native context exists and frames may be drawn.
    Ready,
    /// The instance was torn down. Terminal for that instance.
    Destroyed,
}

/// Availability of the AR subsystem for this app session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ArReadiness {
    /// No check has run yet.
    #[default]
    Unknown,
    /// The subsystem is still determining availability. Retry later.
    Checking,
    /// The device cannot run AR. Terminal.
    Unsupported,
    /// An install or update prompt is in flight. Resolves on the next check.
    InstallRequested,
    /// The subsystem is installed and current. Terminal.
    Installed,
    /// The install request reported an error. Terminal.
    InstallFailed,
}

impl ArReadiness {
    /// Whether the value can no longer change for this app session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Unsupported | Self::Installed | Self::InstallFailed)
    }

    /// Returns the failure this value represents, if it is terminal-negative.
    #[must_use]
    pub const fn failure(self) -> Option<FailureReason> {
        match self {
            Self::Unsupported => Some(FailureReason::ArUnsupported),
            Self::InstallFailed => Some(FailureReason::ArInstallFailed),
            _ => None,
        }
    }
}

/// Whether AR-driven rendering has been enabled for the current surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ActivationState {
    /// Not yet activated (or activation became impossible).
    #[default]
    Inactive,
    /// Activated. Holds until the surface is destroyed.
    Active,
}
