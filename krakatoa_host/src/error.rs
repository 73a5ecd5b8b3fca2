// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing error type.

use std::io;

use krakatoa_core::error::{FailureReason, FrameError, InvariantViolation, NativeError};
use thiserror::Error;

/// Errors returned by the coordinator and its parts.
#[derive(Debug, Error)]
pub enum Error {
    /// The user denied the runtime permission. Terminal; reported once.
    #[error("camera permission denied")]
    PermissionDenied,
    /// The device cannot run AR. Terminal; reported once.
    #[error("AR is not supported on this device")]
    ArUnsupported,
    /// The AR install request failed. Terminal; reported once.
    #[error("AR subsystem installation failed")]
    ArInstallFailed(#[source] Option<NativeError>),
    /// The native backend could not create a context for the surface. The
    /// surface stays not-ready; the host may retry by recreating it.
    #[error("native context creation failed")]
    NativeContextCreationFailed(#[source] NativeError),
    /// The render loop stopped itself. It is not restarted automatically.
    #[error("render loop fault")]
    RenderLoopFault(#[from] RenderFault),
    /// The one-time native activation call failed. Activation is not retried
    /// for this surface instance.
    #[error("native activation failed")]
    ActivationFailed(#[source] NativeError),
    /// `start` was called while a worker is still running.
    #[error("render loop is already running")]
    RenderLoopAlreadyRunning,
    /// The OS refused to spawn the render thread.
    #[error("failed to spawn render thread")]
    SpawnRenderThread(#[source] io::Error),
    /// The host integration broke a call-ordering rule.
    #[error("lifecycle invariant violated")]
    InvariantViolation(#[from] InvariantViolation),
}

impl Error {
    /// Whether the error makes activation impossible for the rest of the
    /// process.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied | Self::ArUnsupported | Self::ArInstallFailed(_)
        )
    }

    /// Returns the terminal failure this error represents, if any.
    #[must_use]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::PermissionDenied => Some(FailureReason::PermissionDenied),
            Self::ArUnsupported => Some(FailureReason::ArUnsupported),
            Self::ArInstallFailed(_) => Some(FailureReason::ArInstallFailed),
            _ => None,
        }
    }
}

/// Why the render loop stopped without being asked to.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderFault {
    /// `draw_frame` returned a fatal error.
    #[error(transparent)]
    Frame(FrameError),
    /// `draw_frame` panicked. Carries the panic message when it was a string.
    #[error("draw_frame panicked: {0}")]
    Panicked(String),
    /// Too many consecutive transient frame errors.
    #[error("{count} consecutive transient frame errors (last status {last_status})")]
    TransientBudgetExhausted {
        /// Length of the error streak.
        count: u32,
        /// Status code of the last error.
        last_status: i32,
    },
}

impl RenderFault {
    /// Backend status code, if the fault came from the backend.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::Frame(error) => Some(error.status()),
            Self::Panicked(_) => None,
            Self::TransientBudgetExhausted { last_status, .. } => Some(*last_status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(Error::PermissionDenied.is_terminal());
        assert!(Error::ArInstallFailed(Some(NativeError::new(-3))).is_terminal());
        assert!(!Error::RenderLoopAlreadyRunning.is_terminal());
        assert_eq!(
            Error::ArUnsupported.failure_reason(),
            Some(FailureReason::ArUnsupported)
        );
        assert_eq!(
            Error::NativeContextCreationFailed(NativeError::new(1)).failure_reason(),
            None
        );
    }

    #[test]
    fn fault_status() {
        assert_eq!(RenderFault::Frame(FrameError::Fatal(-9)).status(), Some(-9));
        assert_eq!(RenderFault::Panicked("boom".into()).status(), None);
        assert_eq!(
            RenderFault::TransientBudgetExhausted {
                count: 3,
                last_status: 2
            }
            .status(),
            Some(2)
        );
    }
}
