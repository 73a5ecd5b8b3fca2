// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Failure reasons and native error values.
//!
//! Terminal conditions ([`FailureReason`]) make activation impossible for the
//! rest of the process. [`NativeError`] and [`FrameError`] carry the status
//! code a native collaborator returned. [`InvariantViolation`] names a host
//! integration bug.

use thiserror::Error;

/// A terminal condition that rules out activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum FailureReason {
    /// The user denied the runtime permission.
    #[error("camera permission denied")]
    PermissionDenied,
    /// The device does not support the AR subsystem.
    #[error("AR is not supported on this device")]
    ArUnsupported,
    /// Requesting installation of the AR subsystem failed.
    #[error("AR subsystem installation failed")]
    ArInstallFailed,
}

/// A native collaborator call failed with a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("native call failed with status {status}")]
pub struct NativeError {
    /// Backend-specific status code.
    pub status: i32,
}

impl NativeError {
    /// Creates an error from a status code.
    #[must_use]
    pub const fn new(status: i32) -> Self {
        Self { status }
    }
}

/// Error returned by a single frame draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum FrameError {
    /// The frame was skipped; the next frame may succeed (e.g. the AR session
    /// had no camera image yet).
    #[error("frame skipped (status {0})")]
    Transient(i32),
    /// The backend cannot draw again without being recreated.
    #[error("fatal frame error (status {0})")]
    Fatal(i32),
}

impl FrameError {
    /// Whether the render loop must stop.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Returns the backend status code.
    #[must_use]
    pub const fn status(self) -> i32 {
        match self {
            Self::Transient(status) | Self::Fatal(status) => status,
        }
    }
}

/// A call-ordering rule the host integration broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum InvariantViolation {
    /// Something other than the controller still held the native context
    /// when it was due for destruction.
    #[error("native context still shared at destruction")]
    ContextStillShared,
    /// `created` arrived for a surface that is already ready.
    #[error("surface created twice without an intervening destroy")]
    SurfaceAlreadyCreated,
    /// All preconditions held but no native context existed to activate.
    #[error("activation requested without a native context")]
    ActivationWithoutContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fatal_frame_errors_stop_the_loop() {
        assert!(FrameError::Fatal(-1).is_fatal());
        assert!(!FrameError::Transient(-1).is_fatal());
        assert_eq!(FrameError::Transient(-3).status(), -3);
    }
}
