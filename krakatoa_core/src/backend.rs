// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for platform integrations.
//!
//! The coordinator never renders and never talks to the AR service itself.
//! It consumes two collaborators through the traits in this module:
//!
//! - **Native backend**: [`NativeBackend`] creates a [`NativeContext`] for
//!   each platform surface instance. The context owns the GPU pipeline and
//!   the AR session and is driven from two threads: the control thread
//!   (resize, touch, activate, pause/resume) and the render thread
//!   (`draw_frame`). It must therefore be `Send + Sync` and synchronize
//!   internally.
//!
//! - **AR subsystem**: [`ArSubsystem`] answers the availability query and
//!   issues the side-effecting install request. It is only used on the
//!   control thread.
//!
//! # Crate boundaries
//!
//! `krakatoa_core` owns this contract. Platform crates implement it over
//! their native layer (JNI, C API, test doubles). `krakatoa_host` consumes it
//! to run the render thread and the lifecycle.
//!
//! # Destruction
//!
//! [`NativeContext::destroy`] takes `self` by value. The host only calls it
//! after the render thread has been joined and it holds the last reference,
//! so an implementation may free resources unconditionally.

use crate::error::{FrameError, NativeError};
use crate::frame::FrameTime;
use crate::input::TouchEvent;
use crate::surface::SurfaceGeometry;

/// A live native rendering context bound to one surface instance.
pub trait NativeContext: Send + Sync {
    /// Applies new surface dimensions and display rotation.
    fn resize(&self, geometry: SurfaceGeometry);

    /// Updates the AR session and draws one frame. Called only from the
    /// render thread.
    fn draw_frame(&self, frame: &FrameTime) -> Result<(), FrameError>;

    /// Forwards a raw touch event.
    fn forward_touch(&self, event: TouchEvent);

    /// Enables AR-driven rendering. Called at most once per context.
    fn activate(&self) -> Result<(), NativeError>;

    /// The host moved to the background.
    fn pause(&self) {}

    /// The host returned to the foreground.
    fn resume(&self) {}

    /// Releases all native resources.
    fn destroy(self)
    where
        Self: Sized;
}

/// Factory for [`NativeContext`] values.
pub trait NativeBackend {
    /// Platform handle to the drawing surface (e.g. an `ANativeWindow`).
    type Surface;
    /// Asset source needed to build pipelines (e.g. an `AAssetManager`).
    type Assets;
    /// The context type this backend produces.
    type Context: NativeContext + 'static;

    /// Creates the native context for a newly available surface.
    fn create_context(
        &mut self,
        surface: Self::Surface,
        assets: &Self::Assets,
    ) -> Result<Self::Context, NativeError>;

    /// Releases backend-wide resources when the host shuts down.
    fn release(&mut self) {}
}

/// Result of the AR availability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArAvailability {
    /// The service is still determining availability; ask again later.
    Checking,
    /// The device cannot run AR.
    Unsupported,
    /// Supported, but the AR service is missing or outdated.
    NeedsInstall,
    /// Supported and installed.
    Installed,
}

/// Result of an install request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstallStatus {
    /// The AR service is installed and current.
    Installed,
    /// An install or update flow was launched. The host will be paused and
    /// resumed when it finishes.
    InstallRequested,
}

/// The AR platform service.
pub trait ArSubsystem {
    /// Queries availability without side effects.
    fn check_availability(&mut self) -> ArAvailability;

    /// Ensures the service is installed, prompting the user when
    /// `prompt_user_if_first_time` is set.
    fn request_install(
        &mut self,
        prompt_user_if_first_time: bool,
    ) -> Result<InstallStatus, NativeError>;
}
