// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render thread, surface lifecycle and activation coordinator for the
//! Krakatoa AR surface.
//!
//! `krakatoa_host` builds the threaded half of the coordinator on top of
//! [`krakatoa_core`]:
//!
//! - [`coordinator::Coordinator`] is the facade the platform glue calls from
//!   its permission, surface and activity lifecycle callbacks.
//! - [`lifecycle::SurfaceLifecycleController`] owns the native context for
//!   the current surface instance and enforces stop-then-destroy.
//! - [`render_loop::RenderLoop`] runs the draw function on one named worker
//!   thread with a cooperative stop flag and a join-on-stop contract.
//! - [`ar::ArInstallFlow`] runs the AR availability check and install
//!   request.
//!
//! # Threads
//!
//! All `Coordinator` methods run on the host's control thread. The only
//! blocking call is surface teardown, which joins the render worker. The
//! native context is shared with the worker through an `Arc` and must
//! synchronize internally.
//!
//! # Logging and tracing
//!
//! Warnings, errors and lifecycle milestones go to the [`log`] facade.
//! Structured events go to an optional
//! [`TraceSink`](krakatoa_core::trace::TraceSink) installed through
//! [`tracing::SharedTrace`].

pub mod ar;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod render_loop;
pub mod tracing;

#[cfg(test)]
mod test_support;

pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::{Error, RenderFault};
