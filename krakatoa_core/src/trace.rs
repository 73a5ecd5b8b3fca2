// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the surface lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! coordinator calls at each lifecycle step. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-frame [`FrameDrawnEvent`]
//!   and the corresponding `TraceSink` method.

use crate::backend::ArAvailability;
use crate::error::FailureReason;
#[cfg(feature = "trace-rich")]
use crate::error::FrameError;
#[cfg(feature = "trace-rich")]
use crate::frame::FrameTime;
use crate::gate::GateState;
use crate::precondition::Precondition;
use crate::state::ArReadiness;
use crate::surface::{SurfaceGeometry, SurfaceId};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What happened to a surface instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceEventKind {
    /// The native context was created; the surface is ready.
    Created,
    /// Native context creation failed with this status.
    CreateFailed {
        /// Backend status code.
        status: i32,
    },
    /// New dimensions or rotation were forwarded.
    Changed(SurfaceGeometry),
    /// The native context was destroyed (after the render loop stopped).
    ContextDestroyed,
    /// The surface instance reached its terminal state.
    Destroyed,
}

/// What happened to the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderLoopEventKind {
    /// The worker thread was spawned.
    Started,
    /// The control thread asked the worker to stop.
    StopRequested,
    /// The worker was joined.
    Stopped {
        /// Frames drawn over the loop's lifetime.
        frames: u64,
    },
    /// The worker stopped itself because of a fatal frame error or panic.
    Faulted {
        /// Backend status code, or `None` for a panic.
        status: Option<i32>,
    },
}

/// Host foreground/background transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostLifecycleKind {
    /// The host returned to the foreground.
    Resumed,
    /// The host moved to the background.
    Paused,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after every precondition update.
#[derive(Clone, Copy, Debug)]
pub struct PreconditionEvent {
    /// Host time of the update.
    pub timestamp: HostTime,
    /// The input that changed.
    pub update: Precondition,
    /// Combined readiness after the update.
    pub all_ready: bool,
    /// Gate state after re-evaluation.
    pub gate: GateState,
}

/// Emitted when the gate fires the activation side effect.
#[derive(Clone, Copy, Debug)]
pub struct ActivationEvent {
    /// Host time of activation.
    pub timestamp: HostTime,
    /// Surface instance that was activated.
    pub surface: SurfaceId,
    /// Status of the native activate call, `None` on success.
    pub error_status: Option<i32>,
}

/// Emitted once when a terminal failure is reported to the host.
#[derive(Clone, Copy, Debug)]
pub struct FailureEvent {
    /// Host time of the report.
    pub timestamp: HostTime,
    /// Why activation became impossible.
    pub reason: FailureReason,
}

/// Emitted at each surface lifecycle step.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceEvent {
    /// Host time of the step.
    pub timestamp: HostTime,
    /// Surface instance.
    pub surface: SurfaceId,
    /// What happened.
    pub kind: SurfaceEventKind,
}

/// Emitted at each render-loop lifecycle step.
#[derive(Clone, Copy, Debug)]
pub struct RenderLoopEvent {
    /// Host time of the step.
    pub timestamp: HostTime,
    /// Surface instance the loop draws to.
    pub surface: SurfaceId,
    /// What happened.
    pub kind: RenderLoopEventKind,
}

/// Emitted after each run of the AR availability / install flow.
#[derive(Clone, Copy, Debug)]
pub struct ArCheckEvent {
    /// Host time of the check.
    pub timestamp: HostTime,
    /// Raw availability answer.
    pub availability: ArAvailability,
    /// Whether an install request was issued and with which prompt flag.
    pub install_prompt: Option<bool>,
    /// Resulting readiness.
    pub readiness: ArReadiness,
}

/// Emitted on host foreground/background transitions.
#[derive(Clone, Copy, Debug)]
pub struct HostLifecycleEvent {
    /// Host time of the transition.
    pub timestamp: HostTime,
    /// Direction of the transition.
    pub kind: HostLifecycleKind,
}

/// Emitted by the render thread after every `draw_frame` call.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct FrameDrawnEvent {
    /// Surface instance.
    pub surface: SurfaceId,
    /// Timing passed to the draw call.
    pub frame: FrameTime,
    /// Host time after the draw returned.
    pub finished: HostTime,
    /// The draw error, if any.
    pub error: Option<FrameError>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the coordinator.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after every precondition update.
    fn on_precondition(&mut self, e: &PreconditionEvent) {
        _ = e;
    }

    /// Called when the activation side effect runs.
    fn on_activation(&mut self, e: &ActivationEvent) {
        _ = e;
    }

    /// Called when a terminal failure is reported.
    fn on_failure(&mut self, e: &FailureEvent) {
        _ = e;
    }

    /// Called at each surface lifecycle step.
    fn on_surface(&mut self, e: &SurfaceEvent) {
        _ = e;
    }

    /// Called at each render-loop lifecycle step.
    fn on_render_loop(&mut self, e: &RenderLoopEvent) {
        _ = e;
    }

    /// Called after each AR availability / install check.
    fn on_ar_check(&mut self, e: &ArCheckEvent) {
        _ = e;
    }

    /// Called on host foreground/background transitions.
    fn on_host_lifecycle(&mut self, e: &HostLifecycleEvent) {
        _ = e;
    }

    /// Called after every frame (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_frame_drawn(&mut self, e: &FrameDrawnEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` forwarding method for one sink method.
macro_rules! forward {
    ($(#[$meta:meta])* $name:ident => $sink_method:ident($event:ty)) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`PreconditionEvent`].
        precondition => on_precondition(PreconditionEvent)
    );
    forward!(
        /// Emits an [`ActivationEvent`].
        activation => on_activation(ActivationEvent)
    );
    forward!(
        /// Emits a [`FailureEvent`].
        failure => on_failure(FailureEvent)
    );
    forward!(
        /// Emits a [`SurfaceEvent`].
        surface => on_surface(SurfaceEvent)
    );
    forward!(
        /// Emits a [`RenderLoopEvent`].
        render_loop => on_render_loop(RenderLoopEvent)
    );
    forward!(
        /// Emits an [`ArCheckEvent`].
        ar_check => on_ar_check(ArCheckEvent)
    );
    forward!(
        /// Emits a [`HostLifecycleEvent`].
        host_lifecycle => on_host_lifecycle(HostLifecycleEvent)
    );

    /// Emits a [`FrameDrawnEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn frame_drawn(&mut self, e: &FrameDrawnEvent) {
        if let Some(s) = &mut self.sink {
            s.on_frame_drawn(e);
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        failures: u32,
        surfaces: u32,
    }

    impl TraceSink for CountingSink {
        fn on_failure(&mut self, _e: &FailureEvent) {
            self.failures += 1;
        }

        fn on_surface(&mut self, _e: &SurfaceEvent) {
            self.surfaces += 1;
        }
    }

    #[test]
    fn tracer_dispatches_to_overridden_methods_only() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.failure(&FailureEvent {
                timestamp: HostTime(1),
                reason: FailureReason::ArUnsupported,
            });
            tracer.surface(&SurfaceEvent {
                timestamp: HostTime(2),
                surface: SurfaceId(0),
                kind: SurfaceEventKind::Created,
            });
            tracer.host_lifecycle(&HostLifecycleEvent {
                timestamp: HostTime(3),
                kind: HostLifecycleKind::Paused,
            });
        }
        assert_eq!(sink.failures, 1);
        assert_eq!(sink.surfaces, 1);
    }

    #[test]
    fn none_tracer_is_silent() {
        let mut tracer = Tracer::none();
        tracer.failure(&FailureEvent {
            timestamp: HostTime(1),
            reason: FailureReason::PermissionDenied,
        });
    }
}
