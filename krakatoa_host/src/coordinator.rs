// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing facade.
//!
//! [`Coordinator`] is what the platform glue calls from its lifecycle
//! callbacks, all on one control thread. It owns:
//!
//! - the [`PreconditionTracker`], which outlives surface instances so that a
//!   recreated surface can activate again without re-asking for permission
//!   or re-checking AR,
//! - the [`SurfaceLifecycleController`] with the per-instance gate and the
//!   render loop,
//! - the [`ArInstallFlow`].
//!
//! Every input updates the tracker and re-evaluates the gate. A terminal
//! failure is returned as an `Err` once for the whole process; later calls
//! that re-observe it return `Ok(())`.
//!
//! # Example
//!
//! ```rust,ignore
//! // onCreate: permission already granted.
//! coordinator.on_permission_result(true)?;
//! // surfaceCreated / surfaceChanged
//! coordinator.on_surface_created(window, &assets)?;
//! coordinator.on_surface_changed(SurfaceGeometry::new(w, h, rotation))?;
//! // onResume: an install prompt finished.
//! coordinator.on_resume_foreground()?;
//! // surfaceDestroyed: blocks until the render thread has exited.
//! coordinator.on_surface_destroyed()?;
//! ```

use std::fmt;

use krakatoa_core::backend::{ArSubsystem, NativeBackend};
use krakatoa_core::error::FailureReason;
use krakatoa_core::gate::GateOutcome;
use krakatoa_core::input::{TouchEvent, TouchPhase};
use krakatoa_core::precondition::{Precondition, PreconditionTracker};
use krakatoa_core::state::{ActivationState, ArReadiness, PermissionState, SurfaceState};
use krakatoa_core::surface::{SurfaceGeometry, SurfaceId};
use krakatoa_core::trace::{
    ActivationEvent, ArCheckEvent, FailureEvent, HostLifecycleEvent, HostLifecycleKind,
    PreconditionEvent,
};

use crate::ar::ArInstallFlow;
use crate::clock;
use crate::config::CoordinatorConfig;
use crate::error::Error;
use crate::lifecycle::SurfaceLifecycleController;
use crate::tracing::SharedTrace;

/// Activation gate and render-thread lifecycle coordinator.
pub struct Coordinator<B: NativeBackend, A: ArSubsystem> {
    tracker: PreconditionTracker,
    surface: SurfaceLifecycleController<B>,
    ar: ArInstallFlow<A>,
    reported: Option<FailureReason>,
    trace: SharedTrace,
}

impl<B: NativeBackend, A: ArSubsystem> fmt::Debug for Coordinator<B, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("tracker", &self.tracker)
            .field("surface", &self.surface)
            .field("ar", &self.ar)
            .field("reported", &self.reported)
            .finish_non_exhaustive()
    }
}

impl<B: NativeBackend, A: ArSubsystem> Coordinator<B, A> {
    /// Creates a coordinator with no trace sink.
    #[must_use]
    pub fn new(backend: B, ar: A, config: CoordinatorConfig) -> Self {
        Self::with_trace(backend, ar, config, SharedTrace::none())
    }

    /// Creates a coordinator that emits lifecycle events to `trace`.
    #[must_use]
    pub fn with_trace(backend: B, ar: A, config: CoordinatorConfig, trace: SharedTrace) -> Self {
        Self {
            tracker: PreconditionTracker::new(),
            surface: SurfaceLifecycleController::new(backend, config.render_loop, trace.clone()),
            ar: ArInstallFlow::new(ar, config.ar_install),
            reported: None,
            trace,
        }
    }

    // -- host callbacks ----------------------------------------------------

    /// The runtime permission prompt returned. On a grant, the AR check runs
    /// immediately.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`], or any error from the AR check and
    /// activation, each at most once.
    pub fn on_permission_result(&mut self, granted: bool) -> Result<(), Error> {
        log::info!("permission result: granted={granted}");
        self.update(Precondition::Permission(PermissionState::from_granted(
            granted,
        )))?;
        self.ensure_ar_ready()
    }

    /// The platform surface became available.
    ///
    /// # Errors
    ///
    /// [`Error::NativeContextCreationFailed`], an invariant violation, or an
    /// activation error.
    pub fn on_surface_created(
        &mut self,
        surface: B::Surface,
        assets: &B::Assets,
    ) -> Result<SurfaceId, Error> {
        let created = self.surface.created(surface, assets);
        let synced = self.update(Precondition::Surface(self.surface.state()));
        let id = created?;
        synced?;
        Ok(id)
    }

    /// The surface changed size or rotation. Starts the render loop the
    /// first time a drawable size arrives for the instance.
    ///
    /// # Errors
    ///
    /// Errors from starting the render loop.
    pub fn on_surface_changed(&mut self, geometry: SurfaceGeometry) -> Result<(), Error> {
        self.surface.changed(geometry).map(drop)
    }

    /// The platform surface is going away. Blocks until the render thread
    /// has exited, then destroys the native context.
    ///
    /// # Errors
    ///
    /// An invariant violation from teardown.
    pub fn on_surface_destroyed(&mut self) -> Result<(), Error> {
        let destroyed = self.surface.destroyed();
        let synced = self.update(Precondition::Surface(self.surface.state()));
        destroyed.and(synced)
    }

    /// The host returned to the foreground. Re-runs the AR check, which is
    /// how `Checking` and `InstallRequested` get resolved.
    ///
    /// # Errors
    ///
    /// A terminal AR failure or an activation error.
    pub fn on_resume_foreground(&mut self) -> Result<(), Error> {
        self.emit_host(HostLifecycleKind::Resumed);
        self.surface.resume();
        self.ensure_ar_ready()
    }

    /// The host moved to the background.
    pub fn on_pause_background(&mut self) {
        self.emit_host(HostLifecycleKind::Paused);
        self.surface.pause();
    }

    /// Forwards a touch event to the native context.
    pub fn on_touch(&self, event: TouchEvent) {
        self.surface.forward_touch(event);
    }

    /// Forwards a touch given as raw host values. Unknown action codes are
    /// dropped. Returns whether the event was forwarded.
    pub fn on_touch_action(&self, x: f32, y: f32, action: i32) -> bool {
        match TouchPhase::from_action_code(action) {
            Some(phase) => {
                self.on_touch(TouchEvent::new(x, y, phase));
                true
            }
            None => {
                log::debug!("ignoring touch action {action}");
                false
            }
        }
    }

    /// Collects a fault from the render loop, if one is pending.
    ///
    /// # Errors
    ///
    /// [`Error::RenderLoopFault`] once per fault.
    pub fn poll_render_fault(&mut self) -> Result<(), Error> {
        match self.surface.take_render_fault() {
            Some(fault) => Err(Error::RenderLoopFault(fault)),
            None => Ok(()),
        }
    }

    /// Starts the render loop again after a fault.
    ///
    /// # Errors
    ///
    /// [`Error::RenderLoopAlreadyRunning`] or a spawn error.
    pub fn restart_render_loop(&mut self) -> Result<(), Error> {
        self.surface.restart_render_loop().map(drop)
    }

    /// Tears down any live surface and releases the native backend.
    ///
    /// # Errors
    ///
    /// An invariant violation from teardown.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.surface.shutdown()
    }

    // -- state -------------------------------------------------------------

    /// Current permission state.
    #[must_use]
    pub fn permission(&self) -> PermissionState {
        self.tracker.permission()
    }

    /// Current AR readiness.
    #[must_use]
    pub fn ar_readiness(&self) -> ArReadiness {
        self.tracker.ar()
    }

    /// Current surface state.
    #[must_use]
    pub fn surface_state(&self) -> SurfaceState {
        self.surface.state()
    }

    /// Activation state of the current surface instance.
    #[must_use]
    pub fn activation_state(&self) -> ActivationState {
        self.surface.activation_state()
    }

    /// Id of the current (or most recent) surface instance.
    #[must_use]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface.surface_id()
    }

    /// Whether the render worker is running.
    #[must_use]
    pub fn is_render_loop_running(&self) -> bool {
        self.surface.is_render_loop_running()
    }

    /// The terminal failure already reported to the host, if any.
    #[must_use]
    pub fn reported_failure(&self) -> Option<FailureReason> {
        self.reported
    }

    /// The surface lifecycle controller.
    #[must_use]
    pub fn lifecycle(&self) -> &SurfaceLifecycleController<B> {
        &self.surface
    }

    // -- internals ---------------------------------------------------------

    fn ensure_ar_ready(&mut self) -> Result<(), Error> {
        if self.tracker.permission() != PermissionState::Granted || self.tracker.ar().is_terminal()
        {
            return Ok(());
        }
        let check = self.ar.run();
        self.trace.with(|t| {
            t.ar_check(&ArCheckEvent {
                timestamp: clock::now(),
                availability: check.availability,
                install_prompt: check.install_prompt,
                readiness: check.readiness,
            });
        });
        self.update(Precondition::Ar(check.readiness))
    }

    fn update(&mut self, update: Precondition) -> Result<(), Error> {
        let all_ready = self.tracker.update(update);
        let failure = self.tracker.failure();
        let outcome = self.surface.evaluate_gate(all_ready, failure);

        let gate = self.surface.gate_state();
        self.trace.with(|t| {
            t.precondition(&PreconditionEvent {
                timestamp: clock::now(),
                update,
                all_ready,
                gate,
            });
        });

        match outcome {
            GateOutcome::Activated(result) => {
                let surface = self.surface.surface_id();
                let error_status = match &result {
                    Err(Error::ActivationFailed(error)) => Some(error.status),
                    _ => None,
                };
                self.trace.with(|t| {
                    t.activation(&ActivationEvent {
                        timestamp: clock::now(),
                        surface,
                        error_status,
                    });
                });
                if let Err(error) = &result {
                    log::error!("activation of {surface:?} failed: {error}");
                }
                result
            }
            GateOutcome::Failed(reason) => self.report_failure(reason),
            GateOutcome::Pending | GateOutcome::Unchanged => Ok(()),
        }
    }

    fn report_failure(&mut self, reason: FailureReason) -> Result<(), Error> {
        if self.reported.is_some() {
            return Ok(());
        }
        self.reported = Some(reason);
        log::error!("activation impossible: {reason}");
        self.trace.with(|t| {
            t.failure(&FailureEvent {
                timestamp: clock::now(),
                reason,
            });
        });
        Err(match reason {
            FailureReason::PermissionDenied => Error::PermissionDenied,
            FailureReason::ArUnsupported => Error::ArUnsupported,
            FailureReason::ArInstallFailed => Error::ArInstallFailed(self.ar.install_error()),
        })
    }

    fn emit_host(&self, kind: HostLifecycleKind) {
        self.trace.with(|t| {
            t.host_lifecycle(&HostLifecycleEvent {
                timestamp: clock::now(),
                kind,
            });
        });
    }
}
