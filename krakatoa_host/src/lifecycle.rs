// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface lifecycle: native context ownership and stop-then-destroy.
//!
//! [`SurfaceLifecycleController`] reacts to the platform surface callbacks.
//! It owns the native context for the current surface instance, the render
//! loop that draws into it, and the activation gate for that instance.
//!
//! Teardown always runs in this order:
//!
//! 1. stop the render loop and join the worker,
//! 2. destroy the native context,
//! 3. mark the surface destroyed and reset activation.
//!
//! Step 1 joins the worker, so no draw call can overlap step 2. The context
//! is held in an [`Arc`] and the worker holds a clone for as long as it runs.
//! Step 2 unwraps the `Arc`, so a reference that outlived the worker is
//! reported as an [`InvariantViolation`] instead of racing the destroy.

use std::fmt;
use std::sync::Arc;

use krakatoa_core::backend::{NativeBackend, NativeContext};
use krakatoa_core::error::{FailureReason, InvariantViolation};
use krakatoa_core::gate::{ActivationGate, GateOutcome, GateState};
use krakatoa_core::input::TouchEvent;
use krakatoa_core::state::{ActivationState, SurfaceState};
use krakatoa_core::surface::{SurfaceGeometry, SurfaceId};
use krakatoa_core::trace::{SurfaceEvent, SurfaceEventKind};

use crate::clock;
use crate::config::RenderLoopConfig;
use crate::error::{Error, RenderFault};
use crate::render_loop::RenderLoop;
use crate::tracing::SharedTrace;

/// Owns the native context and render loop for one surface at a time.
pub struct SurfaceLifecycleController<B: NativeBackend> {
    backend: B,
    context: Option<Arc<B::Context>>,
    render_loop: RenderLoop,
    gate: ActivationGate,
    state: SurfaceState,
    surface: SurfaceId,
    next_surface: SurfaceId,
    geometry: Option<SurfaceGeometry>,
    loop_started: bool,
    released: bool,
    trace: SharedTrace,
}

impl<B: NativeBackend> fmt::Debug for SurfaceLifecycleController<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceLifecycleController")
            .field("state", &self.state)
            .field("surface", &self.surface)
            .field("gate", &self.gate)
            .field("geometry", &self.geometry)
            .field("render_loop", &self.render_loop)
            .finish_non_exhaustive()
    }
}

impl<B: NativeBackend> SurfaceLifecycleController<B> {
    /// Creates a controller with no surface.
    #[must_use]
    pub fn new(backend: B, config: RenderLoopConfig, trace: SharedTrace) -> Self {
        Self {
            backend,
            context: None,
            render_loop: RenderLoop::new(config, trace.clone()),
            gate: ActivationGate::new(),
            state: SurfaceState::NotReady,
            surface: SurfaceId::default(),
            next_surface: SurfaceId::default(),
            geometry: None,
            loop_started: false,
            released: false,
            trace,
        }
    }

    /// The platform surface became available.
    ///
    /// Starts a new surface instance and creates its native context.
    ///
    /// # Errors
    ///
    /// [`Error::NativeContextCreationFailed`] if the backend fails; the
    /// surface stays [`SurfaceState::NotReady`]. An
    /// [`InvariantViolation::SurfaceAlreadyCreated`] if the previous instance
    /// was never destroyed.
    pub fn created(&mut self, surface: B::Surface, assets: &B::Assets) -> Result<SurfaceId, Error> {
        if self.state == SurfaceState::Ready {
            log::error!(
                "surface created while {:?} is still ready; destroy was never delivered",
                self.surface
            );
            return Err(InvariantViolation::SurfaceAlreadyCreated.into());
        }

        self.gate.reset();
        self.geometry = None;
        self.loop_started = false;
        self.state = SurfaceState::NotReady;
        self.surface = self.next_surface;
        self.next_surface = self.surface.next();
        let id = self.surface;

        match self.backend.create_context(surface, assets) {
            Ok(context) => {
                self.context = Some(Arc::new(context));
                self.state = SurfaceState::Ready;
                log::info!("native context created for {id:?}");
                self.emit(SurfaceEventKind::Created);
                Ok(id)
            }
            Err(error) => {
                log::error!("native context creation failed for {id:?}: {error}");
                self.emit(SurfaceEventKind::CreateFailed {
                    status: error.status,
                });
                Err(Error::NativeContextCreationFailed(error))
            }
        }
    }

    /// The surface changed size or rotation.
    ///
    /// Forwards the geometry and, the first time a drawable geometry arrives
    /// for this instance, starts the render loop. Returns whether the loop
    /// was started by this call. A loop that faulted is not restarted here;
    /// see [`restart_render_loop`](Self::restart_render_loop).
    ///
    /// # Errors
    ///
    /// Errors from [`RenderLoop::start`].
    pub fn changed(&mut self, geometry: SurfaceGeometry) -> Result<bool, Error> {
        let Some(context) = self.ready_context() else {
            log::warn!("surface changed to {geometry:?} while not ready; ignoring");
            return Ok(false);
        };
        context.resize(geometry);
        self.geometry = Some(geometry);
        self.emit(SurfaceEventKind::Changed(geometry));

        if self.loop_started || !geometry.is_drawable() {
            return Ok(false);
        }
        self.start_render_loop()?;
        Ok(true)
    }

    /// The platform surface is going away.
    ///
    /// Stops the render loop, destroys the native context, then marks the
    /// instance destroyed and resets activation. Does nothing if no surface
    /// is ready.
    ///
    /// A fault the render loop recorded before the stop stays available to
    /// [`take_render_fault`](Self::take_render_fault).
    ///
    /// # Errors
    ///
    /// [`InvariantViolation::ContextStillShared`] if something else still
    /// holds the native context. The instance is still marked destroyed.
    pub fn destroyed(&mut self) -> Result<(), Error> {
        if self.state != SurfaceState::Ready {
            log::debug!("surface destroyed while {:?}; nothing to tear down", self.state);
            return Ok(());
        }

        if let Some(exit) = self.render_loop.stop()
            && exit.faulted
        {
            log::info!("render loop for {:?} had faulted before teardown", self.surface);
        }

        let destroyed = match self.context.take().map(Arc::try_unwrap) {
            Some(Ok(context)) => {
                context.destroy();
                log::info!("native context destroyed for {:?}", self.surface);
                self.emit(SurfaceEventKind::ContextDestroyed);
                Ok(())
            }
            Some(Err(_shared)) => {
                log::error!(
                    "native context for {:?} still shared at destroy; dropping without destroy",
                    self.surface
                );
                Err(InvariantViolation::ContextStillShared.into())
            }
            None => Ok(()),
        };

        self.state = SurfaceState::Destroyed;
        self.gate.reset();
        self.geometry = None;
        self.loop_started = false;
        self.emit(SurfaceEventKind::Destroyed);
        destroyed
    }

    /// Starts the render loop again after a fault, using the current native
    /// context. Returns `false` if no surface is ready, or if the instance
    /// has not yet received a drawable size through [`changed`](Self::changed).
    ///
    /// # Errors
    ///
    /// [`Error::RenderLoopAlreadyRunning`] if the loop is running, or a spawn
    /// error.
    pub fn restart_render_loop(&mut self) -> Result<bool, Error> {
        if self.ready_context().is_none() {
            log::warn!("render loop restart requested with no ready surface");
            return Ok(false);
        }
        let drawable = self.geometry.is_some_and(|g| g.is_drawable());
        if !self.loop_started || !drawable {
            log::warn!(
                "render loop restart requested before {:?} has a drawable size",
                self.surface
            );
            return Ok(false);
        }
        if self.render_loop.is_running() {
            return Err(Error::RenderLoopAlreadyRunning);
        }
        if let Some(fault) = self.render_loop.take_fault() {
            log::info!("restarting render loop after fault: {fault}");
        }
        self.start_render_loop()?;
        Ok(true)
    }

    /// Feeds the latest readiness into this instance's activation gate. The
    /// activation side effect calls [`NativeContext::activate`].
    pub fn evaluate_gate(
        &mut self,
        all_ready: bool,
        failure: Option<FailureReason>,
    ) -> GateOutcome<Result<(), Error>> {
        let context = self.ready_context().map(Arc::clone);
        let surface = self.surface;
        self.gate
            .on_preconditions_changed(all_ready, failure, move || match context {
                Some(context) => {
                    log::info!("activating AR rendering for {surface:?}");
                    context.activate().map_err(Error::ActivationFailed)
                }
                None => Err(InvariantViolation::ActivationWithoutContext.into()),
            })
    }

    /// Forwards a touch event to the native context, if any.
    pub fn forward_touch(&self, event: TouchEvent) {
        match self.ready_context() {
            Some(context) => context.forward_touch(event),
            None => log::debug!("touch {:?} dropped: no ready surface", event.phase),
        }
    }

    /// The host moved to the background: freeze frame time and pause the
    /// native context.
    pub fn pause(&self) {
        self.render_loop.set_paused(true);
        if let Some(context) = self.ready_context() {
            context.pause();
        }
    }

    /// The host returned to the foreground.
    pub fn resume(&self) {
        self.render_loop.set_paused(false);
        if let Some(context) = self.ready_context() {
            context.resume();
        }
    }

    /// Tears down a live surface and releases the backend. Idempotent.
    ///
    /// # Errors
    ///
    /// Errors from [`destroyed`](Self::destroyed). The backend is released
    /// regardless.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        let result = self.destroyed();
        if !self.released {
            self.backend.release();
            self.released = true;
            log::info!("native backend released");
        }
        result
    }

    /// Takes a fault recorded by the render loop, including one from a loop
    /// already stopped by teardown. Returns each fault once.
    pub fn take_render_fault(&mut self) -> Option<RenderFault> {
        self.render_loop.take_fault()
    }

    /// Current surface state.
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Activation state of the current instance.
    #[must_use]
    pub fn activation_state(&self) -> ActivationState {
        self.gate.activation_state()
    }

    /// Full gate state of the current instance.
    #[must_use]
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Id of the current (or most recent) surface instance.
    #[must_use]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    /// Last geometry forwarded for the current instance.
    #[must_use]
    pub fn geometry(&self) -> Option<SurfaceGeometry> {
        self.geometry
    }

    /// Whether the render worker is running.
    #[must_use]
    pub fn is_render_loop_running(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Whether frame time is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.render_loop.is_paused()
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn ready_context(&self) -> Option<&Arc<B::Context>> {
        match self.state {
            SurfaceState::Ready => self.context.as_ref(),
            SurfaceState::NotReady | SurfaceState::Destroyed => None,
        }
    }

    fn start_render_loop(&mut self) -> Result<(), Error> {
        let Some(context) = self.ready_context().map(Arc::clone) else {
            return Ok(());
        };
        self.render_loop
            .start(self.surface, move |frame| context.draw_frame(frame))?;
        self.loop_started = true;
        Ok(())
    }

    fn emit(&self, kind: SurfaceEventKind) {
        let surface = self.surface;
        self.trace.with(|t| {
            t.surface(&SurfaceEvent {
                timestamp: clock::now(),
                surface,
                kind,
            });
        });
    }
}

impl<B: NativeBackend> Drop for SurfaceLifecycleController<B> {
    fn drop(&mut self) {
        if let Err(error) = self.destroyed() {
            log::error!("surface teardown on drop failed: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeBackend, wait_until};
    use krakatoa_core::error::FrameError;
    use krakatoa_core::input::TouchPhase;
    use krakatoa_core::surface::Rotation;

    fn controller(backend: FakeBackend) -> SurfaceLifecycleController<FakeBackend> {
        SurfaceLifecycleController::new(backend, RenderLoopConfig::android(), SharedTrace::none())
    }

    const GEOMETRY: SurfaceGeometry = SurfaceGeometry::new(800, 600, Rotation::R0);

    #[test]
    fn stop_completes_before_context_destroy() {
        let backend = FakeBackend::new();
        let log = backend.log();
        let mut surface = controller(backend);

        surface.created((), &()).unwrap();
        assert!(surface.changed(GEOMETRY).unwrap());
        wait_until(|| log.draws() >= 1);
        surface.destroyed().unwrap();

        let calls = log.calls();
        assert_eq!(calls.first(), Some(&Call::CreateContext));
        assert_eq!(calls.get(1), Some(&Call::Resize(GEOMETRY)));
        assert_eq!(
            calls.last(),
            Some(&Call::Destroy {
                draw_in_flight: false
            })
        );
        assert_eq!(surface.state(), SurfaceState::Destroyed);
        assert!(!surface.is_render_loop_running());
    }

    #[test]
    fn loop_starts_once_per_instance() {
        let backend = FakeBackend::new();
        let mut surface = controller(backend);
        surface.created((), &()).unwrap();
        assert!(surface.changed(GEOMETRY).unwrap());
        let rotated = SurfaceGeometry::new(600, 800, Rotation::R90);
        assert!(!surface.changed(rotated).unwrap());
        assert_eq!(surface.geometry(), Some(rotated));
        assert!(surface.is_render_loop_running());
        surface.destroyed().unwrap();
    }

    #[test]
    fn zero_sized_geometry_does_not_start_loop() {
        let mut surface = controller(FakeBackend::new());
        surface.created((), &()).unwrap();
        assert!(!surface.changed(SurfaceGeometry::new(0, 600, Rotation::R0)).unwrap());
        assert!(!surface.is_render_loop_running());
        assert!(surface.changed(GEOMETRY).unwrap());
    }

    #[test]
    fn changed_before_created_is_ignored() {
        let backend = FakeBackend::new();
        let log = backend.log();
        let mut surface = controller(backend);
        assert!(!surface.changed(GEOMETRY).unwrap());
        assert!(log.calls().is_empty());
    }

    #[test]
    fn create_failure_leaves_surface_not_ready() {
        let mut surface = controller(FakeBackend::new().failing_create(-2));
        let err = surface.created((), &()).unwrap_err();
        assert!(matches!(err, Error::NativeContextCreationFailed(e) if e.status == -2));
        assert_eq!(surface.state(), SurfaceState::NotReady);
        assert!(surface.backend().log().calls().is_empty());
        surface.destroyed().unwrap();
    }

    #[test]
    fn double_create_is_an_invariant_violation() {
        let mut surface = controller(FakeBackend::new());
        surface.created((), &()).unwrap();
        let err = surface.created((), &()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvariantViolation(InvariantViolation::SurfaceAlreadyCreated)
        ));
        assert_eq!(surface.state(), SurfaceState::Ready);
    }

    #[test]
    fn fault_is_not_restarted_by_changed() {
        let backend = FakeBackend::new().fatal_once_at_frame(1);
        let log = backend.log();
        let mut surface = controller(backend);
        surface.created((), &()).unwrap();
        surface.changed(GEOMETRY).unwrap();

        wait_until(|| !surface.is_render_loop_running());
        assert_eq!(
            surface.take_render_fault(),
            Some(RenderFault::Frame(FrameError::Fatal(-1)))
        );
        assert!(!surface.changed(SurfaceGeometry::new(640, 480, Rotation::R0)).unwrap());
        assert!(!surface.is_render_loop_running());

        assert!(surface.restart_render_loop().unwrap());
        let before = log.draws();
        wait_until(|| log.draws() >= before + 3);
        assert!(surface.is_render_loop_running());
        assert!(matches!(
            surface.restart_render_loop(),
            Err(Error::RenderLoopAlreadyRunning)
        ));
        surface.destroyed().unwrap();
    }

    #[test]
    fn fault_outlives_destroy() {
        let mut surface = controller(FakeBackend::new().fatal_once_at_frame(0));
        surface.created((), &()).unwrap();
        surface.changed(GEOMETRY).unwrap();
        wait_until(|| !surface.is_render_loop_running());

        surface.destroyed().unwrap();
        assert_eq!(surface.state(), SurfaceState::Destroyed);
        assert_eq!(
            surface.take_render_fault(),
            Some(RenderFault::Frame(FrameError::Fatal(-1)))
        );
        assert_eq!(surface.take_render_fault(), None);
    }

    #[test]
    fn restart_requires_a_drawable_size() {
        let backend = FakeBackend::new();
        let log = backend.log();
        let mut surface = controller(backend);
        surface.created((), &()).unwrap();

        assert!(!surface.restart_render_loop().unwrap());
        assert!(!surface.is_render_loop_running());
        assert_eq!(log.draws(), 0);
        assert_eq!(surface.geometry(), None);

        assert!(!surface.changed(SurfaceGeometry::new(0, 0, Rotation::R0)).unwrap());
        assert!(!surface.restart_render_loop().unwrap());
        assert_eq!(log.draws(), 0);
    }

    #[test]
    fn recreate_gets_new_id_and_fresh_gate() {
        let mut surface = controller(FakeBackend::new());
        let first = surface.created((), &()).unwrap();
        assert!(matches!(
            surface.evaluate_gate(true, None),
            GateOutcome::Activated(Ok(()))
        ));
        assert_eq!(surface.activation_state(), ActivationState::Active);

        surface.destroyed().unwrap();
        assert_eq!(surface.activation_state(), ActivationState::Inactive);

        let second = surface.created((), &()).unwrap();
        assert_eq!(second, first.next());
        assert!(matches!(
            surface.evaluate_gate(true, None),
            GateOutcome::Activated(Ok(()))
        ));
    }

    #[test]
    fn activation_error_is_surfaced() {
        let mut surface = controller(FakeBackend::new().failing_activate(-5));
        surface.created((), &()).unwrap();
        match surface.evaluate_gate(true, None) {
            GateOutcome::Activated(Err(Error::ActivationFailed(e))) => assert_eq!(e.status, -5),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(surface.activation_state(), ActivationState::Active);
    }

    #[test]
    fn touch_pause_resume_reach_the_context() {
        let backend = FakeBackend::new();
        let log = backend.log();
        let mut surface = controller(backend);
        surface.forward_touch(TouchEvent::new(1.0, 2.0, TouchPhase::Down));
        surface.created((), &()).unwrap();
        surface.forward_touch(TouchEvent::new(1.0, 2.0, TouchPhase::Up));
        surface.pause();
        assert!(surface.is_paused());
        surface.resume();
        assert!(!surface.is_paused());

        assert_eq!(
            log.calls()[1..],
            [
                Call::Touch(TouchPhase::Up),
                Call::Pause,
                Call::Resume
            ]
        );
    }

    #[test]
    fn drop_tears_down_live_surface() {
        let backend = FakeBackend::new();
        let log = backend.log();
        {
            let mut surface = controller(backend);
            surface.created((), &()).unwrap();
            surface.changed(GEOMETRY).unwrap();
            wait_until(|| log.draws() >= 1);
        }
        assert_eq!(
            log.calls().last(),
            Some(&Call::Destroy {
                draw_in_flight: false
            })
        );
    }

    #[test]
    fn shutdown_releases_backend_once() {
        let backend = FakeBackend::new();
        let log = backend.log();
        let mut surface = controller(backend);
        surface.created((), &()).unwrap();
        surface.shutdown().unwrap();
        surface.shutdown().unwrap();
        let releases = log.calls().iter().filter(|c| **c == Call::Release).count();
        assert_eq!(releases, 1);
    }
}
