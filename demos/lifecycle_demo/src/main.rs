// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host session that exercises the coordinator end to end.
//!
//! A fake native backend and AR service stand in for the platform. The
//! session grants permission, brings up a surface, resolves a pending AR
//! install through two background/foreground cycles, rotates, tears the
//! surface down and recreates it. Every trace event goes to a
//! [`RecorderSink`], which is then replayed through a
//! [`PrettyPrintSink`] and exported as a Chrome trace.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use krakatoa_core::backend::{
    ArAvailability, ArSubsystem, InstallStatus, NativeBackend, NativeContext,
};
use krakatoa_core::error::{FrameError, NativeError};
use krakatoa_core::frame::FrameTime;
use krakatoa_core::input::TouchEvent;
use krakatoa_core::surface::{Rotation, SurfaceGeometry};
use krakatoa_core::trace::TraceSink;
use krakatoa_host::tracing::SharedTrace;
use krakatoa_host::{Coordinator, CoordinatorConfig};
use parking_lot::Mutex;

use krakatoa_debug::pretty::PrettyPrintSink;
use krakatoa_debug::recorder::{self, RecorderSink};

/// Simulated GPU time per frame.
const FRAME_TIME: Duration = Duration::from_millis(4);
/// Frames at the start of each surface that report a transient error.
const WARMUP_FRAMES: u64 = 2;
/// How long the session lets the render loop run between steps.
const STEP: Duration = Duration::from_millis(60);

// ---------------------------------------------------------------------------
// Simulated platform
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SimBackend {
    contexts: u32,
}

impl NativeBackend for SimBackend {
    type Surface = ();
    type Assets = ();
    type Context = SimContext;

    fn create_context(&mut self, _surface: (), _assets: &()) -> Result<SimContext, NativeError> {
        self.contexts += 1;
        log::info!("creating simulated context #{}", self.contexts);
        Ok(SimContext {
            touches: AtomicU32::new(0),
        })
    }

    fn release(&mut self) {
        log::info!("released simulated backend after {} contexts", self.contexts);
    }
}

#[derive(Debug)]
struct SimContext {
    touches: AtomicU32,
}

impl NativeContext for SimContext {
    fn resize(&self, geometry: SurfaceGeometry) {
        log::info!(
            "viewport {}x{} at {} degrees",
            geometry.width,
            geometry.height,
            geometry.rotation.degrees()
        );
    }

    fn draw_frame(&self, frame: &FrameTime) -> Result<(), FrameError> {
        thread::sleep(FRAME_TIME);
        if frame.index < WARMUP_FRAMES {
            // Camera image not available yet.
            return Err(FrameError::Transient(-3));
        }
        Ok(())
    }

    fn forward_touch(&self, event: TouchEvent) {
        self.touches.fetch_add(1, Ordering::Relaxed);
        log::debug!("touch {:?} at {:?}", event.phase, event.position);
    }

    fn activate(&self) -> Result<(), NativeError> {
        log::info!("AR session activated");
        Ok(())
    }

    fn destroy(self) {
        log::info!(
            "destroying simulated context ({} touches)",
            self.touches.load(Ordering::Relaxed)
        );
    }
}

/// Answers `Checking` once, then asks for an install that completes on the
/// second request.
#[derive(Debug, Default)]
struct SimAr {
    checks: u32,
    requests: u32,
}

impl ArSubsystem for SimAr {
    fn check_availability(&mut self) -> ArAvailability {
        self.checks += 1;
        match self.checks {
            1 => ArAvailability::Checking,
            2 | 3 => ArAvailability::NeedsInstall,
            _ => ArAvailability::Installed,
        }
    }

    fn request_install(
        &mut self,
        prompt_user_if_first_time: bool,
    ) -> Result<InstallStatus, NativeError> {
        self.requests += 1;
        log::info!("install requested (prompt: {prompt_user_if_first_time})");
        if self.requests == 1 {
            Ok(InstallStatus::InstallRequested)
        } else {
            Ok(InstallStatus::Installed)
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

fn main() {
    let _ = env_logger::try_init();

    let recorder = Arc::new(Mutex::new(RecorderSink::with_frames()));
    let shared: Arc<Mutex<dyn TraceSink + Send>> = recorder.clone();
    let trace = SharedTrace::from_shared(shared);

    let mut coordinator = Coordinator::with_trace(
        SimBackend::default(),
        SimAr::default(),
        CoordinatorConfig::android(),
        trace,
    );

    // -- first surface -----------------------------------------------------
    coordinator
        .on_permission_result(true)
        .expect("permission grant should not fail");
    let first = coordinator
        .on_surface_created((), &())
        .expect("surface creation failed");
    coordinator
        .on_surface_changed(SurfaceGeometry::new(1080, 2340, Rotation::R0))
        .expect("render loop failed to start");
    thread::sleep(STEP);

    // The install prompt sends the host to the background and back, twice.
    for _ in 0..2 {
        coordinator.on_pause_background();
        thread::sleep(STEP / 2);
        coordinator
            .on_resume_foreground()
            .expect("AR check failed on resume");
        thread::sleep(STEP);
    }
    println!(
        "surface {first:?}: {:?}, AR {:?}",
        coordinator.activation_state(),
        coordinator.ar_readiness()
    );

    // Down, move, up, then an action code the host does not map.
    for (i, code) in [0, 2, 1, 3].into_iter().enumerate() {
        let offset = i as f32 * 12.0;
        coordinator.on_touch_action(540.0 + offset, 1170.0 - offset, code);
    }

    coordinator
        .on_surface_changed(SurfaceGeometry::new(2340, 1080, Rotation::R90))
        .expect("rotation change failed");
    thread::sleep(STEP);
    if let Some(geometry) = coordinator.lifecycle().geometry() {
        println!("surface {first:?} now {}x{}", geometry.width, geometry.height);
    }

    if let Err(error) = coordinator.poll_render_fault() {
        log::error!("render loop fault: {error}");
    }
    coordinator
        .on_surface_destroyed()
        .expect("surface teardown failed");

    // -- second surface ----------------------------------------------------
    let second = coordinator
        .on_surface_created((), &())
        .expect("surface recreation failed");
    coordinator
        .on_surface_changed(SurfaceGeometry::new(1080, 2340, Rotation::R0))
        .expect("render loop failed to restart");
    thread::sleep(STEP);
    println!("surface {second:?}: {:?}", coordinator.activation_state());

    coordinator
        .on_surface_destroyed()
        .expect("surface teardown failed");
    coordinator.shutdown().expect("shutdown failed");
    let contexts = coordinator.lifecycle().backend().contexts;
    drop(coordinator);

    // -- report ------------------------------------------------------------
    let events = recorder.lock().events().to_vec();

    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    recorder::replay(&events, &mut pretty);

    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    krakatoa_debug::chrome::export(&events, &mut writer).expect("failed to write trace.json");

    println!(
        "Wrote {path} ({} events, {contexts} native contexts)",
        events.len()
    );
}
