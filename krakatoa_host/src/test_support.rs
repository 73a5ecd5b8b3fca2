// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fake collaborators that record every call in order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use krakatoa_core::backend::{
    ArAvailability, ArSubsystem, InstallStatus, NativeBackend, NativeContext,
};
use krakatoa_core::error::{FrameError, NativeError};
use krakatoa_core::frame::FrameTime;
use krakatoa_core::input::{TouchEvent, TouchPhase};
use krakatoa_core::surface::SurfaceGeometry;
use parking_lot::Mutex;

/// Spins until `cond` holds, failing the test after five seconds.
pub(crate) fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_micros(100));
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    CreateContext,
    Resize(SurfaceGeometry),
    Touch(TouchPhase),
    Activate,
    Pause,
    Resume,
    Destroy { draw_in_flight: bool },
    Release,
    CheckAvailability,
    RequestInstall { prompt: bool },
}

#[derive(Default)]
struct LogInner {
    calls: Mutex<Vec<Call>>,
    draws: AtomicU64,
}

/// Ordered call log shared by all fakes of one test.
#[derive(Clone, Default)]
pub(crate) struct CallLog(Arc<LogInner>);

impl CallLog {
    pub(crate) fn push(&self, call: Call) {
        self.0.calls.lock().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.calls.lock().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.0.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub(crate) fn draws(&self) -> u64 {
        self.0.draws.load(Ordering::Acquire)
    }
}

#[derive(Clone, Default)]
struct Script {
    create_status: Option<i32>,
    activate_status: Option<i32>,
    fatal_at_frame: Option<u64>,
    fatal_once: bool,
}

pub(crate) struct FakeBackend {
    log: CallLog,
    script: Script,
    fatal_fired: Arc<AtomicBool>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::with_log(CallLog::default())
    }

    pub(crate) fn with_log(log: CallLog) -> Self {
        Self {
            log,
            script: Script::default(),
            fatal_fired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub(crate) fn failing_create(mut self, status: i32) -> Self {
        self.script.create_status = Some(status);
        self
    }

    pub(crate) fn failing_activate(mut self, status: i32) -> Self {
        self.script.activate_status = Some(status);
        self
    }

    pub(crate) fn fatal_once_at_frame(mut self, index: u64) -> Self {
        self.script.fatal_at_frame = Some(index);
        self.script.fatal_once = true;
        self
    }
}

impl NativeBackend for FakeBackend {
    type Surface = ();
    type Assets = ();
    type Context = FakeContext;

    fn create_context(&mut self, _surface: (), _assets: &()) -> Result<FakeContext, NativeError> {
        if let Some(status) = self.script.create_status {
            return Err(NativeError::new(status));
        }
        self.log.push(Call::CreateContext);
        Ok(FakeContext {
            log: self.log.clone(),
            script: self.script.clone(),
            fatal_fired: Arc::clone(&self.fatal_fired),
            in_draw: AtomicBool::new(false),
        })
    }

    fn release(&mut self) {
        self.log.push(Call::Release);
    }
}

pub(crate) struct FakeContext {
    log: CallLog,
    script: Script,
    fatal_fired: Arc<AtomicBool>,
    in_draw: AtomicBool,
}

impl NativeContext for FakeContext {
    fn resize(&self, geometry: SurfaceGeometry) {
        self.log.push(Call::Resize(geometry));
    }

    fn draw_frame(&self, frame: &FrameTime) -> Result<(), FrameError> {
        self.in_draw.store(true, Ordering::Release);
        self.log.0.draws.fetch_add(1, Ordering::AcqRel);
        thread::sleep(Duration::from_micros(100));

        let fatal = self.script.fatal_at_frame == Some(frame.index)
            && !(self.script.fatal_once && self.fatal_fired.swap(true, Ordering::AcqRel));
        self.in_draw.store(false, Ordering::Release);
        if fatal { Err(FrameError::Fatal(-1)) } else { Ok(()) }
    }

    fn forward_touch(&self, event: TouchEvent) {
        self.log.push(Call::Touch(event.phase));
    }

    fn activate(&self) -> Result<(), NativeError> {
        self.log.push(Call::Activate);
        match self.script.activate_status {
            Some(status) => Err(NativeError::new(status)),
            None => Ok(()),
        }
    }

    fn pause(&self) {
        self.log.push(Call::Pause);
    }

    fn resume(&self) {
        self.log.push(Call::Resume);
    }

    fn destroy(self) {
        self.log.push(Call::Destroy {
            draw_in_flight: self.in_draw.load(Ordering::Acquire),
        });
    }
}

/// Mutable answers for [`FakeAr`], changeable while the coordinator owns it.
pub(crate) struct ArScript {
    pub(crate) availability: ArAvailability,
    pub(crate) install: Result<InstallStatus, NativeError>,
}

pub(crate) struct FakeAr {
    log: CallLog,
    script: Arc<Mutex<ArScript>>,
}

impl FakeAr {
    pub(crate) fn new(
        log: CallLog,
        availability: ArAvailability,
        install: Result<InstallStatus, NativeError>,
    ) -> Self {
        Self {
            log,
            script: Arc::new(Mutex::new(ArScript {
                availability,
                install,
            })),
        }
    }

    pub(crate) fn installed(log: CallLog) -> Self {
        Self::new(log, ArAvailability::Installed, Ok(InstallStatus::Installed))
    }

    pub(crate) fn script(&self) -> Arc<Mutex<ArScript>> {
        Arc::clone(&self.script)
    }
}

impl ArSubsystem for FakeAr {
    fn check_availability(&mut self) -> ArAvailability {
        self.log.push(Call::CheckAvailability);
        self.script.lock().availability
    }

    fn request_install(
        &mut self,
        prompt_user_if_first_time: bool,
    ) -> Result<InstallStatus, NativeError> {
        self.log.push(Call::RequestInstall {
            prompt: prompt_user_if_first_time,
        });
        self.script.lock().install
    }
}
