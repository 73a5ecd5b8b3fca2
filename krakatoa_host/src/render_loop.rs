// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render worker thread.
//!
//! [`RenderLoop`] owns at most one worker. The worker calls the draw
//! function back to back, with no throttling, until either the control thread
//! asks it to stop or a draw call fails fatally.
//!
//! # Stop contract
//!
//! [`RenderLoop::stop`] sets a cooperative flag that the worker checks once
//! per iteration, then joins the thread. When `stop` returns, the last draw
//! call has returned and the worker has exited, so anything the draw function
//! captured may be destroyed.
//!
//! # Faults
//!
//! A [`FrameError::Fatal`] result or a panic inside the draw function stops
//! the worker by itself. The fault is parked until the control thread collects
//! it with [`RenderLoop::take_fault`], and stays parked across `stop` and
//! later starts until it is taken. The loop is never restarted
//! automatically.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use krakatoa_core::error::FrameError;
use krakatoa_core::frame::{FrameTime, FrameTimer};
use krakatoa_core::surface::SurfaceId;
use krakatoa_core::trace::{RenderLoopEvent, RenderLoopEventKind};
use parking_lot::Mutex;

use crate::clock;
use crate::config::RenderLoopConfig;
use crate::error::{Error, RenderFault};
use crate::tracing::SharedTrace;

/// Summary of a worker that has been joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopExit {
    /// Number of draw calls the worker made.
    pub frames: u64,
    /// Whether the worker stopped itself because of a fault.
    pub faulted: bool,
}

/// State shared between the control thread and one worker.
#[derive(Debug, Default)]
struct WorkerShared {
    stop: AtomicBool,
    exited: AtomicBool,
    faulted: AtomicBool,
    frames: AtomicU64,
    fault: Mutex<Option<RenderFault>>,
}

#[derive(Debug)]
struct Worker {
    surface: SurfaceId,
    shared: Arc<WorkerShared>,
    join: JoinHandle<()>,
}

/// Owner of the render worker thread.
pub struct RenderLoop {
    config: RenderLoopConfig,
    trace: SharedTrace,
    paused: Arc<AtomicBool>,
    worker: Option<Worker>,
    /// Fault moved out of a joined worker, waiting for `take_fault`.
    fault: Option<RenderFault>,
}

impl fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLoop")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

impl RenderLoop {
    /// Creates a loop with no worker.
    #[must_use]
    pub fn new(config: RenderLoopConfig, trace: SharedTrace) -> Self {
        Self {
            config,
            trace,
            paused: Arc::new(AtomicBool::new(false)),
            worker: None,
            fault: None,
        }
    }

    /// Spawns the worker for `surface`.
    ///
    /// `draw` is called once per iteration on the worker thread. A worker
    /// that already exited on its own is reaped first.
    ///
    /// # Errors
    ///
    /// [`Error::RenderLoopAlreadyRunning`] if a worker is still running, or
    /// [`Error::SpawnRenderThread`] if the OS refuses the thread.
    pub fn start<F>(&mut self, surface: SurfaceId, draw: F) -> Result<(), Error>
    where
        F: FnMut(&FrameTime) -> Result<(), FrameError> + Send + 'static,
    {
        if self.is_running() {
            return Err(Error::RenderLoopAlreadyRunning);
        }
        self.stop();

        let shared = Arc::new(WorkerShared::default());
        let ctx = WorkerContext {
            surface,
            shared: Arc::clone(&shared),
            paused: Arc::clone(&self.paused),
            trace: self.trace.clone(),
            streak: TransientStreak::new(self.config.max_consecutive_transient_errors),
        };

        let mut builder = thread::Builder::new().name(self.config.thread_name.to_owned());
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let join = builder
            .spawn(move || ctx.run(draw))
            .map_err(Error::SpawnRenderThread)?;

        log::info!("render loop started for {surface:?}");
        self.trace.with(|t| {
            t.render_loop(&RenderLoopEvent {
                timestamp: clock::now(),
                surface,
                kind: RenderLoopEventKind::Started,
            });
        });
        self.worker = Some(Worker {
            surface,
            shared,
            join,
        });
        Ok(())
    }

    /// Signals the worker to stop and blocks until it has exited.
    ///
    /// Returns `None` if there was no worker.
    pub fn stop(&mut self) -> Option<LoopExit> {
        let worker = self.worker.take()?;
        let surface = worker.surface;

        worker.shared.stop.store(true, Ordering::Release);
        self.trace.with(|t| {
            t.render_loop(&RenderLoopEvent {
                timestamp: clock::now(),
                surface,
                kind: RenderLoopEventKind::StopRequested,
            });
        });

        if worker.join.join().is_err() {
            // Draw panics are caught inside the worker; this is a bug in the
            // loop itself.
            log::error!("render thread for {surface:?} panicked outside draw_frame");
            worker.shared.faulted.store(true, Ordering::Release);
        }
        if let Some(fault) = worker.shared.fault.lock().take()
            && let Some(previous) = self.fault.replace(fault)
        {
            log::warn!("render fault never collected: {previous}");
        }

        let exit = LoopExit {
            frames: worker.shared.frames.load(Ordering::Acquire),
            faulted: worker.shared.faulted.load(Ordering::Acquire),
        };
        log::info!(
            "render loop for {surface:?} stopped after {} frames",
            exit.frames
        );
        self.trace.with(|t| {
            t.render_loop(&RenderLoopEvent {
                timestamp: clock::now(),
                surface,
                kind: RenderLoopEventKind::Stopped {
                    frames: exit.frames,
                },
            });
        });
        Some(exit)
    }

    /// Whether a worker exists and has not exited.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| !w.shared.exited.load(Ordering::Acquire))
    }

    /// Whether an OS thread for a worker is still alive. Stays true for an
    /// exited worker until it is joined by [`stop`](Self::stop).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.join.is_finished())
    }

    /// Draw calls made by the current worker, or zero if there is none.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.worker
            .as_ref()
            .map_or(0, |w| w.shared.frames.load(Ordering::Acquire))
    }

    /// Freezes or unfreezes frame time. Applies to the current worker and
    /// to any worker started later.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Whether frame time is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Takes the most recent fault, whether its worker is still parked or
    /// already joined. Returns each fault once.
    pub fn take_fault(&mut self) -> Option<RenderFault> {
        let live = self
            .worker
            .as_ref()
            .and_then(|w| w.shared.fault.lock().take());
        live.or_else(|| self.fault.take())
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

struct WorkerContext {
    surface: SurfaceId,
    shared: Arc<WorkerShared>,
    paused: Arc<AtomicBool>,
    trace: SharedTrace,
    streak: TransientStreak,
}

/// Consecutive transient frame errors, checked against an optional budget.
#[derive(Clone, Copy, Debug)]
struct TransientStreak {
    count: u32,
    budget: Option<u32>,
}

impl TransientStreak {
    fn new(budget: Option<u32>) -> Self {
        Self { count: 0, budget }
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    /// Counts one transient error. Returns the fault once the budget is spent.
    fn record(&mut self, status: i32) -> Option<RenderFault> {
        self.count = self.count.saturating_add(1);
        let limit = self.budget?;
        (self.count >= limit).then_some(RenderFault::TransientBudgetExhausted {
            count: self.count,
            last_status: status,
        })
    }
}

impl WorkerContext {
    fn run<F>(mut self, mut draw: F)
    where
        F: FnMut(&FrameTime) -> Result<(), FrameError>,
    {
        let mut timer = FrameTimer::new();
        let mut fault = None;

        while !self.shared.stop.load(Ordering::Acquire) {
            let now = clock::now();
            let paused = self.paused.load(Ordering::Acquire);
            if paused && !timer.is_paused() {
                timer.pause();
            } else if !paused && timer.is_paused() {
                timer.resume(now);
            }
            let frame = timer.tick(now);

            let result = panic::catch_unwind(AssertUnwindSafe(|| draw(&frame)));
            self.shared.frames.fetch_add(1, Ordering::AcqRel);

            #[cfg(feature = "trace-rich")]
            self.trace.with(|t| {
                t.frame_drawn(&krakatoa_core::trace::FrameDrawnEvent {
                    surface: self.surface,
                    frame,
                    finished: clock::now(),
                    error: result.as_ref().ok().and_then(|r| r.err()),
                });
            });

            match result {
                Ok(Ok(())) => self.streak.reset(),
                Ok(Err(FrameError::Transient(status))) => {
                    let exhausted = self.streak.record(status);
                    if self.streak.count == 1 {
                        log::warn!("frame {} skipped (status {status})", frame.index);
                    } else {
                        log::debug!("frame {} skipped (status {status})", frame.index);
                    }
                    if exhausted.is_some() {
                        fault = exhausted;
                        break;
                    }
                }
                Ok(Err(error)) => {
                    fault = Some(RenderFault::Frame(error));
                    break;
                }
                Err(payload) => {
                    fault = Some(RenderFault::Panicked(panic_message(payload.as_ref())));
                    break;
                }
            }
        }

        if let Some(fault) = fault {
            log::error!("render loop for {:?} faulted: {fault}", self.surface);
            let status = fault.status();
            *self.shared.fault.lock() = Some(fault);
            self.shared.faulted.store(true, Ordering::Release);
            self.trace.with(|t| {
                t.render_loop(&RenderLoopEvent {
                    timestamp: clock::now(),
                    surface: self.surface,
                    kind: RenderLoopEventKind::Faulted { status },
                });
            });
        }
        self.shared.exited.store(true, Ordering::Release);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
