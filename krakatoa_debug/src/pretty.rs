// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use krakatoa_core::trace::{
    ActivationEvent, ArCheckEvent, FailureEvent, FrameDrawnEvent, HostLifecycleEvent,
    PreconditionEvent, RenderLoopEvent, RenderLoopEventKind, SurfaceEvent, SurfaceEventKind,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write + Send>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_precondition(&mut self, e: &PreconditionEvent) {
        let _ = writeln!(
            self.writer,
            "[precondition] {:?} all_ready={} gate={:?} at {:.1}µs",
            e.update,
            e.all_ready,
            e.gate,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_activation(&mut self, e: &ActivationEvent) {
        let outcome = match e.error_status {
            None => "ok".to_owned(),
            Some(status) => format!("FAILED status={status}"),
        };
        let _ = writeln!(
            self.writer,
            "[activate] {:?} {outcome} at {:.1}µs",
            e.surface,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_failure(&mut self, e: &FailureEvent) {
        let _ = writeln!(
            self.writer,
            "[failure] {} at {:.1}µs",
            e.reason,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        let what = match e.kind {
            SurfaceEventKind::Created => "created".to_owned(),
            SurfaceEventKind::CreateFailed { status } => format!("create failed status={status}"),
            SurfaceEventKind::Changed(g) => format!(
                "changed {}x{} rotation={}°",
                g.width,
                g.height,
                g.rotation.degrees()
            ),
            SurfaceEventKind::ContextDestroyed => "context destroyed".to_owned(),
            SurfaceEventKind::Destroyed => "destroyed".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[surface] {:?} {what} at {:.1}µs",
            e.surface,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_render_loop(&mut self, e: &RenderLoopEvent) {
        let what = match e.kind {
            RenderLoopEventKind::Started => "started".to_owned(),
            RenderLoopEventKind::StopRequested => "stop requested".to_owned(),
            RenderLoopEventKind::Stopped { frames } => format!("stopped frames={frames}"),
            RenderLoopEventKind::Faulted { status: Some(status) } => {
                format!("FAULTED status={status}")
            }
            RenderLoopEventKind::Faulted { status: None } => "FAULTED (panic)".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[render] {:?} {what} at {:.1}µs",
            e.surface,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_ar_check(&mut self, e: &ArCheckEvent) {
        let prompt = match e.install_prompt {
            Some(true) => "prompt",
            Some(false) => "no-prompt",
            None => "-",
        };
        let _ = writeln!(
            self.writer,
            "[ar] availability={:?} install={prompt} readiness={:?} at {:.1}µs",
            e.availability,
            e.readiness,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_host_lifecycle(&mut self, e: &HostLifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[host] {:?} at {:.1}µs",
            e.kind,
            e.timestamp.as_micros_f64(),
        );
    }

    fn on_frame_drawn(&mut self, e: &FrameDrawnEvent) {
        let draw_us = e.finished.saturating_duration_since(e.frame.now).nanos() as f64 / 1000.0;
        let _ = writeln!(
            self.writer,
            "[frame] {:?} #{} dt={:.2}ms draw={draw_us:.1}µs{}",
            e.surface,
            e.frame.index,
            e.frame.delta.as_secs_f32() * 1000.0,
            e.error.map_or(String::new(), |err| format!(" error={err}")),
        );
    }
}
