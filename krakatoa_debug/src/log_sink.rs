// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridge from trace events to the `log` facade.
//!
//! [`LogSink`] emits each event as a log record under the `krakatoa::trace`
//! target. Failures and render faults log at `error`, lifecycle milestones
//! at `info`, gate bookkeeping at `debug` and per-frame events at `trace`
//! (`warn` for a fatal frame error).

use krakatoa_core::error::FrameError;
use krakatoa_core::trace::{
    ActivationEvent, ArCheckEvent, FailureEvent, FrameDrawnEvent, HostLifecycleEvent,
    PreconditionEvent, RenderLoopEvent, RenderLoopEventKind, SurfaceEvent, TraceSink,
};
use log::Level;

const TARGET: &str = "krakatoa::trace";

/// A [`TraceSink`] that writes every event to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl LogSink {
    /// Creates a log sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Log level used for a render-loop event.
fn render_loop_level(kind: RenderLoopEventKind) -> Level {
    match kind {
        RenderLoopEventKind::Faulted { .. } => Level::Error,
        RenderLoopEventKind::StopRequested => Level::Debug,
        RenderLoopEventKind::Started | RenderLoopEventKind::Stopped { .. } => Level::Info,
    }
}

/// Log level used for a drawn frame.
fn frame_level(error: Option<FrameError>) -> Level {
    match error {
        Some(error) if error.is_fatal() => Level::Warn,
        Some(_) => Level::Debug,
        None => Level::Trace,
    }
}

impl TraceSink for LogSink {
    fn on_precondition(&mut self, e: &PreconditionEvent) {
        log::debug!(
            target: TARGET,
            "precondition {:?}: all_ready={} gate={:?}",
            e.update,
            e.all_ready,
            e.gate
        );
    }

    fn on_activation(&mut self, e: &ActivationEvent) {
        match e.error_status {
            None => log::info!(target: TARGET, "activated {:?}", e.surface),
            Some(status) => log::error!(
                target: TARGET,
                "activation of {:?} failed with status {status}",
                e.surface
            ),
        }
    }

    fn on_failure(&mut self, e: &FailureEvent) {
        log::error!(target: TARGET, "activation impossible: {}", e.reason);
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        log::info!(target: TARGET, "surface {:?}: {:?}", e.surface, e.kind);
    }

    fn on_render_loop(&mut self, e: &RenderLoopEvent) {
        log::log!(
            target: TARGET,
            render_loop_level(e.kind),
            "render loop {:?}: {:?}",
            e.surface,
            e.kind
        );
    }

    fn on_ar_check(&mut self, e: &ArCheckEvent) {
        log::info!(
            target: TARGET,
            "AR check: {:?} -> {:?} (install prompt: {:?})",
            e.availability,
            e.readiness,
            e.install_prompt
        );
    }

    fn on_host_lifecycle(&mut self, e: &HostLifecycleEvent) {
        log::debug!(target: TARGET, "host {:?}", e.kind);
    }

    fn on_frame_drawn(&mut self, e: &FrameDrawnEvent) {
        log::log!(
            target: TARGET,
            frame_level(e.error),
            "frame {} of {:?}: {:?}",
            e.frame.index,
            e.surface,
            e.error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_log_at_error() {
        assert_eq!(
            render_loop_level(RenderLoopEventKind::Faulted { status: Some(-1) }),
            Level::Error
        );
        assert_eq!(
            render_loop_level(RenderLoopEventKind::Stopped { frames: 3 }),
            Level::Info
        );
        assert_eq!(
            render_loop_level(RenderLoopEventKind::StopRequested),
            Level::Debug
        );
    }

    #[test]
    fn fatal_frames_stand_out() {
        assert_eq!(frame_level(Some(FrameError::Fatal(-1))), Level::Warn);
        assert_eq!(frame_level(Some(FrameError::Transient(-3))), Level::Debug);
        assert_eq!(frame_level(None), Level::Trace);
    }
}
