// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event, in
//! arrival order, to a `Vec` of [`RecordedEvent`]. Lifecycle events are rare
//! and small, so they are stored as-is. [`replay`] feeds a recording into
//! another sink, e.g. a [`PrettyPrintSink`](crate::pretty::PrettyPrintSink)
//! after the run.

use krakatoa_core::trace::{
    ActivationEvent, ArCheckEvent, FailureEvent, FrameDrawnEvent, HostLifecycleEvent,
    PreconditionEvent, RenderLoopEvent, SurfaceEvent, TraceSink,
};

/// One recorded event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A [`PreconditionEvent`].
    Precondition(PreconditionEvent),
    /// An [`ActivationEvent`].
    Activation(ActivationEvent),
    /// A [`FailureEvent`].
    Failure(FailureEvent),
    /// A [`SurfaceEvent`].
    Surface(SurfaceEvent),
    /// A [`RenderLoopEvent`].
    RenderLoop(RenderLoopEvent),
    /// An [`ArCheckEvent`].
    ArCheck(ArCheckEvent),
    /// A [`HostLifecycleEvent`].
    HostLifecycle(HostLifecycleEvent),
    /// A [`FrameDrawnEvent`].
    FrameDrawn(FrameDrawnEvent),
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
    record_frames: bool,
}

impl RecorderSink {
    /// Creates an empty recorder that skips per-frame events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty recorder that also keeps per-frame events.
    #[must_use]
    pub fn with_frames() -> Self {
        Self {
            events: Vec::new(),
            record_frames: true,
        }
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_precondition(&mut self, e: &PreconditionEvent) {
        self.events.push(RecordedEvent::Precondition(*e));
    }

    fn on_activation(&mut self, e: &ActivationEvent) {
        self.events.push(RecordedEvent::Activation(*e));
    }

    fn on_failure(&mut self, e: &FailureEvent) {
        self.events.push(RecordedEvent::Failure(*e));
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        self.events.push(RecordedEvent::Surface(*e));
    }

    fn on_render_loop(&mut self, e: &RenderLoopEvent) {
        self.events.push(RecordedEvent::RenderLoop(*e));
    }

    fn on_ar_check(&mut self, e: &ArCheckEvent) {
        self.events.push(RecordedEvent::ArCheck(*e));
    }

    fn on_host_lifecycle(&mut self, e: &HostLifecycleEvent) {
        self.events.push(RecordedEvent::HostLifecycle(*e));
    }

    fn on_frame_drawn(&mut self, e: &FrameDrawnEvent) {
        if self.record_frames {
            self.events.push(RecordedEvent::FrameDrawn(*e));
        }
    }
}

/// Feeds recorded events, in order, to `sink`.
pub fn replay(events: &[RecordedEvent], sink: &mut dyn TraceSink) {
    for event in events {
        match event {
            RecordedEvent::Precondition(e) => sink.on_precondition(e),
            RecordedEvent::Activation(e) => sink.on_activation(e),
            RecordedEvent::Failure(e) => sink.on_failure(e),
            RecordedEvent::Surface(e) => sink.on_surface(e),
            RecordedEvent::RenderLoop(e) => sink.on_render_loop(e),
            RecordedEvent::ArCheck(e) => sink.on_ar_check(e),
            RecordedEvent::HostLifecycle(e) => sink.on_host_lifecycle(e),
            RecordedEvent::FrameDrawn(e) => sink.on_frame_drawn(e),
        }
    }
}
