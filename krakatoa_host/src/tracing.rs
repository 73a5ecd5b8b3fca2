// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A trace sink shared between the control thread and the render thread.

use std::fmt;
use std::sync::Arc;

use krakatoa_core::trace::{TraceSink, Tracer};
use parking_lot::Mutex;

/// Cloneable handle to an optional, mutex-guarded [`TraceSink`].
///
/// Each emission locks the sink for the duration of one event. With no sink
/// installed, [`with`](Self::with) does nothing and the event is never built.
#[derive(Clone, Default)]
pub struct SharedTrace {
    sink: Option<Arc<Mutex<dyn TraceSink + Send>>>,
}

impl fmt::Debug for SharedTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTrace")
            .field("enabled", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl SharedTrace {
    /// Creates a handle that discards all events.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Wraps a sink the caller does not need to read back.
    #[must_use]
    pub fn new(sink: impl TraceSink + Send + 'static) -> Self {
        Self {
            sink: Some(Arc::new(Mutex::new(sink))),
        }
    }

    /// Wraps a sink the caller keeps a handle to, e.g. a recorder whose
    /// contents are exported after the run.
    #[must_use]
    pub fn from_shared(sink: Arc<Mutex<dyn TraceSink + Send>>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Whether a sink is installed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Runs `f` with a [`Tracer`] over the locked sink.
    pub fn with(&self, f: impl FnOnce(&mut Tracer<'_>)) {
        if let Some(sink) = &self.sink {
            let mut guard = sink.lock();
            let mut tracer = Tracer::new(&mut *guard);
            f(&mut tracer);
        }
    }
}
