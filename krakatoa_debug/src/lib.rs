// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, log bridging and Chrome trace export for
//! Krakatoa diagnostics.
//!
//! This crate provides [`TraceSink`](krakatoa_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory event recording.
//! - [`log_sink::LogSink`]: forwards events to the `log` facade.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from a
//!   recording.

pub mod chrome;
pub mod log_sink;
pub mod pretty;
pub mod recorder;
