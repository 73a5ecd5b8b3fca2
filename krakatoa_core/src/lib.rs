// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precondition tracking, activation gating and collaborator contracts for an
//! AR-driven rendering surface.
//!
//! `krakatoa_core` holds the parts of the surface coordinator that do not need
//! threads or a clock: the state model, the three-way readiness join, the
//! one-shot activation gate, and the traits through which the native renderer
//! and the AR subsystem are consumed. It is `no_std` and allocation-free.
//!
//! # Architecture
//!
//! Three inputs arrive independently and in any order on the host's control
//! thread:
//!
//! ```text
//!   permission result ─┐
//!   surface created ───┼──► PreconditionTracker::update() ──► all_ready / failure
//!   AR check result ───┘                                          │
//!                                                                 ▼
//!                                  ActivationGate::on_preconditions_changed()
//!                                                                 │
//!                                      (exactly once per surface) ▼
//!                                                   NativeContext::activate()
//! ```
//!
//! The render thread, its stop-then-destroy ordering and the host-facing
//! facade live in `krakatoa_host`, which builds on these types.
//!
//! **[`state`]**: Permission, surface, AR and activation state enums.
//!
//! **[`precondition`]**: Level-triggered AND over the latest value of each
//! input.
//!
//! **[`gate`]**: Inactive → Active (or Failed) transition with an idempotence
//! guard.
//!
//! **[`backend`]**: [`NativeBackend`](backend::NativeBackend),
//! [`NativeContext`](backend::NativeContext) and
//! [`ArSubsystem`](backend::ArSubsystem) collaborator contracts.
//!
//! **[`frame`]**: Per-iteration frame timing with pause support.
//!
//! **[`surface`]**: Surface instance ids, geometry and rotation.
//!
//! **[`input`]**: Raw touch events forwarded to the native backend.
//!
//! **[`error`]**: Failure reasons and native status errors.
//!
//! **[`time`]**: Monotonic nanosecond timestamps and durations.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-frame
//!   events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub mod error;
pub mod frame;
pub mod gate;
pub mod input;
pub mod precondition;
pub mod state;
pub mod surface;
pub mod time;
pub mod trace;
