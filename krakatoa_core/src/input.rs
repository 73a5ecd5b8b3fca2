// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw touch input forwarded to the native backend.
//!
//! Touches are not interpreted here; the control thread hands them straight to
//! [`NativeContext::forward_touch`](crate::backend::NativeContext::forward_touch).

use kurbo::Point;

/// Phase of a single-pointer touch gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Finger went down.
    Down,
    /// Finger moved while down.
    Move,
    /// Finger lifted.
    Up,
}

impl TouchPhase {
    /// Decodes the host action code (0 = down, 1 = move, 2 = up).
    ///
    /// Other actions (cancel, pointer-down for extra fingers, ...) are not
    /// forwarded and decode to `None`.
    #[must_use]
    pub const fn from_action_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Down),
            1 => Some(Self::Move),
            2 => Some(Self::Up),
            _ => None,
        }
    }

    /// Returns the host action code.
    #[must_use]
    pub const fn action_code(self) -> i32 {
        match self {
            Self::Down => 0,
            Self::Move => 1,
            Self::Up => 2,
        }
    }
}

/// A touch sample in surface pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Position in physical pixels, origin at the top-left of the surface.
    pub position: Point,
    /// Gesture phase.
    pub phase: TouchPhase,
}

impl TouchEvent {
    /// Creates a touch event from raw coordinates.
    #[must_use]
    pub fn new(x: f32, y: f32, phase: TouchPhase) -> Self {
        Self {
            position: Point::new(f64::from(x), f64::from(y)),
            phase,
        }
    }
}
