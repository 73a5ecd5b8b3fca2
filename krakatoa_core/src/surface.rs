// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface instance identification and geometry.
//!
//! [`SurfaceId`] is a generation counter: the platform may destroy and
//! recreate the drawing surface many times per process, and each instance
//! gets a fresh id so trace events can be told apart.

use core::fmt;

use kurbo::Size;

/// Identifies one instance of the platform drawing surface.
///
/// Ids are assigned by the lifecycle controller in creation order. Core code
/// passes them through without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// Returns the id of the next surface instance.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// Display rotation reported alongside a surface size change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// Natural orientation.
    #[default]
    R0,
    /// Rotated 90° counter-clockwise.
    R90,
    /// Upside down.
    R180,
    /// Rotated 270° counter-clockwise.
    R270,
}

impl Rotation {
    /// Decodes the platform's display-rotation index (0..=3).
    #[must_use]
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::R0),
            1 => Some(Self::R90),
            2 => Some(Self::R180),
            3 => Some(Self::R270),
            _ => None,
        }
    }

    /// Returns the platform's display-rotation index.
    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    /// Returns the rotation in degrees.
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }
}

/// Pixel size and rotation of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SurfaceGeometry {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Current display rotation.
    pub rotation: Rotation,
}

impl SurfaceGeometry {
    /// Creates a geometry.
    #[must_use]
    pub const fn new(width: u32, height: u32, rotation: Rotation) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// Whether frames can be drawn at this size.
    ///
    /// Some platforms report a zero-sized surface before the first layout.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns the size as a [`kurbo::Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_index_round_trip() {
        for index in 0..4 {
            let rotation = Rotation::from_index(index).unwrap();
            assert_eq!(rotation.index(), index);
        }
        assert_eq!(Rotation::from_index(4), None);
        assert_eq!(Rotation::from_index(-1), None);
        assert_eq!(Rotation::R270.degrees(), 270);
    }

    #[test]
    fn zero_sized_geometry_is_not_drawable() {
        assert!(SurfaceGeometry::new(800, 600, Rotation::R0).is_drawable());
        assert!(!SurfaceGeometry::new(0, 600, Rotation::R0).is_drawable());
        assert!(!SurfaceGeometry::new(800, 0, Rotation::R90).is_drawable());
        assert_eq!(
            SurfaceGeometry::new(800, 600, Rotation::R0).size(),
            Size::new(800.0, 600.0)
        );
    }

    #[test]
    fn surface_ids_advance() {
        assert_eq!(SurfaceId(0).next(), SurfaceId(1));
        assert_eq!(SurfaceId(u32::MAX).next(), SurfaceId(0));
    }
}
