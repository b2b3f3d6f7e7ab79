#![no_std]

extern crate alloc;

mod boundary;
mod chain;
mod config;
mod engine;
mod error;
mod geometry;

pub use boundary::*;
pub use chain::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;

pub use nalgebra;

use nalgebra::{Unit, Vector2};

pub type Float = f64;

/// A position, or a direction, in the plane.
pub type Point = Vector2<Float>;

/// One straight hop of a light path: a segment starting at `origin`,
/// going `length` units along `direction`.
///
/// The end point is never stored, see [`Self::endpoint`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Unit<Point>,
    pub length: Float,
}

impl Ray {
    /// Normalizes `direction` and builds a ray from it.
    ///
    /// Fails if `direction` is zero or any value isn't finite. Negative
    /// lengths are rejected as non-finite ones are.
    #[inline]
    pub fn try_new(origin: Point, direction: Point, length: Float) -> Result<Self, RayError> {
        if !(is_finite(&origin) && is_finite(&direction) && length.is_finite() && length >= 0.0) {
            return Err(RayError::NonFinite);
        }

        Unit::try_new(direction, 0.0)
            .map(|direction| Self::new_unit_dir(origin, direction, length))
            .ok_or(RayError::ZeroDirection)
    }

    #[inline]
    #[must_use]
    pub const fn new_unit_dir(origin: Point, direction: Unit<Point>, length: Float) -> Self {
        Self {
            origin,
            direction,
            length,
        }
    }

    /// The ray going from `source` towards `aim`, `length` units long.
    ///
    /// This is how the host turns its input state (source position, pointer
    /// position) into the initial ray of a frame.
    #[inline]
    pub fn from_source(source: Point, aim: Point, length: Float) -> Result<Self, RayError> {
        Self::try_new(source, aim - source, length)
    }

    /// The point at distance `t` from the ray's origin.
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Point {
        self.origin + self.direction.as_ref() * t
    }

    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> Point {
        self.at(self.length)
    }

    /// Shortens (or extends) the ray so that it stops at `point`'s distance
    /// from the origin. `point` is expected to lie on the ray.
    #[inline]
    pub fn truncate_at(&mut self, point: &Point) {
        self.length = (point - self.origin).norm();
    }
}

/// The host's input state for one frame: where the light comes from, and
/// where it's aimed at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Source {
    pub origin: Point,
    pub aim: Point,
}

impl Source {
    #[inline]
    #[must_use]
    pub const fn new(origin: Point, aim: Point) -> Self {
        Self { origin, aim }
    }

    /// The initial ray of a propagation pass, see [`Ray::from_source`].
    #[inline]
    pub fn ray(&self, length: Float) -> Result<Ray, RayError> {
        Ray::from_source(self.origin, self.aim, length)
    }
}

#[inline]
pub(crate) fn is_finite(p: &Point) -> bool {
    p.iter().all(|c| c.is_finite())
}
