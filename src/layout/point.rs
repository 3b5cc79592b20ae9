//! Point type.
//!
//! A point is a mutable 2-D position tagged with an immutable identity
//! payload. Equality and hashing look at the payload only, so moving a point
//! never changes its identity in a set or map.

use std::fmt;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::Serialize;

use super::vector::Vector;

/// A positioned node identity.
#[derive(Debug, Clone, Serialize)]
pub struct Point<T> {
    x: f32,
    y: f32,
    value: T,
}

impl<T> Point<T> {
    /// Create a point at `(x, y)`.
    #[inline]
    pub fn new(x: f32, y: f32, value: T) -> Self {
        Self { x, y, value }
    }

    /// Create a point at a uniformly random position in `[0, 1) x [0, 1)`.
    pub fn random<R: Rng + ?Sized>(value: T, rng: &mut R) -> Self {
        let x = rng.random::<f32>();
        let y = rng.random::<f32>();
        Self::new(x, y, value)
    }

    /// X coordinate.
    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Y coordinate.
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// The identity payload.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Current position as a vector.
    #[inline]
    pub fn position(&self) -> Vector {
        Vector::new(self.x, self.y)
    }

    /// Place the point at `position`.
    #[inline]
    pub fn set_position(&mut self, position: Vector) {
        self.x = position.x();
        self.y = position.y();
    }

    /// Move the point by `offset`.
    #[inline]
    pub fn translate(&mut self, offset: Vector) {
        self.x += offset.x();
        self.y += offset.y();
    }

    /// Scale each coordinate by the matching component of `factors`.
    #[inline]
    pub fn dilate(&mut self, factors: Vector) {
        self.x *= factors.x();
        self.y *= factors.y();
    }

    /// Euclidean distance to `other`.
    pub fn distance<U>(&self, other: &Point<U>) -> f32 {
        let a = self.x - other.x;
        let b = self.y - other.y;
        (a * a + b * b).sqrt()
    }

    /// Spring pull toward `other`: the vector from this point to it.
    ///
    /// Linear in distance, no rest length.
    #[inline]
    pub fn hookes_attraction<U>(&self, other: &Point<U>) -> Vector {
        Vector::new(other.x - self.x, other.y - self.y)
    }

    /// Push away from `other` with magnitude `charge / distance`.
    ///
    /// The y-component of the separation is scaled by `y_adjust` before the
    /// direction is normalized. Coincident points have no defined direction and
    /// repel with the zero vector.
    pub fn coulomb_repulsion<U>(&self, other: &Point<U>, charge: f32, y_adjust: f32) -> Vector {
        let distance = self.distance(other);
        if distance == 0.0 {
            return Vector::ZERO;
        }
        let inverse_distance = charge / distance;
        let a = self.x - other.x;
        let b = y_adjust * (self.y - other.y);
        Vector::new(a, b).normalize() * inverse_distance
    }
}

impl<T: PartialEq> PartialEq for Point<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Point<T> {}

impl<T: Hash> Hash for Point<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[x: {:?}, y:{:?}, value:{}]", self.x, self.y, self.value)
    }
}
