//! Plain 2D value types shared by every component.
//!
//! [`Vector2`] is an immutable-style value: arithmetic returns new values and
//! never mutates in place. [`Bounds`] is an axis-aligned rectangle used for
//! sprite-sheet regions, draw destinations and collision volumes.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    pub const ONE: Vector2 = Vector2 { x: 1.0, y: 1.0 };
    pub const UP: Vector2 = Vector2 { x: 0.0, y: 1.0 };
    pub const RIGHT: Vector2 = Vector2 { x: 1.0, y: 0.0 };
    pub const DOWN: Vector2 = Vector2 { x: 0.0, y: -1.0 };
    pub const LEFT: Vector2 = Vector2 { x: -1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f32) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }

    /// Component-wise division by a scalar.
    pub fn divide(self, divisor: f32) -> Vector2 {
        Vector2::new(self.x / divisor, self.y / divisor)
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction. The zero vector normalizes to itself.
    pub fn normalize(self) -> Vector2 {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Vector2::ZERO;
        }
        self.divide(magnitude)
    }

    pub fn distance(self, other: Vector2) -> f32 {
        self.sub(other).magnitude()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::add(self, rhs)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::sub(self, rhs)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f32) -> Vector2 {
        self.scale(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle. `x`/`y` is the bottom-left corner in world space
/// (Y grows upward); for sprite-sheet regions it is the top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn translated(&self, by: Vector2) -> Bounds {
        Bounds::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn contains_point(&self, point: Vector2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 5.0);
        assert_eq!(a.add(b), Vector2::new(4.0, 7.0));
        assert_eq!(b.sub(a), Vector2::new(2.0, 3.0));
        assert_eq!(b.divide(2.0), Vector2::new(1.5, 2.5));
        assert_eq!(a, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn magnitude_distance_and_normalize() {
        let v = Vector2::new(3.0, 4.0);
        assert!(approx_eq(v.magnitude(), 5.0));
        assert!(approx_eq(Vector2::ZERO.distance(v), 5.0));
        let n = v.normalize();
        assert!(approx_eq(n.magnitude(), 1.0));
        assert!(approx_eq(n.x, 0.6));
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn direction_constants() {
        assert_eq!(Vector2::UP + Vector2::DOWN, Vector2::ZERO);
        assert_eq!(Vector2::LEFT + Vector2::RIGHT, Vector2::ZERO);
        assert_eq!(Vector2::ONE * 2.0, Vector2::new(2.0, 2.0));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        let c = Bounds::new(9.5, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn contains_point_includes_edges() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_point(Vector2::new(10.0, 0.0)));
        assert!(!a.contains_point(Vector2::new(10.1, 5.0)));
    }
}
