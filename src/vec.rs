//! Vector types and traits for simulation and projection math.

use crate::float::Float;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Trait for vector types used by the particle core.
///
/// Abstracts over dimensionality (2D, 3D) so integrators, springs, sticks and
/// boundary handling are written once.
pub trait Vec:
    Copy
    + Clone
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + PartialEq
    + Default
    + core::fmt::Debug
{
    /// The scalar (float) type for this vector.
    type Scalar: Float;

    /// Number of axes.
    const DIM: usize;

    /// Zero vector.
    fn zero() -> Self;

    /// Vector with all components set to the same value.
    fn splat(value: Self::Scalar) -> Self;

    /// Dot product.
    fn dot(self, other: Self) -> Self::Scalar;

    /// Read one axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= DIM`.
    fn component(self, axis: usize) -> Self::Scalar;

    /// Mutable access to one axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= DIM`.
    fn component_mut(&mut self, axis: usize) -> &mut Self::Scalar;

    /// Squared length (avoids sqrt).
    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    /// Length (magnitude).
    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length.
    ///
    /// A vector of length exactly zero normalizes to the zero vector rather
    /// than NaN. Tiny but non-zero vectors still divide.
    fn normalize(self) -> Self {
        let len = self.length();
        if len == Self::Scalar::zero() {
            Self::zero()
        } else {
            self.divide(len)
        }
    }

    /// Scale all components by a scalar.
    fn scale(self, s: Self::Scalar) -> Self;

    /// Divide all components by a scalar.
    fn divide(self, s: Self::Scalar) -> Self;

    /// Component-wise multiplication.
    fn component_mul(self, other: Self) -> Self;

    /// Component-wise division.
    fn component_div(self, other: Self) -> Self;

    /// Distance between two points.
    fn distance(self, other: Self) -> Self::Scalar {
        (self - other).length()
    }

    /// Squared distance between two points.
    fn distance_sq(self, other: Self) -> Self::Scalar {
        (self - other).length_sq()
    }

    /// Linear interpolation between self and other.
    fn lerp(self, other: Self, t: Self::Scalar) -> Self {
        self + (other - self).scale(t)
    }

    /// Mirror `self` about the plane with unit normal `n`.
    fn reflect(self, n: Self) -> Self {
        self - n.scale(self.dot(n) * Self::Scalar::two())
    }

    /// True when no component is NaN or infinite.
    fn is_finite(self) -> bool {
        (0..Self::DIM).all(|axis| self.component(axis).is_finite())
    }
}

// --------------------------------------------------------------------------
// Vec2<F>
// --------------------------------------------------------------------------

/// 2D vector for planar physics (cloth, 2D soft bodies, screen space).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise).
    pub fn perp(self) -> Self {
        Vec2 { x: -self.y, y: self.x }
    }

    /// Rotate counter-clockwise by `angle` radians.
    pub fn rotate(self, angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Vec2 { x: self.x * c - self.y * s, y: self.x * s + self.y * c }
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self { Vec2 { x: self.x * rhs, y: self.y * rhs } }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;
    fn div(self, rhs: F) -> Self { Vec2 { x: self.x / rhs, y: self.y / rhs } }
}

impl<F: Float> Mul for Vec2<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self { self.component_mul(rhs) }
}

impl<F: Float> Div for Vec2<F> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self { self.component_div(rhs) }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vec2<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<F: Float> Vec for Vec2<F> {
    type Scalar = F;
    const DIM: usize = 2;
    fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }
    fn splat(value: F) -> Self { Vec2 { x: value, y: value } }
    fn dot(self, other: Self) -> F { self.x * other.x + self.y * other.y }
    fn component(self, axis: usize) -> F {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => panic!("axis {} out of range for Vec2", axis),
        }
    }
    fn component_mut(&mut self, axis: usize) -> &mut F {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("axis {} out of range for Vec2", axis),
        }
    }
    fn scale(self, s: F) -> Self { Vec2 { x: self.x * s, y: self.y * s } }
    fn divide(self, s: F) -> Self { Vec2 { x: self.x / s, y: self.y / s } }
    fn component_mul(self, other: Self) -> Self {
        Vec2 { x: self.x * other.x, y: self.y * other.y }
    }
    fn component_div(self, other: Self) -> Self {
        Vec2 { x: self.x / other.x, y: self.y / other.y }
    }
}

// --------------------------------------------------------------------------
// Vec3<F>
// --------------------------------------------------------------------------

/// 3D vector for spatial physics and the projection pipeline.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    /// Create a new 3D vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    /// 3D cross product.
    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec3 { x: -self.x, y: -self.y, z: -self.z } }
}

impl<F: Float> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self { self.scale(rhs) }
}

impl<F: Float> Div<F> for Vec3<F> {
    type Output = Self;
    fn div(self, rhs: F) -> Self { self.divide(rhs) }
}

impl<F: Float> Mul for Vec3<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self { self.component_mul(rhs) }
}

impl<F: Float> Div for Vec3<F> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self { self.component_div(rhs) }
}

impl<F: Float> AddAssign for Vec3<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vec3<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<F: Float> Vec for Vec3<F> {
    type Scalar = F;
    const DIM: usize = 3;
    fn zero() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::zero() } }
    fn splat(value: F) -> Self { Vec3 { x: value, y: value, z: value } }
    fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
    fn component(self, axis: usize) -> F {
        match axis {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("axis {} out of range for Vec3", axis),
        }
    }
    fn component_mut(&mut self, axis: usize) -> &mut F {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("axis {} out of range for Vec3", axis),
        }
    }
    fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }
    fn divide(self, s: F) -> Self {
        Vec3 { x: self.x / s, y: self.y / s, z: self.z / s }
    }
    fn component_mul(self, other: Self) -> Self {
        Vec3 { x: self.x * other.x, y: self.y * other.y, z: self.z * other.z }
    }
    fn component_div(self, other: Self) -> Self {
        Vec3 { x: self.x / other.x, y: self.y / other.y, z: self.z / other.z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_length() {
        let v = Vec2::new(3.0f32, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn vec3_cross() {
        let i = Vec3::new(1.0f32, 0.0, 0.0);
        let j = Vec3::new(0.0f32, 1.0, 0.0);
        let k = i.cross(j);
        assert_eq!(k, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalize_zero_vector() {
        let n = Vec2::<f32>::zero().normalize();
        assert_eq!(n, Vec2::zero());
        let n3 = Vec3::<f64>::zero().normalize();
        assert_eq!(n3, Vec3::zero());
    }

    #[test]
    fn normalize_tiny_vector_still_divides() {
        let n = Vec2::new(1e-20f64, 0.0).normalize();
        assert!((n.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scalar_operators_match_methods() {
        let v = Vec3::new(1.0f32, -2.0, 4.0);
        assert_eq!(v * 2.0, v.scale(2.0));
        assert_eq!(v / 2.0, v.divide(2.0));
        assert_eq!(v.component_div(Vec3::splat(2.0)), v / 2.0);
    }

    #[test]
    fn vector_operators_are_componentwise() {
        let a = Vec2::new(3.0f32, -4.0);
        let b = Vec2::new(2.0, 8.0);
        assert_eq!(a * b, Vec2::new(6.0, -32.0));
        assert_eq!(a / b, Vec2::new(1.5, -0.5));

        let v = Vec3::new(1.0f64, 2.0, 3.0);
        assert_eq!(v * Vec3::new(2.0, 0.5, -1.0), Vec3::new(2.0, 1.0, -3.0));
        assert_eq!(v / Vec3::splat(2.0), v.component_div(Vec3::splat(2.0)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn component_past_the_last_axis_panics() {
        Vec2::new(1.0f32, 2.0).component(2);
    }

    #[test]
    fn component_access_round_trips() {
        let mut v = Vec3::new(1.0f32, 2.0, 3.0);
        *v.component_mut(2) = 9.0;
        assert_eq!(v.component(0), 1.0);
        assert_eq!(v.component(2), 9.0);
    }

    #[test]
    fn reflect_off_floor() {
        let d = Vec2::new(1.0f32, 1.0);
        let r = d.reflect(Vec2::new(0.0, -1.0));
        assert_eq!(r, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn lerp_midpoint() {
        let a = Vec2::new(0.0f32, 0.0);
        let b = Vec2::new(10.0f32, 10.0);
        let mid = a.lerp(b, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-6);
        assert!((mid.y - 5.0).abs() < 1e-6);
    }
}
