use num::traits::{Float, Num};
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// A 3D vector generic over any numeric type.
///
/// Used for planet-centered positions of satellites and ground targets, and
/// for the slant vectors between them.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given components.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    pub const fn x(&self) -> T { self.x }
    pub const fn y(&self) -> T { self.y }
    pub const fn z(&self) -> T { self.z }
}

impl<T: Num + Copy> Vec3D<T> {
    /// Computes the dot product of the current vector with another vector.
    ///
    /// ```text
    /// dot_product = (x1 * x2) + (y1 * y2) + (z1 * z2)
    /// ```
    pub fn dot(self, other: Vec3D<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Creates a zero vector (x = 0, y = 0, z = 0).
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }

    /// Checks whether all components are zero.
    pub fn is_zero(&self) -> bool { self.x.is_zero() && self.y.is_zero() && self.z.is_zero() }
}

impl<T> Vec3D<T>
where T: Float
{
    /// Computes the magnitude (euclidean norm) of the vector.
    pub fn abs(&self) -> T { (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt() }

    /// Creates a vector pointing from the current vector (`self`) to another vector (`other`).
    pub fn to(&self, other: &Vec3D<T>) -> Vec3D<T> { *other - *self }

    /// Normalizes the vector to unit length.
    ///
    /// # Returns
    /// - `Some(unit)` for a vector with a finite, non-zero magnitude.
    /// - `None` if the magnitude is zero or not finite, as no direction is defined.
    pub fn normalize(self) -> Option<Self> {
        let magnitude = self.abs();
        if magnitude.is_zero() || !magnitude.is_finite() {
            None
        } else {
            Some(Self::new(self.x / magnitude, self.y / magnitude, self.z / magnitude))
        }
    }

    /// Computes the cosine of the angle between `self` and `other`, clamped to `[-1, 1]`.
    ///
    /// # Returns
    /// - `None` if either vector has no defined direction.
    pub fn cos_angle_to(&self, other: &Vec3D<T>) -> Option<T> {
        let a = self.normalize()?;
        let b = other.normalize()?;
        Some(a.dot(b).max(-T::one()).min(T::one()))
    }

    /// Rotates the vector about the z axis by `angle_rad` radians (right-handed).
    pub fn rotate_z(&self, angle_rad: T) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos, self.z)
    }
}

impl<T: Num + Copy> Add for Vec3D<T> {
    type Output = Vec3D<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Num + Copy> Sub for Vec3D<T> {
    type Output = Vec3D<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Num + Copy> Mul<T> for Vec3D<T> {
    type Output = Vec3D<T>;

    fn mul(self, rhs: T) -> Self::Output { Self::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}

impl<T: Num + Copy + Neg<Output = T>> Neg for Vec3D<T> {
    type Output = Vec3D<T>;

    fn neg(self) -> Self::Output { Self::new(-self.x, -self.y, -self.z) }
}

impl<T: Display> Display for Vec3D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
