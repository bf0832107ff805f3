use core::ops::Mul;
use crate::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion
{
    pub w: f32,
    pub x: f32, 
    pub y: f32,
    pub z: f32,
}

impl From<[f32; 4]> for Quaternion {
    fn from(values: [f32; 4]) -> Self {
        Self {
            w: values[0],
            x: values[1],
            y: values[2],
            z: values[3],
        }
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(q: Quaternion) -> Self {
        [q.w, q.x, q.y, q.z]
    }
}

impl Quaternion 
{
    /// Create a new quaternion with the given values.
    /// 
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Quaternion { w, x, y, z }
    }

    /// Returns the identity quaternion (no rotation)
    /// 
    pub const fn identity() -> Self {
        Quaternion {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Builds a quaternion from Q14 fixed point components in `[w, x, y, z]` order, this is the
    /// format the DMP writes into its FIFO packets.
    /// 
    pub fn from_q14(values: [i16; 4]) -> Self {
        Quaternion {
            w: q14_to_f32(values[0]),
            x: q14_to_f32(values[1]),
            y: q14_to_f32(values[2]),
            z: q14_to_f32(values[3]),
        }
    }

    /// Converts the quaternion into Q14 fixed point components in `[w, x, y, z]` order.
    /// 
    pub fn to_q14(&self) -> [i16; 4] {
        [
            f32_to_q14(self.w),
            f32_to_q14(self.x),
            f32_to_q14(self.y),
            f32_to_q14(self.z),
        ]
    }

    /// Get the magnitude of the quaternion.
    /// 
    #[inline]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Normalize the quaternion to make it a unit quaternion.
    /// 
    pub fn normalize(&self) -> Quaternion {
        let magnitude = self.magnitude();
        // Cannot normalize a quaternion with zero magnitude.
        if magnitude == 0.0 {
            return *self;
        }
        Quaternion {
            w: self.w / magnitude,
            x: self.x / magnitude,
            y: self.y / magnitude,
            z: self.z / magnitude,
        }
    }

    /// Compute the conjugate of the quaternion. For unit quaternions this is also the inverse
    /// rotation.
    /// 
    pub fn conjugate(&self) -> Self {
        Quaternion {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Multiplicative inverse, `None` for a (near) zero quaternion. Equals the conjugate scaled
    /// by `1 / |q|²`, so it stays exact for samples that are only approximately unit length.
    ///
    pub fn inverse(&self) -> Option<Self> {
        let norm_sq = self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z;
        if norm_sq < f32::EPSILON {
            return None;
        }
        Some(self.conjugate() * (1.0 / norm_sq))
    }

    /// Approximate equality check with a given tolerance.
    /// 
    pub fn approx_eq(&self, other: &Quaternion, tol: f32) -> bool {
        libm::fabsf(self.x - other.x) <= tol
            && libm::fabsf(self.y - other.y) <= tol
            && libm::fabsf(self.z - other.z) <= tol
            && libm::fabsf(self.w - other.w) <= tol
    }

    /// Hamilton product `self ⊗ other`.
    /// 
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Negates the selected vector components, which mirrors the orientation along those axes.
    /// Applying the same inversion twice gives back the original quaternion exactly.
    /// 
    pub fn invert_axes(&self, x: bool, y: bool, z: bool) -> Quaternion {
        Quaternion {
            w: self.w,
            x: if x { -self.x } else { self.x },
            y: if y { -self.y } else { self.y },
            z: if z { -self.z } else { self.z },
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}

impl Mul<Quaternion> for &Quaternion {
    type Output = Quaternion;
    fn mul(self, other: Quaternion) -> Self::Output {
        self.multiply(&other)
    }
}
impl Mul<&Quaternion> for &Quaternion {
    type Output = Quaternion;
    fn mul(self, other: &Quaternion) -> Self::Output {
        self.multiply(other)
    }
}
impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;
    fn mul(self, other: Quaternion) -> Self::Output {
        self.multiply(&other)
    }
}
impl Mul<&Quaternion> for Quaternion {
    type Output = Quaternion;
    fn mul(self, other: &Quaternion) -> Self::Output {
        self.multiply(other)
    }
}

impl Mul<f32> for Quaternion
{
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Quaternion {
            w: self.w * other,
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}
