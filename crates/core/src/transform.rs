// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal rigid-transform math: translation vectors, unit quaternions, and
//! their composition. This is the frame algebra the merge loop and lookup
//! service need (§4.3, §4.5) — not a general-purpose geometry library.

use serde::{Deserialize, Serialize};

/// A point or translation in 3-space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn lerp(self, other: Vec3, t: f64) -> Vec3 {
        self.add(other.sub(self).scale(t))
    }

    pub fn distance(self, other: Vec3) -> f64 {
        self.sub(other).dot(self.sub(other)).sqrt()
    }
}

/// A unit quaternion representing a rotation, stored `(w, x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalize to unit length. Falls back to identity for a degenerate input.
    pub fn normalized(self) -> Quat {
        let n = self.norm();
        if n < 1e-12 {
            return Quat::IDENTITY;
        }
        Quat::new(self.w / n, self.x / n, self.y / n, self.z / n)
    }

    pub fn conjugate(self) -> Quat {
        Quat::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Hamilton product `self * other`.
    pub fn mul(self, other: Quat) -> Quat {
        Quat::new(
            self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        )
    }

    /// Rotate a vector by this quaternion.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Quat::new(0.0, v.x, v.y, v.z);
        let r = self.mul(qv).mul(self.conjugate());
        Vec3::new(r.x, r.y, r.z)
    }

    /// Spherical linear interpolation between two unit quaternions.
    ///
    /// Takes the shorter arc (negates `other` if the dot product is
    /// negative) and falls back to normalized linear interpolation when the
    /// quaternions are nearly parallel, where `sin(theta)` would be too
    /// small to divide by safely.
    pub fn slerp(self, other: Quat, t: f64) -> Quat {
        let mut dot = self.dot(other);
        let mut b = other;
        if dot < 0.0 {
            b = Quat::new(-b.w, -b.x, -b.y, -b.z);
            dot = -dot;
        }

        if dot > 0.9995 {
            let lerped = Quat::new(
                self.w + (b.w - self.w) * t,
                self.x + (b.x - self.x) * t,
                self.y + (b.y - self.y) * t,
                self.z + (b.z - self.z) * t,
            );
            return lerped.normalized();
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();
        let sin_theta = theta.sin();

        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        Quat::new(
            self.w * s0 + b.w * s1,
            self.x * s0 + b.x * s1,
            self.y * s0 + b.y * s1,
            self.z * s0 + b.z * s1,
        )
        .normalized()
    }

    fn dot(self, other: Quat) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// A rigid transform: rotation applied first, then translation.
///
/// `T_X_Y` notation (§ Glossary): applying `T_X_Y` to a point expressed in
/// frame `Y` yields that point expressed in frame `X`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self { rotation, translation }
    }

    /// Apply this transform to a point.
    pub fn apply(self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p).add(self.translation)
    }

    /// Compose `self . other`: the transform that applies `other` then `self`.
    pub fn compose(self, other: Transform) -> Transform {
        Transform::new(
            self.rotation.mul(other.rotation),
            self.rotation.rotate(other.translation).add(self.translation),
        )
    }

    /// Inverse transform.
    pub fn inverse(self) -> Transform {
        let inv_rot = self.rotation.conjugate();
        Transform::new(inv_rot, inv_rot.rotate(self.translation).scale(-1.0))
    }

    /// Interpolate between two transforms: linear translation, SLERP rotation.
    pub fn interpolate(self, other: Transform, t: f64) -> Transform {
        Transform::new(
            self.rotation.slerp(other.rotation, t),
            self.translation.lerp(other.translation, t),
        )
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
