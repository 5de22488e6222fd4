//! Keyframe and track types for skeletal animation channels

use custom_debug::Debug;
use glam::{Quat, Vec3};
use skel_utils::debug;
use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// A single (time, value) sample of an animation curve
///
/// Times are expressed in the clip's ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Keyframe<T> {
    pub time: f64,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub const fn new(time: f64, value: T) -> Self {
        Self { time, value }
    }
}

/// Ordered keyframes for one property of one node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(transparent))]
pub struct Track<T: fmt::Debug> {
    #[debug(with = debug::trimmed_collection_fmt)]
    pub keys: Vec<Keyframe<T>>,
}

impl<T: fmt::Debug> Track<T> {
    pub fn new(keys: Vec<Keyframe<T>>) -> Self {
        Self { keys }
    }

    /// A track holding one keyframe at time zero
    pub fn constant(value: T) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, value)],
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Time of the first and last keyframe
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((self.keys.first()?.time, self.keys.last()?.time))
    }
}

impl<T: fmt::Debug> Default for Track<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

/// Which property of a node a track animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Translation,
    Rotation,
    Scale,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        };
        f.write_str(name)
    }
}

/// Values that can be blended between two keyframes
pub trait Interpolate: Copy + fmt::Debug {
    /// Blend from `self` towards `other` by `t` in `[0, 1]`
    fn interpolate(&self, other: &Self, t: f32) -> Self;

    /// Whether every component is a finite number
    fn is_finite_value(&self) -> bool;
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }

    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl Interpolate for Quat {
    /// Spherical interpolation, renormalized against floating-point drift
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        let start = normalize_or_identity(*self);
        let end = normalize_or_identity(*other);
        normalize_or_identity(start.slerp(end, t))
    }

    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

/// Normalize a quaternion, falling back to identity for zero length
pub fn normalize_or_identity(q: Quat) -> Quat {
    let len = q.length();
    if len > 0.0 && len.is_finite() {
        Quat::from_xyzw(q.x / len, q.y / len, q.z / len, q.w / len)
    } else {
        Quat::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_interpolate() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 20.0, 30.0);

        let mid = a.interpolate(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 0.001);
        assert!((mid.y - 10.0).abs() < 0.001);
        assert!((mid.z - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_quat_interpolate_halfway() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);

        let mid = a.interpolate(&b, 0.5);
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(mid.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_quat_interpolate_unnormalized_inputs() {
        let a = Quat::from_xyzw(0.0, 0.0, 0.0, 3.0);
        let b = Quat::from_xyzw(0.0, 0.0, 2.0, 2.0);

        let q = a.interpolate(&b, 0.3);
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_zero_quat() {
        let q = normalize_or_identity(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn test_track_time_range() {
        let track = Track::new(vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(4.0, Vec3::ONE),
        ]);
        assert_eq!(track.time_range(), Some((0.0, 4.0)));
        assert_eq!(Track::<Vec3>::default().time_range(), None);
    }

    #[test]
    fn test_track_kind_display() {
        assert_eq!(TrackKind::Translation.to_string(), "translation");
        assert_eq!(TrackKind::Rotation.to_string(), "rotation");
        assert_eq!(TrackKind::Scale.to_string(), "scale");
    }
}
