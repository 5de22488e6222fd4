//! Animation clips and per-node channels

use super::types::{Interpolate, Track, TrackKind, normalize_or_identity};
use crate::error::{Result, SkelError};
use glam::{Mat4, Quat, Vec3};
use std::collections::HashMap;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Tick rate assumed when a clip does not declare one
pub const DEFAULT_TICKS_PER_SECOND: f64 = 25.0;

/// Keyframed translation, rotation and scale for one scene node
///
/// The channel is bound to a node by name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct NodeChannel {
    pub node_name: String,
    pub translations: Track<Vec3>,
    pub rotations: Track<Quat>,
    pub scales: Track<Vec3>,
}

impl NodeChannel {
    pub fn new(
        node_name: impl Into<String>,
        translations: Track<Vec3>,
        rotations: Track<Quat>,
        scales: Track<Vec3>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            translations,
            rotations,
            scales,
        }
    }

    /// Sample all three tracks and compose `T * R * S`
    ///
    /// The rotation is normalized here as well, since a single-key track
    /// hands back its stored value untouched.
    pub fn local_transform(&self, time: f64) -> Result<Mat4> {
        let scale = self.scales.sample(time)?;
        let rotation = self.rotations.sample(time)?;
        let translation = self.translations.sample(time)?;

        Ok(Mat4::from_translation(translation)
            * Mat4::from_quat(normalize_or_identity(rotation))
            * Mat4::from_scale(scale))
    }

    /// Check ordering, finiteness and coverage of all three tracks
    pub fn validate(&self, duration: f64) -> Result<()> {
        validate_track(&self.node_name, TrackKind::Translation, &self.translations, duration)?;
        validate_track(&self.node_name, TrackKind::Rotation, &self.rotations, duration)?;
        validate_track(&self.node_name, TrackKind::Scale, &self.scales, duration)?;
        Ok(())
    }
}

fn validate_track<T: Interpolate>(
    node: &str,
    kind: TrackKind,
    track: &Track<T>,
    duration: f64,
) -> Result<()> {
    let keys = &track.keys;
    if keys.is_empty() {
        return Err(SkelError::MissingKeyframes {
            node: node.to_string(),
            track: kind,
        });
    }

    for (index, key) in keys.iter().enumerate() {
        if !key.time.is_finite() || !key.value.is_finite_value() {
            return Err(SkelError::NonFiniteKeyframe {
                node: node.to_string(),
                track: kind,
                index,
            });
        }
        if index > 0 && key.time <= keys[index - 1].time {
            return Err(SkelError::UnsortedKeyframes {
                node: node.to_string(),
                track: kind,
                index,
                time: key.time,
                previous: keys[index - 1].time,
            });
        }
    }

    // A single key is constant and needs no coverage
    if keys.len() > 1 {
        let first = keys[0].time;
        let last = keys[keys.len() - 1].time;
        if first > 0.0 || last < duration {
            return Err(SkelError::TrackCoverage {
                node: node.to_string(),
                track: kind,
                first,
                last,
                duration,
            });
        }
    }

    Ok(())
}

/// One animation clip
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct AnimationClip {
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub name: String,
    /// Length of the clip in ticks
    pub duration: f64,
    /// Zero means "not declared"
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub ticks_per_second: f64,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub channels: Vec<NodeChannel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f64, ticks_per_second: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            ticks_per_second,
            channels: Vec::new(),
        }
    }

    pub fn with_channel(mut self, channel: NodeChannel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Declared tick rate, or `fallback` when the clip declares none
    pub fn effective_ticks_per_second(&self, fallback: f64) -> f64 {
        if self.ticks_per_second != 0.0 {
            self.ticks_per_second
        } else {
            fallback
        }
    }

    /// Clip length in wall-clock seconds
    pub fn duration_seconds(&self, fallback_ticks_per_second: f64) -> f64 {
        self.duration / self.effective_ticks_per_second(fallback_ticks_per_second)
    }

    /// First channel bound to `node_name`
    pub fn channel(&self, node_name: &str) -> Option<&NodeChannel> {
        self.channels.iter().find(|c| c.node_name == node_name)
    }

    /// Name lookup table for all channels; the first channel per node wins
    pub fn channel_map(&self) -> HashMap<&str, &NodeChannel> {
        let mut map = HashMap::with_capacity(self.channels.len());
        for channel in &self.channels {
            if map.contains_key(channel.node_name.as_str()) {
                log::warn!(
                    "Clip '{}' has more than one channel for node '{}', using the first",
                    self.name,
                    channel.node_name
                );
                continue;
            }
            map.insert(channel.node_name.as_str(), channel);
        }
        map
    }

    /// Tick rate used for playback, rejecting rates that cannot drive time
    /// forward
    pub fn resolved_ticks_per_second(&self, fallback: f64) -> Result<f64> {
        let ticks_per_second = self.effective_ticks_per_second(fallback);
        if ticks_per_second.is_finite() && ticks_per_second > 0.0 {
            Ok(ticks_per_second)
        } else {
            Err(SkelError::InvalidTickRate {
                clip: self.name.clone(),
                ticks_per_second,
            })
        }
    }

    /// Reject clips whose keyframes cannot be sampled over `[0, duration)`
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SkelError::InvalidDuration {
                clip: self.name.clone(),
                duration: self.duration,
            });
        }

        // Zero means "not declared"; anything else must be usable as is
        if !self.ticks_per_second.is_finite() || self.ticks_per_second < 0.0 {
            return Err(SkelError::InvalidTickRate {
                clip: self.name.clone(),
                ticks_per_second: self.ticks_per_second,
            });
        }

        for channel in &self.channels {
            channel.validate(self.duration)?;
        }

        Ok(())
    }
}
