//! Per-frame animation driver

use super::clip::AnimationClip;
use super::hierarchy::{ChannelMap, FinalBoneMatrices, HierarchyWalker};
use crate::error::{Result, SkelError};
use crate::model::SkinnedModel;

/// Wrap a tick time into `[0, duration)`
///
/// Negative times wrap around from the end. This is the only looping
/// mechanism: there is no clamping and no blending across the wrap.
pub fn wrap_time(time_in_ticks: f64, duration: f64) -> f64 {
    let wrapped = time_in_ticks.rem_euclid(duration);
    // rem_euclid can round up to `duration` for tiny negative inputs
    if wrapped >= duration { 0.0 } else { wrapped }
}

/// Plays the first clip of a [`SkinnedModel`]
///
/// The animator only borrows the model, so the model cannot change while
/// frames are being produced.
pub struct Animator<'m> {
    model: &'m SkinnedModel,
    clip: &'m AnimationClip,
    channels: ChannelMap<'m>,
    ticks_per_second: f64,
}

impl<'m> Animator<'m> {
    /// Create an animator for the model's first clip
    pub fn new(model: &'m SkinnedModel) -> Result<Self> {
        let clip = model
            .scene()
            .active_animation()
            .ok_or(SkelError::NoAnimation)?;

        if !clip.duration.is_finite() || clip.duration <= 0.0 {
            return Err(SkelError::InvalidDuration {
                clip: clip.name.clone(),
                duration: clip.duration,
            });
        }

        let fallback = model.options().fallback_ticks_per_second;
        if clip.ticks_per_second == 0.0 {
            log::warn!(
                "Clip '{}' declares no tick rate, using {} ticks per second",
                clip.name,
                fallback
            );
        }
        let ticks_per_second = clip.resolved_ticks_per_second(fallback)?;

        log::debug!(
            "Animator for clip '{}': {} ticks at {} ticks/s, {} channels",
            clip.name,
            clip.duration,
            ticks_per_second,
            clip.channels.len()
        );

        Ok(Self {
            model,
            clip,
            channels: clip.channel_map(),
            ticks_per_second,
        })
    }

    pub fn clip(&self) -> &'m AnimationClip {
        self.clip
    }

    pub fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }

    /// Clip length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.clip.duration / self.ticks_per_second
    }

    /// Convert wall-clock seconds into a looped clip time in ticks
    pub fn animation_time(&self, wall_clock_seconds: f64) -> Result<f64> {
        if !wall_clock_seconds.is_finite() {
            return Err(SkelError::InvalidTime(wall_clock_seconds));
        }
        let time_in_ticks = wall_clock_seconds * self.ticks_per_second;
        Ok(wrap_time(time_in_ticks, self.clip.duration))
    }

    /// Compute the final bone matrices for the given wall-clock time
    pub fn advance(&self, wall_clock_seconds: f64) -> Result<FinalBoneMatrices> {
        let animation_time = self.animation_time(wall_clock_seconds)?;
        log::trace!(
            "advance: {}s -> {} ticks of '{}'",
            wall_clock_seconds,
            animation_time,
            self.clip.name
        );

        HierarchyWalker::new(self.model.bone_table(), self.model.global_inverse())
            .with_channels(&self.channels)
            .compute_final_transforms(&self.model.scene().root, animation_time)
    }
}
