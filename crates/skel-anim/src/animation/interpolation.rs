//! Keyframe sampling for animation tracks

use super::types::{Interpolate, Keyframe, Track};
use crate::error::{Result, SkelError};

/// Find the index of the earlier keyframe in the pair bracketing `time`
///
/// Scans from the start for the first `i` with `time < keys[i + 1].time`.
/// Tracks are short and stored in temporal order, so a linear scan is used.
/// A track with a single keyframe always yields index 0.
pub fn find_key_index<T>(keys: &[Keyframe<T>], time: f64) -> Result<usize> {
    match keys.len() {
        0 => return Err(SkelError::EmptyTrack),
        1 => return Ok(0),
        _ => {}
    }

    keys.windows(2)
        .position(|pair| time < pair[1].time)
        .ok_or(SkelError::NoBracketingKeyframe {
            time,
            last: keys[keys.len() - 1].time,
        })
}

/// Sample a track at `time` (in ticks)
///
/// `time` must already be wrapped into the clip's range. Asking for a time at
/// or past the final keyframe, or before the first one, is an error rather
/// than a clamped value.
pub fn sample_track<T: Interpolate>(track: &Track<T>, time: f64) -> Result<T> {
    let keys = &track.keys;
    let index = find_key_index(keys, time)?;

    if keys.len() == 1 {
        return Ok(keys[0].value);
    }

    let start = &keys[index];
    let end = &keys[index + 1];
    let delta = end.time - start.time;
    let factor = (time - start.time) / delta;

    if !(0.0..=1.0).contains(&factor) {
        return Err(SkelError::FactorOutOfRange { time, factor });
    }

    Ok(start.value.interpolate(&end.value, factor as f32))
}

impl<T: Interpolate> Track<T> {
    /// Sample this track at `time` (in ticks)
    pub fn sample(&self, time: f64) -> Result<T> {
        sample_track(self, time)
    }
}
