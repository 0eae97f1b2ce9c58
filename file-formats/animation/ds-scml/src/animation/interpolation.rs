//! Keyframe bracketing and interpolation

use crate::document::Keyframe;

/// Linear interpolation of scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate two angles in degrees along the shorter arc, result in radians
///
/// `spin` is accepted but does not influence which way the end angle is
/// wrapped: the wrap direction only depends on which angle is larger.
#[inline]
pub fn lerp_angle(start: f32, end: f32, blend: f32, _spin: i32) -> f32 {
    let mut end = end;
    if (end - start).abs() > 180.0 {
        if end < start {
            end += 360.0;
        } else {
            end -= 360.0;
        }
    }
    lerp(start, end, blend).to_radians()
}

/// Bracketing keyframes for a sample time
#[derive(Debug)]
pub struct KeyBlend<'a, P> {
    pub start: &'a Keyframe<P>,
    pub end: &'a Keyframe<P>,
    pub start_time: u32,
    /// End time used for blending; the animation length when wrapping
    pub end_time: u32,
    /// Weight of `end`, in `[0, 1]`
    pub blend: f32,
}

// Manual impls: derive would require `P: Clone`.
impl<P> Clone for KeyBlend<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for KeyBlend<'_, P> {}

impl<P> KeyBlend<'_, P> {
    /// Time between the bracketing keys
    pub fn span(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Whether the bracket is too wide to interpolate at this tick spacing
    ///
    /// Keys further than one and a half ticks apart are treated as a channel
    /// that is not animated at this tick.
    pub fn is_sparse(&self, tick_duration: u32) -> bool {
        self.span() as f32 >= 1.5 * tick_duration as f32
    }
}

/// Find the keys bracketing `time` and the blend factor between them
///
/// The last key at or before `time` starts the bracket, the first key after
/// it ends the bracket. Past the last key a looping animation wraps back to
/// the first key, blending towards it over the remaining animation length.
/// Returns `None` for an empty key list.
pub fn resolve_key_blend<P>(
    keys: &[Keyframe<P>],
    length: u32,
    time: u32,
    looping: bool,
) -> Option<KeyBlend<'_, P>> {
    let first = keys.first()?;
    let last = keys.last()?;

    let mut start = first;
    let mut end = first;
    for key in keys {
        if key.time <= time {
            start = key;
            end = key;
            if key.time == time {
                break;
            }
        } else {
            end = key;
            break;
        }
    }

    let start_time = start.time;
    let mut end_time = end.time;

    if std::ptr::eq(start, last) && looping && start_time != time {
        end = first;
        end_time = length;
    }

    let blend = if end_time == start_time {
        0.0
    } else {
        ((time as f32 - start_time as f32) / (end_time as f32 - start_time as f32)).clamp(0.0, 1.0)
    };

    Some(KeyBlend {
        start,
        end,
        start_time,
        end_time,
        blend,
    })
}
