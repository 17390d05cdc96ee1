//! Keyframe synchronization
//!
//! Resamples independently keyed component curves of one attribute onto a
//! common set of frames. Missing samples are linearly interpolated whatever
//! the authored curve type was.

use std::collections::BTreeMap;

use crate::config::FrameSampling;
use crate::error::{ExportError, ExportResult};

/// Longest range an action may span, in frames
pub const MAX_FRAME_COUNT: i64 = 1 << 20;

/// Closed, non-empty integer frame range of at most [`MAX_FRAME_COUNT`] frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl FrameRange {
    pub fn new(start: i32, end: i32) -> ExportResult<Self> {
        let count = i64::from(end) - i64::from(start) + 1;
        if count < 1 || count > MAX_FRAME_COUNT {
            return Err(ExportError::InvalidFrameRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, frame: i32) -> bool {
        (self.start..=self.end).contains(&frame)
    }

    pub fn frames(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    pub fn to_array(self) -> [i32; 2] {
        [self.start, self.end]
    }
}

/// Keyframes of one scalar component, sorted by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentCurve {
    keys: Vec<(f32, f32)>,
}

impl ComponentCurve {
    /// Build from `[time, value]` pairs. Later duplicates of a time win.
    pub fn from_keyframes(data_path: &str, keyframes: &[[f32; 2]]) -> ExportResult<Self> {
        if keyframes
            .iter()
            .any(|[time, value]| !time.is_finite() || !value.is_finite())
        {
            return Err(ExportError::NonFiniteKeyframe {
                data_path: data_path.to_owned(),
            });
        }

        let mut keys: Vec<(f32, f32)> = keyframes.iter().map(|&[t, v]| (t, v)).collect();
        // Stable sort keeps input order among equal times
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut deduped: Vec<(f32, f32)> = Vec::with_capacity(keys.len());
        for key in keys {
            match deduped.last_mut() {
                Some(last) if last.0 == key.0 => *last = key,
                _ => deduped.push(key),
            }
        }

        Ok(Self { keys: deduped })
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.keys.iter().map(|&(time, _)| time)
    }

    /// Sample the curve at `frame`
    ///
    /// - no keys: `default`
    /// - one key: that key's value everywhere
    /// - otherwise: exact value on a key, linear between the bracketing keys,
    ///   clamped to the end keys outside the keyed span
    pub fn evaluate(&self, frame: f32, default: f32) -> f32 {
        match self.keys.as_slice() {
            [] => default,
            [(_, value)] => *value,
            keys => {
                let last = keys.len() - 1;
                // Nearest key at or before the frame
                let before = keys.partition_point(|&(t, _)| t <= frame);
                let (t0, v0) = keys[before.saturating_sub(1)];
                // Nearest key at or after the frame
                let after = keys.partition_point(|&(t, _)| t < frame);
                let (t1, v1) = keys[after.min(last)];

                let t = if t1 == t0 { 0.0 } else { (frame - t0) / (t1 - t0) };
                v0 + (v1 - v0) * t
            }
        }
    }
}

/// The component curves of one attribute, indexed by vector component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSet<const N: usize> {
    components: [ComponentCurve; N],
}

impl<const N: usize> Default for ComponentSet<N> {
    fn default() -> Self {
        Self {
            components: std::array::from_fn(|_| ComponentCurve::default()),
        }
    }
}

impl<const N: usize> ComponentSet<N> {
    /// Store the curve for component `index`.
    ///
    /// Returns `false` (and drops the curve) when `index` exceeds the arity.
    pub fn insert(&mut self, index: usize, curve: ComponentCurve) -> bool {
        match self.components.get_mut(index) {
            Some(slot) => {
                *slot = curve;
                true
            }
            None => false,
        }
    }

    /// True if any component has at least one keyframe
    pub fn has_keys(&self) -> bool {
        self.components.iter().any(|curve| !curve.is_empty())
    }

    /// Keyed frames in range, each with the time it is sampled at: the
    /// earliest key time that rounds to it
    fn keyed_frames(&self, range: FrameRange) -> BTreeMap<i32, f32> {
        let mut frames = BTreeMap::new();
        for time in self.components.iter().flat_map(ComponentCurve::times) {
            let frame = time.round() as i32;
            if range.contains(frame) {
                frames
                    .entry(frame)
                    .and_modify(|sample: &mut f32| *sample = sample.min(time))
                    .or_insert(time);
            }
        }
        frames
    }
}

/// Synchronize the components of one attribute.
///
/// Frames come from `sampling`: every frame of `range`, or the union of the
/// keyed frames inside it. Keyed frames are evaluated at the key time itself,
/// so a sub-frame key keeps its value on the frame it rounds to. An attribute
/// with no keys at all yields an empty map so consumers can fall back to the
/// bind pose.
pub fn synchronize_keyframes<const N: usize>(
    set: &ComponentSet<N>,
    defaults: [f32; N],
    range: FrameRange,
    sampling: FrameSampling,
) -> BTreeMap<i32, [f32; N]> {
    if !set.has_keys() {
        return BTreeMap::new();
    }

    let samples: Vec<(i32, f32)> = match sampling {
        FrameSampling::EveryFrame => range.frames().map(|frame| (frame, frame as f32)).collect(),
        FrameSampling::Keyframes => set.keyed_frames(range).into_iter().collect(),
    };

    samples
        .into_iter()
        .map(|(frame, time)| {
            let vector =
                std::array::from_fn(|i| set.components[i].evaluate(time, defaults[i]));
            (frame, vector)
        })
        .collect()
}
