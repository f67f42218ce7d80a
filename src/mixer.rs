//! Substep accumulation and output scaling
//!
//! Each output sample starts from a zeroed accumulator. Every unmuted substep
//! contribution is added, then the total is multiplied by a fixed per-family
//! gain so the different cores land at roughly the same loudness.
//!
//! - OPLL cores sum to mono and are emitted center-panned (left == right).
//! - OPN2 cores already produce a stereo pair and keep independent sides.

use crate::mute::MuteMask;

/// Output gain for the Nuked OPLL adapter (comparable to MAME / emu2413)
pub const OPLL_OUTPUT_GAIN: i32 = 8;

/// Output gain for the Nuked OPN2 adapter
pub const OPN2_OUTPUT_GAIN: i32 = 11;

/// Rhythm instruments are emitted once per sample but calibrated as a doubled signal
pub const RHYTHM_DOUBLING: i32 = 2;

/// ymfm OPLL output scale numerator
pub const YMFM_GAIN_NUM: i32 = 128;

/// ymfm OPLL output scale denominator
pub const YMFM_GAIN_DEN: i32 = 9;

/// One stereo output sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StereoFrame {
    /// Left channel
    pub left: i32,
    /// Right channel
    pub right: i32,
}

impl StereoFrame {
    /// Center-panned frame from a mono value
    #[inline]
    pub fn mono(value: i32) -> Self {
        Self {
            left: value,
            right: value,
        }
    }
}

/// Mono accumulator for one output sample
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoAccumulator {
    sum: i32,
}

impl MonoAccumulator {
    /// Zeroed accumulator
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` unless any bit of `channels` is muted
    #[inline]
    pub fn add(&mut self, mask: MuteMask, channels: u32, value: i32) {
        if mask.is_audible(channels) {
            self.sum = self.sum.wrapping_add(value);
        }
    }

    /// Raw sum so far
    #[inline]
    pub fn sum(&self) -> i32 {
        self.sum
    }

    /// Apply `gain` and emit a center-panned frame
    #[inline]
    pub fn finish(self, gain: i32) -> StereoFrame {
        StereoFrame::mono(self.sum.wrapping_mul(gain))
    }
}

/// Independent left/right accumulator for one output sample
#[derive(Debug, Clone, Copy, Default)]
pub struct StereoAccumulator {
    left: i32,
    right: i32,
}

impl StereoAccumulator {
    /// Zeroed accumulator
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stereo pair unless any bit of `channels` is muted
    #[inline]
    pub fn add(&mut self, mask: MuteMask, channels: u32, pair: [i16; 2]) {
        if mask.is_audible(channels) {
            self.left = self.left.wrapping_add(pair[0] as i32);
            self.right = self.right.wrapping_add(pair[1] as i32);
        }
    }

    /// Apply `gain` to both sides
    #[inline]
    pub fn finish(self, gain: i32) -> StereoFrame {
        StereoFrame {
            left: self.left.wrapping_mul(gain),
            right: self.right.wrapping_mul(gain),
        }
    }
}

/// Scale a ymfm OPLL sum to the common output level
#[inline]
pub fn scale_ymfm(value: i32) -> i32 {
    value.wrapping_mul(YMFM_GAIN_NUM) / YMFM_GAIN_DEN
}

/// Write `frame` into slot `index` of both output buffers
#[inline]
pub(crate) fn store(left: &mut [i32], right: &mut [i32], index: usize, frame: StereoFrame) {
    left[index] = frame.left;
    right[index] = frame.right;
}
