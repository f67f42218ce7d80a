//! Audio file export
//!
//! Renders adapter output to audio files for offline listening and
//! regression comparison.

pub mod wav;

/// Saturate a mixed sample to the signed 16-bit range
#[inline]
pub(crate) fn clip_to_i16(sample: i32) -> i16 {
    sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
