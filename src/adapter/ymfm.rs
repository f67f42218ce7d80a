//! ymfm OPLL adapter
//!
//! ymfm renders whole samples and models no bus latency, so writes go
//! straight through and one `generate` call yields one output sample.
//!
//! ymfm only knows nine channels, each emitting melody plus rhythm, which
//! means individual rhythm instruments cannot be muted on their own. The
//! 14-bit mute mask is folded onto the nine channels that host the drums.

use super::{check_buffers, FmAdapter};
use crate::backend::YmfmOpllCore;
use crate::config::ChipFamily;
use crate::mixer::{scale_ymfm, store, StereoFrame};
use crate::mute::{MuteMask, OpllChannels};

/// Fold an OPLL mute mask into ymfm's 9-bit channel enable mask.
///
/// The result is inverted (bit set = channel rendered). Rhythm instruments
/// enable the channel they are hosted on:
///
/// | Instrument | Channel bit |
/// |------------|-------------|
/// | Bass drum  | 6           |
/// | Snare drum | 7           |
/// | Tom-tom    | 7           |
/// | Cymbal     | 8           |
/// | Hi-hat     | 8           |
pub fn ymfm_channel_mask(mute: MuteMask) -> u32 {
    let on = !mute.bits();
    (on & OpllChannels::TONES.bits())
        | (((on >> 9) & 1) << 6)
        | (((on >> 10) & 1) << 7)
        | (((on >> 11) & 1) << 7)
        | (((on >> 12) & 1) << 8)
        | (((on >> 13) & 1) << 8)
}

/// Write-through driver for a [`YmfmOpllCore`].
pub struct YmfmOpllAdapter<C: YmfmOpllCore> {
    core: C,
    mute: MuteMask,
    channel_mask: u32,
}

impl<C: YmfmOpllCore> YmfmOpllAdapter<C> {
    /// Wrap `core` and reset it
    pub fn new(core: C) -> Self {
        let mut adapter = Self {
            core,
            mute: MuteMask::NONE,
            channel_mask: ymfm_channel_mask(MuteMask::NONE),
        };
        adapter.reset(0);
        adapter
    }

    /// Channel enable mask currently handed to the core
    pub fn channel_mask(&self) -> u32 {
        self.channel_mask
    }

    /// The wrapped core
    pub fn core(&self) -> &C {
        &self.core
    }

    /// The wrapped core, mutably
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    fn next_frame(&mut self) -> StereoFrame {
        let [melody, rhythm] = self.core.generate(self.channel_mask);

        let mut output = 0i32;
        if self.mute.bits() & OpllChannels::TONES.bits() != OpllChannels::TONES.bits() {
            output = output.wrapping_add(melody);
        }
        if self.mute.bits() & OpllChannels::RHYTHM.bits() != OpllChannels::RHYTHM.bits() {
            output = output.wrapping_add(rhythm);
        }

        StereoFrame::mono(scale_ymfm(output))
    }
}

impl<C: YmfmOpllCore> FmAdapter for YmfmOpllAdapter<C> {
    fn family(&self) -> ChipFamily {
        ChipFamily::YmfmOpll
    }

    /// ymfm selects no patch set on reset; `mode` is ignored.
    fn reset(&mut self, _mode: u8) {
        self.core.reset();
    }

    fn write(&mut self, address: u32, data: u8) -> crate::Result<()> {
        self.core.write(address, data);
        Ok(())
    }

    fn set_mute_mask(&mut self, mask: u32) {
        self.mute = MuteMask::from_bits(mask);
        self.channel_mask = ymfm_channel_mask(self.mute);
    }

    fn mute_mask(&self) -> u32 {
        self.mute.bits()
    }

    fn stream_update(&mut self, left: &mut [i32], right: &mut [i32]) {
        check_buffers(left, right);
        for i in 0..left.len() {
            let frame = self.next_frame();
            store(left, right, i, frame);
        }
    }
}

impl<C: YmfmOpllCore> std::fmt::Debug for YmfmOpllAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YmfmOpllAdapter")
            .field("mute", &self.mute)
            .field("channel_mask", &format_args!("{:#05x}", self.channel_mask))
            .finish_non_exhaustive()
    }
}
