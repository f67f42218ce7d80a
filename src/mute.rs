//! Channel mute masks
//!
//! A mute mask is a plain 32-bit set where bit *i* silences logical channel
//! *i*. Only the low 9-16 bits are meaningful, depending on the family. The
//! bit layout is shared with existing playback content and must not change.

use bitflags::bitflags;

bitflags! {
    /// OPLL logical channels (YM2413 / DS1001)
    ///
    /// Tone channels 0-8 occupy bits 0-8; the five rhythm instruments follow.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpllChannels: u32 {
        /// Tone channel 0
        const TONE_0 = 1 << 0;
        /// Tone channel 1
        const TONE_1 = 1 << 1;
        /// Tone channel 2
        const TONE_2 = 1 << 2;
        /// Tone channel 3
        const TONE_3 = 1 << 3;
        /// Tone channel 4
        const TONE_4 = 1 << 4;
        /// Tone channel 5
        const TONE_5 = 1 << 5;
        /// Tone channel 6 (shared with bass drum)
        const TONE_6 = 1 << 6;
        /// Tone channel 7 (shared with snare drum / hi-hat)
        const TONE_7 = 1 << 7;
        /// Tone channel 8 (shared with tom-tom / cymbal)
        const TONE_8 = 1 << 8;
        /// Rhythm: bass drum
        const BASS_DRUM = 1 << 9;
        /// Rhythm: snare drum
        const SNARE_DRUM = 1 << 10;
        /// Rhythm: tom-tom
        const TOM_TOM = 1 << 11;
        /// Rhythm: top cymbal
        const CYMBAL = 1 << 12;
        /// Rhythm: hi-hat
        const HI_HAT = 1 << 13;

        /// All nine tone channels
        const TONES = 0x1FF;
        /// All five rhythm instruments
        const RHYTHM = 0x1F << 9;
    }
}

bitflags! {
    /// OPN2 logical channels (YM2612 / YM3438)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Opn2Channels: u32 {
        /// FM channel 1
        const CH_1 = 1 << 0;
        /// FM channel 2
        const CH_2 = 1 << 1;
        /// FM channel 3
        const CH_3 = 1 << 2;
        /// FM channel 4
        const CH_4 = 1 << 3;
        /// FM channel 5
        const CH_5 = 1 << 4;
        /// FM channel 6
        const CH_6 = 1 << 5;
        /// Channel 6 in DAC mode
        const DAC = 1 << 6;
    }
}

impl OpllChannels {
    /// Tone channel `index` (0-8)
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than 8.
    #[inline]
    pub fn tone(index: usize) -> Self {
        assert!(index < 9, "OPLL has 9 tone channels, got {index}");
        Self::from_bits_retain(1 << index)
    }
}

/// Per-instance mute mask.
///
/// Replaced wholesale by `set_mute_mask`; read every substep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MuteMask(u32);

impl MuteMask {
    /// Nothing muted
    pub const NONE: MuteMask = MuteMask(0);

    /// Wrap raw mask bits
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        MuteMask(bits)
    }

    /// Raw mask bits
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether any of the given channel bits is muted
    #[inline]
    pub fn is_muted(self, channels: u32) -> bool {
        self.0 & channels != 0
    }

    /// Whether all of the given channel bits are audible
    #[inline]
    pub fn is_audible(self, channels: u32) -> bool {
        !self.is_muted(channels)
    }
}

impl From<u32> for MuteMask {
    fn from(bits: u32) -> Self {
        MuteMask(bits)
    }
}

impl From<OpllChannels> for MuteMask {
    fn from(channels: OpllChannels) -> Self {
        MuteMask(channels.bits())
    }
}

impl From<Opn2Channels> for MuteMask {
    fn from(channels: Opn2Channels) -> Self {
        MuteMask(channels.bits())
    }
}
