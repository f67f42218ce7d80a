//! Channel classification by internal cycle
//!
//! Both Nuked cores multiplex every channel onto one output, one channel per
//! internal cycle. Classifying each substep by the cycle counter lets the
//! mixer apply per-channel mute bits without touching emulator state.

use crate::mute::{OpllChannels, Opn2Channels};

/// Number of OPLL internal cycles per output sample
pub const OPLL_CYCLES_PER_SAMPLE: u32 = 18;

/// Number of OPN2 internal cycles per output sample
pub const OPN2_CYCLES_PER_SAMPLE: u32 = 24;

/// Logical channels carried by one OPLL cycle.
///
/// Cycles 2-4 carry either tone 6-8 or a rhythm instrument depending on
/// rhythm mode; the core outputs zero on whichever path is inactive, so
/// both are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpllSlot {
    /// Tone channel on the melody output
    pub tone: Option<OpllChannels>,
    /// Rhythm instrument on the rhythm output
    pub rhythm: Option<OpllChannels>,
}

impl OpllSlot {
    const IDLE: OpllSlot = OpllSlot {
        tone: None,
        rhythm: None,
    };

    const fn tone(channel: OpllChannels) -> Self {
        OpllSlot {
            tone: Some(channel),
            rhythm: None,
        }
    }

    const fn rhythm(channel: OpllChannels) -> Self {
        OpllSlot {
            tone: None,
            rhythm: Some(channel),
        }
    }

    const fn shared(tone: OpllChannels, rhythm: OpllChannels) -> Self {
        OpllSlot {
            tone: Some(tone),
            rhythm: Some(rhythm),
        }
    }

    /// Whether the cycle carries no channel at all
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.tone.is_none() && self.rhythm.is_none()
    }
}

/// OPLL cycle → channel table, indexed by the cycle counter after clocking.
const OPLL_SLOTS: [OpllSlot; OPLL_CYCLES_PER_SAMPLE as usize] = [
    OpllSlot::rhythm(OpllChannels::HI_HAT),
    OpllSlot::rhythm(OpllChannels::TOM_TOM),
    OpllSlot::shared(OpllChannels::TONE_6, OpllChannels::BASS_DRUM),
    OpllSlot::shared(OpllChannels::TONE_7, OpllChannels::SNARE_DRUM),
    OpllSlot::shared(OpllChannels::TONE_8, OpllChannels::CYMBAL),
    OpllSlot::IDLE,
    OpllSlot::IDLE,
    OpllSlot::IDLE,
    OpllSlot::tone(OpllChannels::TONE_0),
    OpllSlot::tone(OpllChannels::TONE_1),
    OpllSlot::tone(OpllChannels::TONE_2),
    OpllSlot::IDLE,
    OpllSlot::IDLE,
    OpllSlot::IDLE,
    OpllSlot::tone(OpllChannels::TONE_3),
    OpllSlot::tone(OpllChannels::TONE_4),
    OpllSlot::tone(OpllChannels::TONE_5),
    OpllSlot::IDLE,
];

/// Classify an OPLL cycle.
///
/// Out-of-range cycle values classify as idle.
#[inline]
pub fn classify_opll(cycle: u32) -> OpllSlot {
    match OPLL_SLOTS.get(cycle as usize) {
        Some(slot) => *slot,
        None => {
            log::trace!("OPLL cycle {cycle} out of range, treating as idle");
            OpllSlot::IDLE
        }
    }
}

/// Classify an OPN2 cycle.
///
/// Channels are produced in groups of four cycles, in the order
/// 2, 6/DAC, 4, 1, 5, 3. The second group belongs to the DAC while DAC mode
/// is enabled.
///
/// # Arguments
///
/// * `cycle` - Cycle counter of the cycle about to be produced (0-23)
/// * `dac_enabled` - Whether channel 6 is in DAC mode
///
/// # Returns
///
/// The channel bit, or `None` for an out-of-range cycle
#[inline]
pub fn classify_opn2(cycle: u32, dac_enabled: bool) -> Option<Opn2Channels> {
    match cycle >> 2 {
        0 => Some(Opn2Channels::CH_2),
        1 if dac_enabled => Some(Opn2Channels::DAC),
        1 => Some(Opn2Channels::CH_6),
        2 => Some(Opn2Channels::CH_4),
        3 => Some(Opn2Channels::CH_1),
        4 => Some(Opn2Channels::CH_5),
        5 => Some(Opn2Channels::CH_3),
        _ => {
            log::trace!("OPN2 cycle {cycle} out of range, treating as idle");
            None
        }
    }
}
