//! Nuked-OPLL adapter
//!
//! The core emulates the YM2413's round-robin outputs: every internal cycle
//! produces one channel on either the melody or the rhythm DAC. The adapter
//! pretends the chip emits one summed sample every 18 cycles:
//!
//! 1. At most one queued write is applied per cycle, no faster than the
//!    address/data latch timing allows (12 / 84 cycles).
//! 2. The core is clocked and its cycle counter tells which channel(s) the
//!    output belongs to.
//! 3. Unmuted outputs are summed, rhythm doubled, and the total scaled by 8
//!    to sit roughly level with MAME and emu2413.

use super::{check_buffers, FmAdapter};
use crate::backend::{OpllCore, OpllVariant};
use crate::classifier::{classify_opll, OPLL_CYCLES_PER_SAMPLE};
use crate::config::ChipFamily;
use crate::gate::WriteGate;
use crate::mixer::{store, MonoAccumulator, StereoFrame, OPLL_OUTPUT_GAIN, RHYTHM_DOUBLING};
use crate::mute::MuteMask;
use crate::write_queue::WriteQueue;

/// Queued, gated, channel-classified driver for an [`OpllCore`].
///
/// # Example
///
/// ```ignore
/// use fm_adapter::adapter::{FmAdapter, NukedOpllAdapter};
///
/// let mut chip = NukedOpllAdapter::new(MyOpll::default(), 0);
/// chip.write(0, 0x0E)?; // select rhythm register
/// chip.write(1, 0x30)?; // rhythm mode + bass drum
/// let (left, right) = chip.render(100);
/// ```
pub struct NukedOpllAdapter<C: OpllCore> {
    core: C,
    variant: OpllVariant,
    mute: MuteMask,
    queue: WriteQueue,
    gate: WriteGate,
}

impl<C: OpllCore> NukedOpllAdapter<C> {
    /// Wrap `core` and reset it for the given operating mode.
    ///
    /// # Arguments
    ///
    /// * `core` - Emulation core to drive
    /// * `mode` - 0 for YM2413, non-zero for DS1001
    pub fn new(core: C, mode: u8) -> Self {
        let mut adapter = Self {
            core,
            variant: OpllVariant::from_mode(mode),
            mute: MuteMask::NONE,
            queue: WriteQueue::new(),
            gate: WriteGate::new(),
        };
        adapter.reset(mode);
        adapter
    }

    /// Patch set selected at the last reset
    pub fn variant(&self) -> OpllVariant {
        self.variant
    }

    /// Substeps left before the next queued write may be applied
    pub fn gate_remaining(&self) -> u32 {
        self.gate.remaining()
    }

    /// The wrapped core
    pub fn core(&self) -> &C {
        &self.core
    }

    /// The wrapped core, mutably
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Run one substep, accumulating its unmuted contributions
    #[inline]
    fn substep(&mut self, acc: &mut MonoAccumulator) {
        if let Some(write) = self.queue.pop_if(self.gate.is_open()) {
            self.core.write(write.address, write.data);
            self.gate.arm(write.address);
        }

        let [melody, rhythm] = self.core.clock();
        self.gate.tick();

        let slot = classify_opll(self.core.cycle());
        if let Some(tone) = slot.tone {
            acc.add(self.mute, tone.bits(), melody);
        }
        if let Some(drum) = slot.rhythm {
            acc.add(self.mute, drum.bits(), rhythm.wrapping_mul(RHYTHM_DOUBLING));
        }
    }

    /// Produce one output sample
    fn next_frame(&mut self) -> StereoFrame {
        let mut acc = MonoAccumulator::new();
        for _ in 0..OPLL_CYCLES_PER_SAMPLE {
            self.substep(&mut acc);
        }
        acc.finish(OPLL_OUTPUT_GAIN)
    }
}

impl<C: OpllCore> FmAdapter for NukedOpllAdapter<C> {
    fn family(&self) -> ChipFamily {
        ChipFamily::NukedOpll
    }

    fn reset(&mut self, mode: u8) {
        self.variant = OpllVariant::from_mode(mode);
        self.core.reset(self.variant);
        self.queue.clear();
        self.gate.reset();
    }

    fn write(&mut self, address: u32, data: u8) -> crate::Result<()> {
        self.queue.push(address, data)
    }

    fn set_mute_mask(&mut self, mask: u32) {
        self.mute = MuteMask::from_bits(mask);
    }

    fn mute_mask(&self) -> u32 {
        self.mute.bits()
    }

    fn pending_writes(&self) -> usize {
        self.queue.len()
    }

    fn stream_update(&mut self, left: &mut [i32], right: &mut [i32]) {
        check_buffers(left, right);
        for i in 0..left.len() {
            let frame = self.next_frame();
            store(left, right, i, frame);
        }
    }
}

impl<C: OpllCore> std::fmt::Debug for NukedOpllAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NukedOpllAdapter")
            .field("variant", &self.variant)
            .field("mute", &self.mute)
            .field("pending_writes", &self.queue.len())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
