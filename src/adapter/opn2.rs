//! Nuked-OPN2 adapter
//!
//! The core is clocked 24 times per output sample. Writes are buffered and
//! released one per cycle whenever the core's own busy flag is clear, so no
//! countdown is kept here. The channel about to be produced is read before
//! clocking; left and right are accumulated separately because the core
//! already outputs a stereo pair.

use super::{check_buffers, FmAdapter};
use crate::backend::Opn2Core;
use crate::classifier::{classify_opn2, OPN2_CYCLES_PER_SAMPLE};
use crate::config::ChipFamily;
use crate::mixer::{store, StereoAccumulator, StereoFrame, OPN2_OUTPUT_GAIN};
use crate::mute::MuteMask;
use crate::write_queue::WriteQueue;

/// Bus ports are the low two address bits (bank select + address/data)
const PORT_MASK: u32 = 0x03;

/// Queued, busy-gated, channel-classified driver for an [`Opn2Core`].
pub struct NukedOpn2Adapter<C: Opn2Core> {
    core: C,
    mute: MuteMask,
    queue: WriteQueue,
}

impl<C: Opn2Core> NukedOpn2Adapter<C> {
    /// Wrap `core` and reset it
    pub fn new(core: C) -> Self {
        let mut adapter = Self {
            core,
            mute: MuteMask::NONE,
            queue: WriteQueue::new(),
        };
        adapter.reset(0);
        adapter
    }

    /// The wrapped core
    pub fn core(&self) -> &C {
        &self.core
    }

    /// The wrapped core, mutably
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    #[inline]
    fn substep(&mut self, acc: &mut StereoAccumulator) {
        if let Some(write) = self.queue.pop_if(!self.core.write_busy()) {
            self.core.write(write.address, write.data);
        }

        let channel = classify_opn2(self.core.cycle(), self.core.dac_enabled());
        let output = self.core.clock();

        if let Some(channel) = channel {
            acc.add(self.mute, channel.bits(), output);
        }
    }

    fn next_frame(&mut self) -> StereoFrame {
        let mut acc = StereoAccumulator::new();
        for _ in 0..OPN2_CYCLES_PER_SAMPLE {
            self.substep(&mut acc);
        }
        acc.finish(OPN2_OUTPUT_GAIN)
    }
}

impl<C: Opn2Core> FmAdapter for NukedOpn2Adapter<C> {
    fn family(&self) -> ChipFamily {
        ChipFamily::NukedOpn2
    }

    /// The OPN2 has no sub-variants; `mode` is ignored.
    fn reset(&mut self, _mode: u8) {
        self.core.reset();
        self.queue.clear();
    }

    fn write(&mut self, address: u32, data: u8) -> crate::Result<()> {
        self.queue.push(address & PORT_MASK, data)
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

impl<C: Opn2Core> std::fmt::Debug for NukedOpn2Adapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NukedOpn2Adapter")
            .field("mute", &self.mute)
            .field("pending_writes", &self.queue.len())
            .finish_non_exhaustive()
    }
}
