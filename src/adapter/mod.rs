//! Chip family adapters
//!
//! One adapter per wrapped core family, each turning the core's native
//! clocking into whole stereo output samples:
//!
//! - `opll` - Nuked-OPLL style, 18 substeps per sample, queued and gated writes
//! - `opn2` - Nuked-OPN2 style, 24 substeps per sample, writes gated by the core's busy flag
//! - `ymfm` - ymfm OPLL, 1 step per sample, writes applied immediately
//!
//! All adapters implement [`FmAdapter`], and [`ChipAdapter`] is the tagged
//! union the facade stores so that every call dispatches in one place.

pub mod opll;
pub mod opn2;
pub mod ymfm;

pub use opll::NukedOpllAdapter;
pub use opn2::NukedOpn2Adapter;
pub use ymfm::YmfmOpllAdapter;

use crate::backend::{OpllCore, Opn2Core, YmfmOpllCore};
use crate::config::ChipFamily;

/// Uniform interface over chip family adapters
///
/// # Example
///
/// ```ignore
/// use fm_adapter::adapter::FmAdapter;
///
/// fn render_block(chip: &mut dyn FmAdapter) -> (Vec<i32>, Vec<i32>) {
///     chip.write(0, 0x0E).unwrap();
///     chip.write(1, 0x30).unwrap();
///     chip.render(735)
/// }
/// ```
pub trait FmAdapter: Send {
    /// Core family driven by this adapter
    fn family(&self) -> ChipFamily;

    /// Reinitialize the core.
    ///
    /// Pending writes are discarded; the mute mask is kept.
    ///
    /// # Arguments
    ///
    /// * `mode` - Operating-mode flag (chip sub-variant), ignored by families without variants
    fn reset(&mut self, mode: u8);

    /// Submit a register write.
    ///
    /// Queued families delay the write until the chip can accept it;
    /// write-through families apply it immediately.
    fn write(&mut self, address: u32, data: u8) -> crate::Result<()>;

    /// Replace the mute mask (bit set = channel silenced)
    fn set_mute_mask(&mut self, mask: u32);

    /// Current mute mask
    fn mute_mask(&self) -> u32;

    /// Writes accepted but not yet applied to the core
    fn pending_writes(&self) -> usize {
        0
    }

    /// Produce `left.len()` stereo samples.
    ///
    /// # Panics
    ///
    /// Panics if `left` and `right` differ in length.
    fn stream_update(&mut self, left: &mut [i32], right: &mut [i32]);

    /// Produce `samples` stereo samples into new buffers.
    fn render(&mut self, samples: usize) -> (Vec<i32>, Vec<i32>) {
        let mut left = vec![0; samples];
        let mut right = vec![0; samples];
        self.stream_update(&mut left, &mut right);
        (left, right)
    }
}

/// Tagged adapter over boxed cores, fixed to one family for its lifetime
pub enum ChipAdapter {
    /// Nuked-OPLL style core
    NukedOpll(NukedOpllAdapter<Box<dyn OpllCore>>),
    /// Nuked-OPN2 style core
    NukedOpn2(NukedOpn2Adapter<Box<dyn Opn2Core>>),
    /// ymfm OPLL core
    YmfmOpll(YmfmOpllAdapter<Box<dyn YmfmOpllCore>>),
}

impl ChipAdapter {
    fn inner(&self) -> &dyn FmAdapter {
        match self {
            ChipAdapter::NukedOpll(chip) => chip,
            ChipAdapter::NukedOpn2(chip) => chip,
            ChipAdapter::YmfmOpll(chip) => chip,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FmAdapter {
        match self {
            ChipAdapter::NukedOpll(chip) => chip,
            ChipAdapter::NukedOpn2(chip) => chip,
            ChipAdapter::YmfmOpll(chip) => chip,
        }
    }
}

impl FmAdapter for ChipAdapter {
    fn family(&self) -> ChipFamily {
        self.inner().family()
    }

    fn reset(&mut self, mode: u8) {
        self.inner_mut().reset(mode)
    }

    fn write(&mut self, address: u32, data: u8) -> crate::Result<()> {
        self.inner_mut().write(address, data)
    }

    fn set_mute_mask(&mut self, mask: u32) {
        self.inner_mut().set_mute_mask(mask)
    }

    fn mute_mask(&self) -> u32 {
        self.inner().mute_mask()
    }

    fn pending_writes(&self) -> usize {
        self.inner().pending_writes()
    }

    fn stream_update(&mut self, left: &mut [i32], right: &mut [i32]) {
        self.inner_mut().stream_update(left, right)
    }
}

impl std::fmt::Debug for ChipAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChipAdapter::NukedOpll(chip) => f.debug_tuple("NukedOpll").field(chip).finish(),
            ChipAdapter::NukedOpn2(chip) => f.debug_tuple("NukedOpn2").field(chip).finish(),
            ChipAdapter::YmfmOpll(chip) => f.debug_tuple("YmfmOpll").field(chip).finish(),
        }
    }
}

/// Panic unless both output buffers have the same length
#[inline]
pub(crate) fn check_buffers(left: &[i32], right: &[i32]) {
    assert_eq!(
        left.len(),
        right.len(),
        "Left and right output buffers must have the same length"
    );
}
