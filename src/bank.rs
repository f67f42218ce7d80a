//! Multi-chip adapter facade
//!
//! A [`ChipBank`] owns every chip instance a playback engine drives, each
//! behind a generational [`ChipHandle`]. All calls dispatch on the family
//! tag fixed when the instance was created. Instances share no state, and
//! the bank performs no locking: the caller serializes calls per bank.
//!
//! # Examples
//!
//! ```ignore
//! use fm_adapter::{Backends, ChipBank, ChipConfig, ChipFamily};
//!
//! let backends = Backends::new().with_nuked_opll(|| Box::new(MyOpll::default()));
//! let mut bank = ChipBank::new(backends);
//!
//! let chip = bank.create(&ChipConfig::new(ChipFamily::NukedOpll))?;
//! bank.write(chip, 0, 0x0E)?;
//! bank.write(chip, 1, 0x30)?;
//!
//! let mut left = vec![0; 735];
//! let mut right = vec![0; 735];
//! bank.stream_update(chip, &mut left, &mut right);
//!
//! bank.destroy(chip);
//! ```

use crate::adapter::{
    ChipAdapter, FmAdapter, NukedOpllAdapter, NukedOpn2Adapter, YmfmOpllAdapter,
};
use crate::backend::{OpllCore, Opn2Core, YmfmOpllCore};
use crate::config::{ChipConfig, ChipFamily};
use crate::{AdapterError, Result};

type OpllFactory = Box<dyn Fn() -> Box<dyn OpllCore> + Send>;
type Opn2Factory = Box<dyn Fn() -> Box<dyn Opn2Core> + Send>;
type YmfmFactory = Box<dyn Fn() -> Box<dyn YmfmOpllCore> + Send>;

/// Registry of available emulation cores.
///
/// Each family is optional; creating an instance of a family with no
/// registered factory fails with [`AdapterError::BackendUnavailable`].
#[derive(Default)]
pub struct Backends {
    opll: Option<OpllFactory>,
    opn2: Option<Opn2Factory>,
    ymfm: Option<YmfmFactory>,
}

impl Backends {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the Nuked-OPLL core factory
    pub fn with_nuked_opll<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn OpllCore> + Send + 'static,
    {
        self.opll = Some(Box::new(factory));
        self
    }

    /// Register the Nuked-OPN2 core factory
    pub fn with_nuked_opn2<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Opn2Core> + Send + 'static,
    {
        self.opn2 = Some(Box::new(factory));
        self
    }

    /// Register the ymfm OPLL core factory
    pub fn with_ymfm_opll<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn YmfmOpllCore> + Send + 'static,
    {
        self.ymfm = Some(Box::new(factory));
        self
    }

    /// Whether a core is registered for `family`
    pub fn supports(&self, family: ChipFamily) -> bool {
        match family {
            ChipFamily::NukedOpll => self.opll.is_some(),
            ChipFamily::NukedOpn2 => self.opn2.is_some(),
            ChipFamily::YmfmOpll => self.ymfm.is_some(),
        }
    }

    /// Build an adapter for `config`
    fn build(&self, config: &ChipConfig) -> Result<ChipAdapter> {
        let unavailable = || AdapterError::BackendUnavailable(config.family);
        let adapter = match config.family {
            ChipFamily::NukedOpll => {
                let factory = self.opll.as_ref().ok_or_else(unavailable)?;
                ChipAdapter::NukedOpll(NukedOpllAdapter::new(factory(), config.mode))
            }
            ChipFamily::NukedOpn2 => {
                let factory = self.opn2.as_ref().ok_or_else(unavailable)?;
                ChipAdapter::NukedOpn2(NukedOpn2Adapter::new(factory()))
            }
            ChipFamily::YmfmOpll => {
                let factory = self.ymfm.as_ref().ok_or_else(unavailable)?;
                ChipAdapter::YmfmOpll(YmfmOpllAdapter::new(factory()))
            }
        };
        Ok(adapter)
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("nuked_opll", &self.opll.is_some())
            .field("nuked_opn2", &self.opn2.is_some())
            .field("ymfm_opll", &self.ymfm.is_some())
            .finish()
    }
}

/// Opaque reference to a chip instance inside a [`ChipBank`].
///
/// A handle stays valid until the instance is destroyed; the slot may be
/// reused afterwards but the old handle never resolves again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChipHandle {
    index: u32,
    generation: u32,
}

impl ChipHandle {
    /// Slot index (for diagnostics)
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl std::fmt::Display for ChipHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chip#{}.{}", self.index, self.generation)
    }
}

/// A live chip: its adapter plus the configuration it was built from
#[derive(Debug)]
struct ChipInstance {
    adapter: ChipAdapter,
    config: ChipConfig,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    chip: Option<ChipInstance>,
}

/// Arena of chip instances behind generational handles.
#[derive(Debug)]
pub struct ChipBank {
    backends: Backends,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl ChipBank {
    /// Create an empty bank using the given core registry
    pub fn new(backends: Backends) -> Self {
        Self {
            backends,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Core registry backing this bank
    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Number of live instances
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the bank holds no live instances
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `handle` refers to a live instance
    pub fn contains(&self, handle: ChipHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.chip.is_some())
    }

    /// Construct and reset a new chip instance.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::ConfigError`] if `config` fails validation
    /// - [`AdapterError::BackendUnavailable`] if no core is registered for the family
    pub fn create(&mut self, config: &ChipConfig) -> Result<ChipHandle> {
        config.validate()?;
        let adapter = self.backends.build(config).inspect_err(|_| {
            log::warn!("No backend registered for {}", config.family);
        })?;

        let instance = ChipInstance {
            adapter,
            config: *config,
        };

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.chip = Some(instance);
        self.live += 1;

        let handle = ChipHandle {
            index,
            generation: slot.generation,
        };
        log::debug!(
            "Created {} as {handle} (mode {}, {} Hz)",
            config.family,
            config.mode,
            config.output_rate()
        );
        Ok(handle)
    }

    /// Release an instance and every write still queued for it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or already destroyed.
    pub fn destroy(&mut self, handle: ChipHandle) {
        self.instance(handle);
        let slot = &mut self.slots[handle.index as usize];
        slot.chip = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        log::debug!("Destroyed {handle}");
    }

    /// Reinitialize an instance's core for `mode`.
    ///
    /// The mute mask and family are kept; queued writes are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn reset(&mut self, handle: ChipHandle, mode: u8) {
        let chip = self.instance_mut(handle);
        chip.config.mode = mode;
        chip.adapter.reset(mode);
        log::debug!("Reset {handle} (mode {mode})");
    }

    /// Submit a register write.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::QueueAllocation`] if the write queue cannot grow.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn write(&mut self, handle: ChipHandle, address: u32, data: u8) -> Result<()> {
        self.instance_mut(handle).adapter.write(address, data)
    }

    /// Replace an instance's mute mask.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn set_mute_mask(&mut self, handle: ChipHandle, mask: u32) {
        self.instance_mut(handle).adapter.set_mute_mask(mask);
    }

    /// Render `left.len()` samples into the caller's buffers.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed, or if the buffers differ
    /// in length.
    pub fn stream_update(&mut self, handle: ChipHandle, left: &mut [i32], right: &mut [i32]) {
        self.instance_mut(handle).adapter.stream_update(left, right);
    }

    /// Render `samples` samples into new buffers.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn render(&mut self, handle: ChipHandle, samples: usize) -> (Vec<i32>, Vec<i32>) {
        self.instance_mut(handle).adapter.render(samples)
    }

    /// Family an instance was created with
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn family(&self, handle: ChipHandle) -> ChipFamily {
        self.instance(handle).adapter.family()
    }

    /// Output rate of an instance in Hz
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn output_rate(&self, handle: ChipHandle) -> u32 {
        self.instance(handle).config.output_rate()
    }

    /// Current mute mask of an instance
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn mute_mask(&self, handle: ChipHandle) -> u32 {
        self.instance(handle).adapter.mute_mask()
    }

    /// Writes accepted but not yet applied to an instance's core
    ///
    /// # Panics
    ///
    /// Panics if `handle` is invalid or destroyed.
    pub fn pending_writes(&self, handle: ChipHandle) -> usize {
        self.instance(handle).adapter.pending_writes()
    }

    /// Borrow an instance's adapter, if the handle is live
    pub fn get(&self, handle: ChipHandle) -> Option<&ChipAdapter> {
        self.lookup(handle).map(|chip| &chip.adapter)
    }

    /// Mutably borrow an instance's adapter, if the handle is live
    pub fn get_mut(&mut self, handle: ChipHandle) -> Option<&mut ChipAdapter> {
        self.lookup_mut(handle).map(|chip| &mut chip.adapter)
    }

    fn lookup(&self, handle: ChipHandle) -> Option<&ChipInstance> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.chip.as_ref())
    }

    fn lookup_mut(&mut self, handle: ChipHandle) -> Option<&mut ChipInstance> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.chip.as_mut())
    }

    fn instance(&self, handle: ChipHandle) -> &ChipInstance {
        match self.lookup(handle) {
            Some(chip) => chip,
            None => panic!("invalid or destroyed chip handle {handle}"),
        }
    }

    fn instance_mut(&mut self, handle: ChipHandle) -> &mut ChipInstance {
        match self.lookup_mut(handle) {
            Some(chip) => chip,
            None => panic!("invalid or destroyed chip handle {handle}"),
        }
    }
}
