//! Backend trait abstraction for wrapped FM emulation cores
//!
//! The adapters in this crate never synthesize audio themselves. They drive a
//! third-party emulation core through one of the traits below, one trait per
//! core family. Each trait exposes exactly what the clocking adapter needs:
//! a reset, a raw bus write, a single-step clock and the internal phase
//! signal used to classify the step's output by channel.

/// Chip sub-variant for OPLL-style cores.
///
/// The variant selects which instrument ROM the core loads on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpllVariant {
    /// Yamaha YM2413 (standard OPLL patch set)
    #[default]
    Ym2413,
    /// Yamaha DS1001 / Konami VRC7 patch set
    Ds1001,
}

impl OpllVariant {
    /// Map the playback engine's operating-mode flag to a variant.
    ///
    /// Mode 0 selects the YM2413; any other value selects the DS1001.
    #[inline]
    pub fn from_mode(mode: u8) -> Self {
        if mode == 0 {
            OpllVariant::Ym2413
        } else {
            OpllVariant::Ds1001
        }
    }
}

/// Cycle-stepped OPLL core (Nuked-OPLL style).
///
/// The core emulates the YM2413's round-robin output: each call to
/// [`clock`](OpllCore::clock) advances one of 18 internal cycles and returns
/// the melody and rhythm DAC values for that cycle.
///
/// # Example
///
/// ```
/// use fm_adapter::backend::{OpllCore, OpllVariant};
///
/// fn first_cycle<C: OpllCore>(core: &mut C) -> (u32, [i32; 2]) {
///     core.reset(OpllVariant::Ym2413);
///     let out = core.clock();
///     (core.cycle(), out)
/// }
/// ```
pub trait OpllCore: Send {
    /// Return the core to its power-on state using the given patch set.
    fn reset(&mut self, variant: OpllVariant);

    /// Write to the chip bus.
    ///
    /// # Arguments
    ///
    /// * `port` - Bus port (even = address latch, odd = data)
    /// * `data` - Byte to write
    fn write(&mut self, port: u32, data: u8);

    /// Advance one internal cycle.
    ///
    /// # Returns
    ///
    /// `[melody, rhythm]` output for the cycle just produced
    fn clock(&mut self) -> [i32; 2];

    /// Internal cycle counter (0-17) as it stands after the last `clock`.
    fn cycle(&self) -> u32;
}

/// Cycle-stepped OPN2 core (Nuked-OPN2 style).
///
/// Twenty-four calls to [`clock`](Opn2Core::clock) make up one full pass over
/// the six FM channels. Unlike the OPLL core, the OPN2 core models bus
/// latency itself and reports it through [`write_busy`](Opn2Core::write_busy).
pub trait Opn2Core: Send {
    /// Return the core to its power-on state.
    fn reset(&mut self);

    /// Write to the chip bus.
    ///
    /// # Arguments
    ///
    /// * `port` - Bus port (0-3: bit 0 selects data, bit 1 selects the upper bank)
    /// * `data` - Byte to write
    fn write(&mut self, port: u32, data: u8);

    /// Advance one internal cycle.
    ///
    /// # Returns
    ///
    /// `[left, right]` output for the cycle just produced
    fn clock(&mut self) -> [i16; 2];

    /// Internal cycle counter (0-23) of the cycle about to be produced.
    fn cycle(&self) -> u32;

    /// Whether channel 6 currently outputs the DAC instead of FM.
    fn dac_enabled(&self) -> bool;

    /// Whether the core is still absorbing the previous write.
    fn write_busy(&self) -> bool;
}

/// Whole-sample OPLL core (ymfm style).
///
/// The core has no sub-sample clocking and no modelled bus latency: writes
/// take effect immediately and one call to
/// [`generate`](YmfmOpllCore::generate) produces one output sample.
pub trait YmfmOpllCore: Send {
    /// Return the core to its power-on state.
    fn reset(&mut self);

    /// Write to the chip bus.
    fn write(&mut self, offset: u32, data: u8);

    /// Clock all channels once and render the enabled ones.
    ///
    /// # Arguments
    ///
    /// * `channel_mask` - 9-bit enable mask (bit set = channel rendered)
    ///
    /// # Returns
    ///
    /// `[melody, rhythm]` output
    fn generate(&mut self, channel_mask: u32) -> [i32; 2];
}

impl<T: OpllCore + ?Sized> OpllCore for Box<T> {
    fn reset(&mut self, variant: OpllVariant) {
        (**self).reset(variant)
    }

    fn write(&mut self, port: u32, data: u8) {
        (**self).write(port, data)
    }

    fn clock(&mut self) -> [i32; 2] {
        (**self).clock()
    }

    fn cycle(&self) -> u32 {
        (**self).cycle()
    }
}

impl<T: Opn2Core + ?Sized> Opn2Core for Box<T> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn write(&mut self, port: u32, data: u8) {
        (**self).write(port, data)
    }

    fn clock(&mut self) -> [i16; 2] {
        (**self).clock()
    }

    fn cycle(&self) -> u32 {
        (**self).cycle()
    }

    fn dac_enabled(&self) -> bool {
        (**self).dac_enabled()
    }

    fn write_busy(&self) -> bool {
        (**self).write_busy()
    }
}

impl<T: YmfmOpllCore + ?Sized> YmfmOpllCore for Box<T> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn write(&mut self, offset: u32, data: u8) {
        (**self).write(offset, data)
    }

    fn generate(&mut self, channel_mask: u32) -> [i32; 2] {
        (**self).generate(channel_mask)
    }
}
