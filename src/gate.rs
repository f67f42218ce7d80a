//! Write clock gate
//!
//! Real FM chips need a number of internal clocks to latch a bus write before
//! they accept the next one. The gate models that latency in substeps.
//!
//! - OPLL: the adapter owns an explicit countdown, armed with
//!   [`ADDRESS_WRITE_LATENCY`] or [`DATA_WRITE_LATENCY`] after each write.
//! - OPN2: the core tracks its own busy flag; see
//!   [`Opn2Core::write_busy`](crate::backend::Opn2Core::write_busy).

/// Substeps to wait after an OPLL address-register write
pub const ADDRESS_WRITE_LATENCY: u32 = 12;

/// Substeps to wait after an OPLL data-register write
pub const DATA_WRITE_LATENCY: u32 = 84;

/// Latency owed after applying an OPLL write to `address`.
///
/// Address field 0 selects the address register; anything else is a data
/// register write.
#[inline]
pub fn opll_write_latency(address: u32) -> u32 {
    if address == 0 {
        ADDRESS_WRITE_LATENCY
    } else {
        DATA_WRITE_LATENCY
    }
}

/// Countdown gate consulted once per substep.
///
/// The counter keeps ticking toward zero while the queue is empty, so a write
/// arriving later is not charged for latency that has already elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteGate {
    remaining: u32,
}

impl WriteGate {
    /// Create an open gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a write may be applied in the current substep
    #[inline]
    pub fn is_open(&self) -> bool {
        self.remaining == 0
    }

    /// Substeps left before the gate opens
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Close the gate for the latency owed by a write to `address`
    #[inline]
    pub fn arm(&mut self, address: u32) {
        self.remaining = opll_write_latency(address);
    }

    /// Count one elapsed substep
    #[inline]
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Reopen the gate immediately
    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}
