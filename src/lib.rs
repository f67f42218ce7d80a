//! FM chip adapter layer
//!
//! Drives interchangeable YM2413 (OPLL) and YM2612 (OPN2) emulation cores
//! through one call surface: create, reset, write, set mute mask and stream
//! a block of stereo samples. The FM synthesis itself lives in the wrapped
//! cores; this crate supplies the per-sample clocking around them.
//!
//! # Features
//! - Register writes buffered and released at chip-accurate latch timing
//! - Fixed per-family substep clocking (18 for OPLL, 24 for OPN2, 1 for ymfm)
//! - Per-channel muting by classifying every substep's output
//! - Output gain matched across core families
//! - Multi-chip facade with generational handles
//!
//! # Crate feature flags
//! - `export-wav` (opt-in): Render adapter output to WAV files (`export`)
//!
//! # Backend Traits
//! The [`OpllCore`], [`Opn2Core`] and [`YmfmOpllCore`] traits describe the
//! wrapped emulators. Implement them over the emulator of choice and
//! register a factory on [`Backends`].
//!
//! # Quick start
//! ```ignore
//! use fm_adapter::{Backends, ChipBank, ChipConfig, ChipFamily};
//!
//! let backends = Backends::new()
//!     .with_nuked_opll(|| Box::new(MyOpll::default()))
//!     .with_nuked_opn2(|| Box::new(MyOpn2::default()));
//! let mut bank = ChipBank::new(backends);
//!
//! let opll = bank.create(&ChipConfig::new(ChipFamily::NukedOpll))?;
//! bank.write(opll, 0, 0x0E)?; // rhythm register
//! bank.write(opll, 1, 0x30)?; // rhythm mode + bass drum
//! bank.set_mute_mask(opll, 1 << 13); // silence the hi-hat
//!
//! let (left, right) = bank.render(opll, 735);
//! ```

#![warn(missing_docs)]

pub mod adapter; // Family adapters (substep drivers)
pub mod backend; // Wrapped core traits
pub mod bank; // Multi-chip facade
pub mod classifier; // Cycle → channel tables
pub mod config; // Construction parameters
pub mod gate; // Write latency gating
pub mod mixer; // Accumulation and output gain
pub mod mute; // Mute masks
pub mod write_queue; // Pending write FIFO

#[cfg(feature = "export-wav")]
pub mod export; // Audio file export

/// Error types for chip adapter operations
///
/// The streaming path never fails; errors only arise while configuring
/// instances, queueing writes or exporting audio.
#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    /// No core factory registered for the requested family
    #[error("No backend available for {0}")]
    BackendUnavailable(ChipFamily),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Write queue could not grow
    #[error("Write queue allocation failed: {0}")]
    QueueAllocation(#[from] std::collections::TryReserveError),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for AdapterError {
    /// Converts a String into `AdapterError::Other`.
    ///
    /// Prefer a specific variant where one fits; this conversion loses the
    /// error category.
    fn from(msg: String) -> Self {
        AdapterError::Other(msg)
    }
}

impl From<&str> for AdapterError {
    /// Converts a string slice into `AdapterError::Other`.
    fn from(msg: &str) -> Self {
        AdapterError::Other(msg.to_string())
    }
}

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

// Public API exports
pub use adapter::{ChipAdapter, FmAdapter, NukedOpllAdapter, NukedOpn2Adapter, YmfmOpllAdapter};
pub use backend::{OpllCore, OpllVariant, Opn2Core, YmfmOpllCore};
pub use bank::{Backends, ChipBank, ChipHandle};
pub use config::{ChipConfig, ChipFamily, SamplingMode};
pub use mixer::StereoFrame;
pub use mute::{MuteMask, OpllChannels, Opn2Channels};
pub use write_queue::{PendingWrite, WriteQueue};

#[cfg(feature = "export-wav")]
pub use export::wav::write_wav;
