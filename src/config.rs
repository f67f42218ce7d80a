//! Chip construction parameters
//!
//! Describes which core family an instance wraps and how its output rate is
//! derived from the chip clock. Configurations can be built in code or
//! deserialized from JSON alongside the rest of a playback setup.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::{AdapterError, Result};

/// Chip clock cycles per native output sample
pub const CLOCK_DIVIDER: u32 = 72;

/// Default requested output rate (44.1 kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default YM2413 master clock (NTSC colorburst)
pub const DEFAULT_OPLL_CLOCK: u32 = 3_579_545;

/// Default YM2612 master clock (NTSC Mega Drive)
pub const DEFAULT_OPN2_CLOCK: u32 = 7_670_453;

/// Emulation core family backing a chip instance
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ChipFamily {
    /// Nuked-OPLL (YM2413 / DS1001), 18 substeps per sample
    NukedOpll = 0,
    /// Nuked-OPN2 (YM2612 / YM3438), 24 substeps per sample
    NukedOpn2 = 1,
    /// ymfm YM2413, one step per sample
    YmfmOpll = 2,
}

impl ChipFamily {
    /// Every family, in selector order
    pub const ALL: [ChipFamily; 3] = [
        ChipFamily::NukedOpll,
        ChipFamily::NukedOpn2,
        ChipFamily::YmfmOpll,
    ];

    /// Decode a raw family selector from the playback engine
    pub fn from_raw(value: u8) -> Option<Self> {
        Self::from_u8(value)
    }

    /// Core clock substeps run per output sample
    pub fn substeps_per_sample(self) -> u32 {
        match self {
            ChipFamily::NukedOpll => crate::classifier::OPLL_CYCLES_PER_SAMPLE,
            ChipFamily::NukedOpn2 => crate::classifier::OPN2_CYCLES_PER_SAMPLE,
            ChipFamily::YmfmOpll => 1,
        }
    }

    /// Whether writes are buffered and time-gated (false = write-through)
    pub fn queues_writes(self) -> bool {
        !matches!(self, ChipFamily::YmfmOpll)
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ChipFamily::NukedOpll => "Nuked-OPLL",
            ChipFamily::NukedOpn2 => "Nuked-OPN2",
            ChipFamily::YmfmOpll => "ymfm OPLL",
        }
    }
}

impl std::fmt::Display for ChipFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the output rate relates to the chip's native rate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, FromPrimitive,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SamplingMode {
    /// Always run at the native rate (clock / 72)
    #[default]
    Native = 0,
    /// Native rate, raised to the requested rate if lower
    Highest = 1,
    /// Always run at the requested rate
    Requested = 2,
}

impl SamplingMode {
    /// Decode a raw sampling-mode selector
    pub fn from_raw(value: u8) -> Option<Self> {
        Self::from_u8(value)
    }
}

/// Construction parameters for one chip instance
///
/// # Example
///
/// ```
/// use fm_adapter::{ChipConfig, ChipFamily};
///
/// let cfg = ChipConfig::from_json(r#"{ "family": "nuked_opll", "clock": 3579545 }"#).unwrap();
/// assert_eq!(cfg.family, ChipFamily::NukedOpll);
/// assert_eq!(cfg.output_rate(), 49_715);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipConfig {
    /// Core family
    pub family: ChipFamily,
    /// Operating-mode flag (chip sub-variant)
    #[serde(default)]
    pub mode: u8,
    /// Chip master clock in Hz
    pub clock: u32,
    /// Chip option flags passed through from the playback engine
    #[serde(default)]
    pub flags: u8,
    /// Output rate policy
    #[serde(default)]
    pub sampling_mode: SamplingMode,
    /// Requested output rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl ChipConfig {
    /// Configuration with default clock and native sampling for `family`
    pub fn new(family: ChipFamily) -> Self {
        let clock = match family {
            ChipFamily::NukedOpn2 => DEFAULT_OPN2_CLOCK,
            ChipFamily::NukedOpll | ChipFamily::YmfmOpll => DEFAULT_OPLL_CLOCK,
        };
        Self {
            family,
            mode: 0,
            clock,
            flags: 0,
            sampling_mode: SamplingMode::Native,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Set the operating-mode flag
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }

    /// Set the master clock
    pub fn with_clock(mut self, clock: u32) -> Self {
        self.clock = clock;
        self
    }

    /// Set the sampling policy and requested rate
    pub fn with_sampling(mut self, mode: SamplingMode, sample_rate: u32) -> Self {
        self.sampling_mode = mode;
        self.sample_rate = sample_rate;
        self
    }

    /// Parse a configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::ConfigError`] for malformed JSON or an invalid
    /// configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChipConfig = serde_json::from_str(json)
            .map_err(|e| AdapterError::ConfigError(format!("Invalid chip config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AdapterError::Other(e.to_string()))
    }

    /// Check that the configuration can drive a chip
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::ConfigError`] for a zero clock, or a zero
    /// requested rate when the sampling mode uses it.
    pub fn validate(&self) -> Result<()> {
        if self.clock == 0 {
            return Err(AdapterError::ConfigError(format!(
                "{} clock must be non-zero",
                self.family
            )));
        }
        if self.sampling_mode != SamplingMode::Native && self.sample_rate == 0 {
            return Err(AdapterError::ConfigError(
                "Requested sample rate must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Native chip output rate (clock / 72)
    #[inline]
    pub fn native_rate(&self) -> u32 {
        self.clock / CLOCK_DIVIDER
    }

    /// Output rate after applying the sampling policy
    pub fn output_rate(&self) -> u32 {
        let native = self.native_rate();
        match self.sampling_mode {
            SamplingMode::Native => native,
            SamplingMode::Highest if native < self.sample_rate => self.sample_rate,
            SamplingMode::Highest => native,
            SamplingMode::Requested => self.sample_rate,
        }
    }
}
