//! Scripted fake cores for adapter tests
//!
//! Each fake follows the real core's clocking contract (cycle counter,
//! port layout) but emits fixed levels instead of FM synthesis, so the
//! adapter's gating, classification and gain can be asserted exactly.

#![allow(dead_code)]

use fm_adapter::{Backends, OpllCore, OpllVariant, Opn2Core, YmfmOpllCore};

/// Melody output of a keyed OPLL tone channel
pub const TONE_LEVEL: i32 = 100;
/// Rhythm output of a keyed OPLL drum
pub const RHYTHM_LEVEL: i32 = 50;
/// Left output of a keyed OPN2 channel (right is half)
pub const FM_LEVEL: i16 = 40;
/// Cycles the fake OPN2 stays busy after a data write
pub const OPN2_BUSY_CYCLES: u32 = 32;
/// Per-channel output of the fake ymfm core
pub const YMFM_LEVEL: i32 = 90;

/// A write as seen by a core, stamped with the clocks completed before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedWrite {
    pub substep: u64,
    pub port: u32,
    pub data: u8,
}

/// Rhythm register (0x0E) bit for the drum produced on an OPLL cycle
fn opll_drum_bit(cycle: u32) -> Option<u8> {
    match cycle {
        0 => Some(0x01), // hi-hat
        1 => Some(0x04), // tom-tom
        2 => Some(0x10), // bass drum
        3 => Some(0x08), // snare drum
        4 => Some(0x02), // cymbal
        _ => None,
    }
}

fn opll_tone_channel(cycle: u32) -> Option<usize> {
    match cycle {
        2..=4 => Some(cycle as usize + 4),
        8..=10 => Some(cycle as usize - 8),
        14..=16 => Some(cycle as usize - 11),
        _ => None,
    }
}

/// Fake Nuked-OPLL: key-on bit 4 of 0x20-0x28, rhythm register 0x0E
#[derive(Debug, Clone)]
pub struct FakeOpll {
    pub variant: Option<OpllVariant>,
    pub writes: Vec<AppliedWrite>,
    pub resets: usize,
    cycle: u32,
    clocks: u64,
    address: usize,
    registers: [u8; 0x40],
}

impl FakeOpll {
    pub fn new() -> Self {
        Self {
            variant: None,
            writes: Vec::new(),
            resets: 0,
            cycle: 0,
            clocks: 0,
            address: 0,
            registers: [0; 0x40],
        }
    }

    pub fn write_substeps(&self) -> Vec<u64> {
        self.writes.iter().map(|w| w.substep).collect()
    }

    fn rhythm_mode(&self) -> bool {
        self.registers[0x0E] & 0x20 != 0
    }
}

impl OpllCore for FakeOpll {
    fn reset(&mut self, variant: OpllVariant) {
        self.variant = Some(variant);
        self.resets += 1;
        self.cycle = 0;
        self.clocks = 0;
        self.address = 0;
        self.registers = [0; 0x40];
    }

    fn write(&mut self, port: u32, data: u8) {
        self.writes.push(AppliedWrite {
            substep: self.clocks,
            port,
            data,
        });
        if port & 1 == 0 {
            self.address = (data & 0x3F) as usize;
        } else {
            self.registers[self.address] = data;
        }
    }

    fn clock(&mut self) -> [i32; 2] {
        self.clocks += 1;
        self.cycle = (self.cycle + 1) % 18;

        let rhythm_mode = self.rhythm_mode();
        let melody = match opll_tone_channel(self.cycle) {
            Some(ch) if rhythm_mode && ch >= 6 => 0,
            Some(ch) if self.registers[0x20 + ch] & 0x10 != 0 => TONE_LEVEL,
            _ => 0,
        };
        let rhythm = match opll_drum_bit(self.cycle) {
            Some(bit) if rhythm_mode && self.registers[0x0E] & bit != 0 => RHYTHM_LEVEL,
            _ => 0,
        };
        [melody, rhythm]
    }

    fn cycle(&self) -> u32 {
        self.cycle
    }
}

/// Channel index (0-5) produced in each group of four OPN2 cycles
const OPN2_GROUP_CHANNEL: [usize; 6] = [1, 5, 3, 0, 4, 2];

/// Fake Nuked-OPN2: key-on via 0x28, DAC via 0x2A/0x2B
#[derive(Debug, Clone)]
pub struct FakeOpn2 {
    pub writes: Vec<AppliedWrite>,
    pub resets: usize,
    cycle: u32,
    clocks: u64,
    busy: u32,
    address: [u8; 2],
    registers: [[u8; 256]; 2],
    key_on: [bool; 6],
}

impl FakeOpn2 {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            resets: 0,
            cycle: 0,
            clocks: 0,
            busy: 0,
            address: [0; 2],
            registers: [[0; 256]; 2],
            key_on: [false; 6],
        }
    }

    pub fn write_substeps(&self) -> Vec<u64> {
        self.writes.iter().map(|w| w.substep).collect()
    }
}

impl Opn2Core for FakeOpn2 {
    fn reset(&mut self) {
        *self = FakeOpn2 {
            writes: std::mem::take(&mut self.writes),
            resets: self.resets + 1,
            ..FakeOpn2::new()
        };
    }

    fn write(&mut self, port: u32, data: u8) {
        self.writes.push(AppliedWrite {
            substep: self.clocks,
            port,
            data,
        });
        let bank = ((port >> 1) & 1) as usize;
        if port & 1 == 0 {
            self.address[bank] = data;
            return;
        }

        let address = self.address[bank];
        self.registers[bank][address as usize] = data;
        self.busy = OPN2_BUSY_CYCLES;
        if bank == 0 && address == 0x28 {
            let channel = match data & 0x07 {
                0..=2 => (data & 0x07) as usize,
                4..=6 => (data & 0x07) as usize - 1,
                _ => return,
            };
            self.key_on[channel] = data & 0xF0 != 0;
        }
    }

    fn clock(&mut self) -> [i16; 2] {
        let channel = OPN2_GROUP_CHANNEL[(self.cycle >> 2) as usize];
        let output = if channel == 5 && self.dac_enabled() {
            let dac = self.registers[0][0x2A] as i16 - 128;
            [dac, dac]
        } else if self.key_on[channel] {
            [FM_LEVEL, FM_LEVEL / 2]
        } else {
            [0, 0]
        };

        self.cycle = (self.cycle + 1) % 24;
        self.clocks += 1;
        self.busy = self.busy.saturating_sub(1);
        output
    }

    fn cycle(&self) -> u32 {
        self.cycle
    }

    fn dac_enabled(&self) -> bool {
        self.registers[0][0x2B] & 0x80 != 0
    }

    fn write_busy(&self) -> bool {
        self.busy > 0
    }
}

/// Fake ymfm OPLL: same register layout as [`FakeOpll`], whole samples
#[derive(Debug, Clone)]
pub struct FakeYmfm {
    pub masks: Vec<u32>,
    pub resets: usize,
    address: usize,
    registers: [u8; 0x40],
}

impl FakeYmfm {
    pub fn new() -> Self {
        Self {
            masks: Vec::new(),
            resets: 0,
            address: 0,
            registers: [0; 0x40],
        }
    }
}

impl YmfmOpllCore for FakeYmfm {
    fn reset(&mut self) {
        self.resets += 1;
        self.address = 0;
        self.registers = [0; 0x40];
    }

    fn write(&mut self, offset: u32, data: u8) {
        if offset & 1 == 0 {
            self.address = (data & 0x3F) as usize;
        } else {
            self.registers[self.address] = data;
        }
    }

    fn generate(&mut self, channel_mask: u32) -> [i32; 2] {
        self.masks.push(channel_mask);
        let rhythm_mode = self.registers[0x0E] & 0x20 != 0;
        let enabled = |ch: u32| channel_mask & (1 << ch) != 0;

        let mut melody = 0;
        for ch in 0..9u32 {
            if rhythm_mode && ch >= 6 {
                continue;
            }
            if enabled(ch) && self.registers[0x20 + ch as usize] & 0x10 != 0 {
                melody += YMFM_LEVEL;
            }
        }

        let mut rhythm = 0;
        if rhythm_mode {
            // (register bit, host channel)
            let drums = [(0x10, 6), (0x08, 7), (0x04, 7), (0x02, 8), (0x01, 8)];
            for (bit, host) in drums {
                if self.registers[0x0E] & bit != 0 && enabled(host) {
                    rhythm += YMFM_LEVEL;
                }
            }
        }
        [melody, rhythm]
    }
}

/// Registry with every fake core registered
pub fn fake_backends() -> Backends {
    Backends::new()
        .with_nuked_opll(|| Box::new(FakeOpll::new()))
        .with_nuked_opn2(|| Box::new(FakeOpn2::new()))
        .with_ymfm_opll(|| Box::new(FakeYmfm::new()))
}

/// Key on OPLL tone channel `ch` through the address/data ports
pub fn opll_key_on(ch: u8) -> [(u32, u8); 2] {
    [(0, 0x20 + ch), (1, 0x10)]
}

/// Enable rhythm mode with the given drum bits
pub fn opll_rhythm(drums: u8) -> [(u32, u8); 2] {
    [(0, 0x0E), (1, 0x20 | drums)]
}
