//! Nuked-OPLL adapter behaviour against a scripted core

mod common;

use common::{opll_key_on, opll_rhythm, FakeOpll, RHYTHM_LEVEL, TONE_LEVEL};
use fm_adapter::mute::OpllChannels;
use fm_adapter::{FmAdapter, NukedOpllAdapter, OpllVariant};

fn adapter() -> NukedOpllAdapter<FakeOpll> {
    NukedOpllAdapter::new(FakeOpll::new(), 0)
}

fn submit(chip: &mut NukedOpllAdapter<FakeOpll>, writes: &[(u32, u8)]) {
    for &(address, data) in writes {
        chip.write(address, data).unwrap();
    }
}

#[test]
fn test_new_resets_core_with_variant() {
    let chip = NukedOpllAdapter::new(FakeOpll::new(), 1);
    assert_eq!(chip.core().resets, 1);
    assert_eq!(chip.core().variant, Some(OpllVariant::Ds1001));
    assert_eq!(chip.variant(), OpllVariant::Ds1001);

    let chip = adapter();
    assert_eq!(chip.core().variant, Some(OpllVariant::Ym2413));
}

#[test]
fn test_silence_without_writes() {
    let mut chip = adapter();
    let (left, right) = chip.render(64);
    assert!(left.iter().all(|&s| s == 0));
    assert!(right.iter().all(|&s| s == 0));
}

#[test]
fn test_writes_are_queued_until_streamed() {
    let mut chip = adapter();
    submit(&mut chip, &[(1, 0x00), (1, 0x00)]);
    assert_eq!(chip.pending_writes(), 2);
    assert!(chip.core().writes.is_empty());

    chip.render(1);
    assert_eq!(chip.pending_writes(), 1);
    assert_eq!(chip.core().writes.len(), 1);
}

#[test]
fn test_write_latency_after_address_and_data() {
    let mut chip = adapter();
    submit(
        &mut chip,
        &[(0, 0x20), (1, 0x10), (0, 0x21), (1, 0x10), (1, 0x10)],
    );
    chip.render(20);

    // address write opens the bus after 12 clocks, data write after 84
    assert_eq!(chip.core().write_substeps(), vec![0, 12, 96, 108, 192]);
    assert_eq!(chip.pending_writes(), 0);
}

#[test]
fn test_writes_applied_in_submission_order() {
    let mut chip = adapter();
    let writes = [(0, 0x30), (1, 0x11), (0, 0x31), (1, 0x22)];
    submit(&mut chip, &writes);
    chip.render(20);

    let applied: Vec<(u32, u8)> = chip.core().writes.iter().map(|w| (w.port, w.data)).collect();
    assert_eq!(applied, writes);
}

#[test]
fn test_gate_counts_down_while_idle() {
    let mut chip = adapter();
    chip.write(1, 0x00).unwrap();
    chip.render(10);
    assert_eq!(chip.gate_remaining(), 0);

    // the earlier latency has elapsed, so the next write goes out at once
    chip.write(1, 0x00).unwrap();
    chip.render(1);
    assert_eq!(chip.core().write_substeps(), vec![0, 180]);
}

#[test]
fn test_gate_persists_across_calls() {
    let mut chip = adapter();
    submit(&mut chip, &[(1, 0x00), (1, 0x00)]);

    // 84-clock latency spans several one-sample calls
    for _ in 0..4 {
        chip.render(1);
    }
    assert_eq!(chip.core().write_substeps(), vec![0]);
    chip.render(1);
    assert_eq!(chip.core().write_substeps(), vec![0, 84]);
}

#[test]
fn test_rhythm_bass_drum() {
    let mut chip = adapter();
    submit(&mut chip, &opll_rhythm(0x10));
    let (left, right) = chip.render(100);

    // bass drum register is written at clock 12, after sample 0's bass drum slot
    assert_eq!(left[0], 0);
    let expected = RHYTHM_LEVEL * 2 * 8;
    assert_eq!(expected, 800);
    assert!(left[1..].iter().all(|&s| s == expected));
    assert_eq!(left, right);
}

#[test]
fn test_tone_gain() {
    let mut chip = adapter();
    submit(&mut chip, &opll_key_on(0));
    let (left, right) = chip.render(10);

    assert_eq!(left[0], 0);
    assert!(left[1..].iter().all(|&s| s == TONE_LEVEL * 8));
    assert_eq!(left, right);
}

#[test]
fn test_all_tone_channels_classified() {
    for ch in 0..9u8 {
        let mut chip = adapter();
        submit(&mut chip, &opll_key_on(ch));
        let (left, _) = chip.render(4);
        assert_eq!(left[3], TONE_LEVEL * 8, "tone {ch}");

        chip.set_mute_mask(OpllChannels::tone(ch as usize).bits());
        let (left, _) = chip.render(4);
        assert!(left.iter().all(|&s| s == 0), "tone {ch} muted");
    }
}

#[test]
fn test_mute_then_unmute_matches_reference() {
    let mut reference = adapter();
    submit(&mut reference, &opll_key_on(0));
    let (expected, _) = reference.render(30);

    let mut chip = adapter();
    submit(&mut chip, &opll_key_on(0));
    chip.set_mute_mask(OpllChannels::TONE_0.bits());
    let (muted, _) = chip.render(10);
    assert!(muted.iter().all(|&s| s == 0));

    chip.set_mute_mask(0);
    let (unmuted, _) = chip.render(20);
    assert_eq!(unmuted, expected[10..]);
}

#[test]
fn test_rhythm_mute_is_per_instrument() {
    let mut chip = adapter();
    submit(&mut chip, &opll_key_on(0));
    submit(&mut chip, &opll_rhythm(0x10 | 0x01)); // bass drum + hi-hat
    chip.render(20);

    let (left, _) = chip.render(1);
    assert_eq!(left[0], TONE_LEVEL * 8 + 2 * RHYTHM_LEVEL * 2 * 8);

    chip.set_mute_mask(OpllChannels::HI_HAT.bits());
    let (left, _) = chip.render(1);
    assert_eq!(left[0], TONE_LEVEL * 8 + RHYTHM_LEVEL * 2 * 8);

    chip.set_mute_mask((OpllChannels::HI_HAT | OpllChannels::BASS_DRUM).bits());
    let (left, _) = chip.render(1);
    assert_eq!(left[0], TONE_LEVEL * 8);
}

#[test]
fn test_shared_slot_separates_tone_and_drum() {
    // tone 6 and the bass drum share a cycle but are muted independently
    let mut chip = adapter();
    submit(&mut chip, &opll_key_on(6));
    chip.render(4);

    chip.set_mute_mask(OpllChannels::BASS_DRUM.bits());
    let (left, _) = chip.render(1);
    assert_eq!(left[0], TONE_LEVEL * 8);

    chip.set_mute_mask(OpllChannels::TONE_6.bits());
    let (left, _) = chip.render(1);
    assert_eq!(left[0], 0);
}

#[test]
fn test_upper_mask_bits_ignored() {
    let mut chip = adapter();
    submit(&mut chip, &opll_key_on(0));
    chip.set_mute_mask(0xFFFF_C000);
    assert_eq!(chip.mute_mask(), 0xFFFF_C000);

    let (left, _) = chip.render(4);
    assert_eq!(left[3], TONE_LEVEL * 8);
}

#[test]
fn test_reset_drains_queue_keeps_mute() {
    let mut chip = adapter();
    chip.set_mute_mask(OpllChannels::HI_HAT.bits());
    submit(&mut chip, &[(0, 0x20), (1, 0x10), (0, 0x0E)]);
    chip.render(1);
    assert_eq!(chip.pending_writes(), 1);

    chip.reset(0);
    assert_eq!(chip.pending_writes(), 0);
    assert_eq!(chip.gate_remaining(), 0);
    assert_eq!(chip.mute_mask(), OpllChannels::HI_HAT.bits());
    assert_eq!(chip.core().resets, 2);

    let applied = chip.core().writes.len();
    chip.render(10);
    assert_eq!(chip.core().writes.len(), applied);
}

#[test]
fn test_reset_and_replay_is_bit_identical() {
    let script = [(0, 0x0E), (1, 0x3F), (0, 0x20), (1, 0x10), (0, 0x24), (1, 0x10)];

    let mut chip = adapter();
    submit(&mut chip, &script);
    let first = chip.render(200);

    chip.reset(0);
    submit(&mut chip, &script);
    let second = chip.render(200);
    assert_eq!(first, second);

    let mut fresh = adapter();
    submit(&mut fresh, &script);
    assert_eq!(fresh.render(200), first);
}

#[test]
fn test_block_size_independent() {
    let script = [(0, 0x0E), (1, 0x30), (0, 0x22), (1, 0x10)];

    let mut whole = adapter();
    submit(&mut whole, &script);
    let (expected, _) = whole.render(60);

    let mut chunked = adapter();
    submit(&mut chunked, &script);
    let mut collected = Vec::new();
    for size in [1, 7, 0, 13, 39] {
        let (left, _) = chunked.render(size);
        collected.extend(left);
    }
    assert_eq!(collected, expected);
}

#[test]
fn test_zero_length_stream_is_noop() {
    let mut chip = adapter();
    chip.write(1, 0).unwrap();
    chip.stream_update(&mut [], &mut []);
    assert_eq!(chip.pending_writes(), 1);
    assert!(chip.core().writes.is_empty());
}

#[test]
#[should_panic(expected = "same length")]
fn test_mismatched_buffers_panic() {
    let mut chip = adapter();
    let mut left = [0; 4];
    let mut right = [0; 3];
    chip.stream_update(&mut left, &mut right);
}
