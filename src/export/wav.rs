//! WAV file export functionality

use super::clip_to_i16;
use crate::adapter::FmAdapter;
use crate::Result;
use std::path::Path;

/// Write a stereo block to a 16-bit WAV file
///
/// Samples are interleaved left/right and saturated to 16 bits.
///
/// # Arguments
///
/// * `output_path` - Path where the WAV file will be written
/// * `sample_rate` - Output rate in Hz (see [`ChipConfig::output_rate`](crate::ChipConfig::output_rate))
/// * `left` - Left channel samples
/// * `right` - Right channel samples
///
/// # Panics
///
/// Panics if `left` and `right` differ in length.
pub fn write_wav<P: AsRef<Path>>(
    output_path: P,
    sample_rate: u32,
    left: &[i32],
    right: &[i32],
) -> Result<()> {
    assert_eq!(
        left.len(),
        right.len(),
        "Left and right channels must have the same length"
    );

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(output_path.as_ref(), spec).map_err(|e| {
        crate::AdapterError::AudioFileError(format!("Failed to create WAV file: {e}"))
    })?;

    for (&l, &r) in left.iter().zip(right) {
        for sample in [l, r] {
            writer.write_sample(clip_to_i16(sample)).map_err(|e| {
                crate::AdapterError::AudioFileError(format!("Failed to write sample: {e}"))
            })?;
        }
    }

    writer.finalize().map_err(|e| {
        crate::AdapterError::AudioFileError(format!("Failed to finalize WAV file: {e}"))
    })?;

    Ok(())
}

/// Render `samples` samples from `chip` straight to a WAV file
///
/// # Examples
///
/// ```ignore
/// use fm_adapter::export::wav::render_to_wav;
///
/// render_to_wav(&mut chip, 49_715, 49_715 * 4, "opll.wav")?;
/// ```
pub fn render_to_wav<P: AsRef<Path>>(
    chip: &mut dyn FmAdapter,
    sample_rate: u32,
    samples: usize,
    output_path: P,
) -> Result<()> {
    let (left, right) = chip.render(samples);
    log::debug!(
        "Writing {samples} {} samples to {}",
        chip.family(),
        output_path.as_ref().display()
    );
    write_wav(output_path, sample_rate, &left, &right)
}
