//! WAV file format utilities.
//!
//! Generates standard 44-byte RIFF WAV headers for the PCM the engine
//! emits in audio events.

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Output rate of decoded HD Radio audio.
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Decoded audio is always interleaved stereo.
pub const AUDIO_CHANNELS: u16 = 2;

pub const AUDIO_BIT_DEPTH: u16 = 16;

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (36 + data_size)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(sample_rate: u32, bit_depth: u16, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * channels as u32 * bit_depth as u32 / 8;
    let block_align = channels * bit_depth / 8;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Header for decoded HD Radio audio with the given payload size.
pub fn hd_audio_header(data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    generate_wav_header(AUDIO_SAMPLE_RATE, AUDIO_BIT_DEPTH, AUDIO_CHANNELS, data_size)
}

/// Convert native-endian 16-bit PCM bytes to the little-endian order WAV requires.
pub fn pcm_to_le(native: &[u8]) -> Vec<u8> {
    if cfg!(target_endian = "little") {
        return native.to_vec();
    }
    native
        .chunks_exact(2)
        .flat_map(|pair| i16::from_ne_bytes([pair[0], pair[1]]).to_le_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_is_44_bytes() {
        let header = hd_audio_header(0);
        assert_eq!(header.len(), 44);
    }

    #[test]
    fn header_riff_magic() {
        let header = hd_audio_header(0);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_44khz_stereo_16bit() {
        let header = hd_audio_header(17640);

        let channels = u16::from_le_bytes([header[22], header[23]]);
        assert_eq!(channels, 2);

        let sample_rate = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);
        assert_eq!(sample_rate, 44100);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 176400); // 44100 * 2 * 16/8

        let block_align = u16::from_le_bytes([header[32], header[33]]);
        assert_eq!(block_align, 4);

        let data_size = u32::from_le_bytes([header[40], header[41], header[42], header[43]]);
        assert_eq!(data_size, 17640);

        let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(chunk_size, 36 + 17640);
    }

    #[test]
    fn pcm_to_le_keeps_sample_values() {
        let native: Vec<u8> = [1i16, -2, 0x1234].iter().flat_map(|s| s.to_ne_bytes()).collect();
        let le = pcm_to_le(&native);
        let back: Vec<i16> = le
            .chunks_exact(2)
            .map(|p| i16::from_le_bytes([p[0], p[1]]))
            .collect();
        assert_eq!(back, vec![1, -2, 0x1234]);
    }
}
