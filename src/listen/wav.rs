//! PCM sample handling for the recognizer
//!
//! The recorder emits raw signed 16-bit little-endian mono samples; the
//! recognizer wants a RIFF/WAVE file.

pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNELS: u16 = 1;
const BYTES_PER_SAMPLE: u16 = 2;

/// Scale every sample by `gain`, clipping to the i16 range.
pub fn amplify(pcm: &[u8], gain: i32) -> Vec<u8> {
    pcm.chunks_exact(2)
        .flat_map(|s| {
            let sample = i16::from_le_bytes([s[0], s[1]]) as i32;
            let scaled = sample
                .saturating_mul(gain)
                .clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            scaled.to_le_bytes()
        })
        .collect()
}

/// Prefix `pcm` with a 44-byte canonical WAV header.
pub fn encode_wav(pcm: &[u8]) -> Vec<u8> {
    let data_len = pcm.len() as u32;
    let block_align = CHANNELS * BYTES_PER_SAMPLE;
    let byte_rate = SAMPLE_RATE * block_align as u32;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&(BYTES_PER_SAMPLE * 8).to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(v: &[i16]) -> Vec<u8> {
        v.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_amplify_clips() {
        let out = amplify(&samples(&[100, -100, 20_000, -20_000]), 2);
        assert_eq!(out, samples(&[200, -200, i16::MAX, i16::MIN]));
    }

    #[test]
    fn test_amplify_drops_odd_byte() {
        assert_eq!(amplify(&[1, 0, 7], 1), vec![1, 0]);
    }

    #[test]
    fn test_header_layout() {
        let pcm = samples(&[1, 2, 3]);
        let wav = encode_wav(&pcm);
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 6);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 44_100);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 88_200);
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 6);
        assert_eq!(&wav[44..], &pcm[..]);
    }
}
