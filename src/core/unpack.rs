//! Decoding of 10-bit packed image data.

use ndarray::Array1;

/// Decode 10 bits data into 16 bits words.
///
/// Every 5 input bytes pack 4 right-aligned 10-bit samples:
///
/// ```text
/// 0       1       2       3       4       5
/// 01234567890123456789012345678901234567890
/// 0         1         2         3         4
/// ```
///
/// Trailing bytes that do not form a complete 5-byte group are ignored.
pub fn dec10216(packed: &[u8]) -> Array1<u16> {
    let mut out = Vec::with_capacity(packed.len() * 4 / 5);
    for chunk in packed.chunks_exact(5) {
        let b0 = chunk[0] as u16;
        let b1 = chunk[1] as u16;
        let b2 = chunk[2] as u16;
        let b3 = chunk[3] as u16;
        let b4 = chunk[4] as u16;
        out.push((b0 << 2) | (b1 >> 6));
        out.push(((b1 & 0x3F) << 4) | (b2 >> 4));
        out.push(((b2 & 0x0F) << 6) | (b3 >> 2));
        out.push(((b3 & 0x03) << 8) | b4);
    }
    Array1::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Pack 4 10-bit samples into 5 bytes, inverse of the decoder.
    fn pack(samples: [u16; 4]) -> [u8; 5] {
        let [s0, s1, s2, s3] = samples;
        [
            (s0 >> 2) as u8,
            (((s0 & 0x03) << 6) | (s1 >> 4)) as u8,
            (((s1 & 0x0F) << 4) | (s2 >> 6)) as u8,
            (((s2 & 0x3F) << 2) | (s3 >> 8)) as u8,
            (s3 & 0xFF) as u8,
        ]
    }

    #[test]
    fn test_round_trip_all_zero() {
        assert_eq!(dec10216(&pack([0, 0, 0, 0])), array![0, 0, 0, 0]);
    }

    #[test]
    fn test_round_trip_all_max() {
        assert_eq!(
            dec10216(&pack([1023, 1023, 1023, 1023])),
            array![1023, 1023, 1023, 1023]
        );
    }

    #[test]
    fn test_round_trip_mixed_values() {
        let samples = [1, 255, 512, 1000];
        assert_eq!(dec10216(&pack(samples)), Array1::from(samples.to_vec()));
    }

    #[test]
    fn test_input_truncated_to_multiple_of_five() {
        let mut bytes = pack([5, 6, 7, 8]).to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(dec10216(&bytes), array![5, 6, 7, 8]);
    }

    #[test]
    fn test_known_bit_pattern() {
        // 0xFF 0xC0 0x00 ... : first sample takes 8 + 2 high bits.
        assert_eq!(
            dec10216(&[0xFF, 0xC0, 0x00, 0x00, 0x00]),
            array![1023, 0, 0, 0]
        );
    }
}
