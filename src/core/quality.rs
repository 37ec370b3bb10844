//! Scan-line quality masking.
//!
//! For details on the line quality flags see the MSG Level 1.5 Image Data
//! Format Description, page 109.

use crate::types::{ChannelImage, LineFlags, SeviriError, SeviriResult};
use ndarray::{Array1, Zip};

/// Create the bad quality scan lines mask.
///
/// A line is bad when its validity flag marks it missing (2) or corrupted
/// (3) and not both quality flags report good (4). Lines where both the
/// radiometric and the geometric quality are good are kept regardless of
/// the validity flag.
pub fn bad_quality_line_mask(
    line_validity: &LineFlags,
    line_geometric_quality: &LineFlags,
    line_radiometric_quality: &LineFlags,
) -> Array1<bool> {
    Zip::from(line_validity)
        .and(line_geometric_quality)
        .and(line_radiometric_quality)
        .map_collect(|&validity, &geometric, &radiometric| {
            (validity == 2 || validity == 3) && (radiometric != 4 || geometric != 4)
        })
}

/// Mask scan lines with bad quality.
///
/// The per-line mask is broadcast over all columns; masked pixels become
/// NaN. Flag vectors must have one entry per image line.
pub fn mask_bad_quality(
    data: &ChannelImage,
    line_validity: &LineFlags,
    line_geometric_quality: &LineFlags,
    line_radiometric_quality: &LineFlags,
) -> SeviriResult<ChannelImage> {
    let nlines = data.nrows();
    for (name, flags) in [
        ("validity", line_validity),
        ("geometric quality", line_geometric_quality),
        ("radiometric quality", line_radiometric_quality),
    ] {
        if flags.len() != nlines {
            return Err(SeviriError::ShapeMismatch(format!(
                "line {} flags have {} entries but the image has {} lines",
                name,
                flags.len(),
                nlines
            )));
        }
    }

    let line_mask = bad_quality_line_mask(
        line_validity,
        line_geometric_quality,
        line_radiometric_quality,
    );
    let mut masked = data.clone();
    for (mut row, &bad) in masked.rows_mut().into_iter().zip(line_mask.iter()) {
        if bad {
            row.fill(f32::NAN);
        }
    }
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_missing_line_with_degraded_radiometry_is_masked() {
        let mask = bad_quality_line_mask(&array![2], &array![4], &array![3]);
        assert!(mask[0]);
    }

    #[test]
    fn test_valid_line_is_never_masked() {
        for geometric in 0..=4u8 {
            for radiometric in 0..=4u8 {
                let mask =
                    bad_quality_line_mask(&array![1], &array![geometric], &array![radiometric]);
                assert!(!mask[0]);
            }
        }
    }

    #[test]
    fn test_both_qualities_good_keeps_line() {
        for validity in [2u8, 3] {
            let mask = bad_quality_line_mask(&array![validity], &array![4], &array![4]);
            assert!(!mask[0]);
        }
    }

    #[test]
    fn test_corrupted_line_masked_unless_both_good() {
        let mask = bad_quality_line_mask(
            &array![3, 3, 3],
            &array![4, 3, 4],
            &array![3, 4, 4],
        );
        assert_eq!(mask, array![true, true, false]);
    }

    #[test]
    fn test_mask_broadcasts_over_columns() {
        let data = Array2::from_elem((3, 4), 1.0_f32);
        let masked = mask_bad_quality(
            &data,
            &array![1, 2, 1],
            &array![4, 4, 4],
            &array![4, 3, 4],
        )
        .unwrap();
        assert!(masked.row(0).iter().all(|v| *v == 1.0));
        assert!(masked.row(1).iter().all(|v| v.is_nan()));
        assert!(masked.row(2).iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_flag_length_mismatch_is_fatal() {
        let data = Array2::from_elem((3, 4), 1.0_f32);
        let err = mask_bad_quality(&data, &array![1, 2], &array![4, 4], &array![4, 3])
            .unwrap_err();
        assert!(matches!(err, SeviriError::ShapeMismatch(_)));
    }
}
