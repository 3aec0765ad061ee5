use crate::enums::{BoundsMask, Orientation, SamplingGrid};
use crate::volume::Volume;

use log::debug;
use ndarray::{Array2, Array3, Axis, Zip};

/// Padding and grid policy for [`PlaneRotationResampler::rotate_in_plane`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationOptions {
    /// Written wherever the rotated source coordinate is masked out.
    pub background: i16,
    pub grid: SamplingGrid,
    pub mask: BoundsMask,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            // air, in Hounsfield units
            background: -1000,
            grid: SamplingGrid::Unit,
            mask: BoundsMask::Legacy,
        }
    }
}

/// Nearest-neighbour rotation of every slice of a volume within one plane.
pub struct PlaneRotationResampler;

impl PlaneRotationResampler {
    /// Rotate each slice orthogonal to `fixed` by `angle` radians.
    ///
    /// For a destination `(a, b)` in the rotation plane of extent `(n1, n2)`
    /// the grid coordinates are `p` (taken from `b`) and `q` (taken from `a`),
    /// and the source is
    ///
    /// ```text
    /// src_p = sin(angle) * (p - n1/2) + cos(angle) * (q - n2/2) + n1/2
    /// src_q = cos(angle) * (p - n1/2) - sin(angle) * (q - n2/2) + n2/2
    /// ```
    ///
    /// both rounded half to even. Lookups are clamped into the plane, so the
    /// gather never leaves the volume; `options.mask` decides which
    /// destinations are then overwritten with `options.background`.
    ///
    /// The input is left untouched and the result has the same shape.
    pub fn rotate_in_plane(
        volume: &Volume,
        angle: f64,
        fixed: Orientation,
        options: &RotationOptions,
    ) -> Volume {
        let fixed_axis = Axis(fixed.axis());
        let (first, second) = fixed.plane_axes();
        let data = volume.data();
        let n1 = data.len_of(Axis(first));
        let n2 = data.len_of(Axis(second));
        debug!("rotating {n1}x{n2} plane orthogonal to {fixed:?} by {angle} rad");

        let source = Self::source_map(n1, n2, angle, options);

        let mut rotated = Array3::<i16>::zeros(data.raw_dim());
        Zip::from(rotated.axis_iter_mut(fixed_axis))
            .and(data.axis_iter(fixed_axis))
            .par_for_each(|mut dst, src| {
                Zip::from(&mut dst).and(&source).for_each(|out, from| {
                    *out = match *from {
                        Some((p, q)) => src[[p, q]],
                        None => options.background,
                    };
                });
            });

        volume.with_data(rotated)
    }

    /// Source plane index for every destination of an `n1 x n2` plane, or
    /// `None` where the destination is padded.
    ///
    /// The map depends only on the plane extent, so it is shared by every
    /// slice of the volume.
    pub(crate) fn source_map(
        n1: usize,
        n2: usize,
        angle: f64,
        options: &RotationOptions,
    ) -> Array2<Option<(usize, usize)>> {
        let (sin, cos) = angle.sin_cos();
        let half1 = n1 as f64 / 2.0;
        let half2 = n2 as f64 / 2.0;
        let max1 = (n1 - 1) as f64;
        let max2 = (n2 - 1) as f64;

        Array2::from_shape_fn((n1, n2), |(a, b)| {
            let p = Self::grid_coordinate(b, n2, options.grid) - half1;
            let q = Self::grid_coordinate(a, n1, options.grid) - half2;

            let src_p = (sin * p + cos * q + half1).round_ties_even();
            let src_q = (cos * p - sin * q + half2).round_ties_even();

            let outside_p = src_p < 0.0 || src_p >= n1 as f64;
            let src_p = src_p.clamp(0.0, max1);
            let outside_q = match options.mask {
                BoundsMask::Legacy => src_p < 0.0 || src_p >= n2 as f64,
                BoundsMask::PerAxis => src_q < 0.0 || src_q >= n2 as f64,
            };
            let src_q = src_q.clamp(0.0, max2);

            if outside_p || outside_q {
                None
            } else {
                Some((src_p as usize, src_q as usize))
            }
        })
    }

    #[inline]
    fn grid_coordinate(index: usize, len: usize, grid: SamplingGrid) -> f64 {
        match grid {
            SamplingGrid::Unit => index as f64,
            SamplingGrid::EndpointInclusive if len == 1 => 0.0,
            SamplingGrid::EndpointInclusive if index == len - 1 => len as f64,
            SamplingGrid::EndpointInclusive => index as f64 * (len as f64 / (len - 1) as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const BACKGROUND: i16 = -1000;

    fn options(mask: BoundsMask) -> RotationOptions {
        RotationOptions {
            background: BACKGROUND,
            grid: SamplingGrid::Unit,
            mask,
        }
    }

    // Every voxel holds a distinct value: 100 * i0 + 10 * i1 + i2.
    fn labelled(shape: (usize, usize, usize)) -> Volume {
        let data = Array3::from_shape_fn(shape, |(i0, i1, i2)| (100 * i0 + 10 * i1 + i2) as i16);
        Volume::new(data, (3.27, 0.98, 0.98)).unwrap()
    }

    fn label(i1: usize, i2: usize) -> i16 {
        (10 * i1 + i2) as i16
    }

    #[test]
    fn test_zero_angle_is_identity_on_square_planes() {
        for shape in [(3, 4, 4), (2, 5, 5)] {
            let volume = labelled(shape);
            for mask in [BoundsMask::Legacy, BoundsMask::PerAxis] {
                let rotated =
                    PlaneRotationResampler::rotate_in_plane(&volume, 0.0, Orientation::Axial, &options(mask));
                assert_eq!(rotated, volume);
            }
        }
    }

    #[test]
    fn test_zero_angle_is_identity_for_other_fixed_axes() {
        let volume = labelled((4, 4, 3));
        let rotated = PlaneRotationResampler::rotate_in_plane(
            &volume,
            0.0,
            Orientation::Sagittal,
            &RotationOptions::default(),
        );
        assert_eq!(rotated, volume);

        let volume = labelled((5, 2, 5));
        let rotated = PlaneRotationResampler::rotate_in_plane(
            &volume,
            0.0,
            Orientation::Coronal,
            &RotationOptions::default(),
        );
        assert_eq!(rotated, volume);
    }

    #[test]
    fn test_shape_is_preserved() {
        let volume = labelled((3, 4, 6));
        for fixed in [Orientation::Axial, Orientation::Coronal, Orientation::Sagittal] {
            for angle in [0.3, 1.0, -2.5, 7.0] {
                let rotated = PlaneRotationResampler::rotate_in_plane(
                    &volume,
                    angle,
                    fixed,
                    &RotationOptions::default(),
                );
                assert_eq!(rotated.dim(), volume.dim());
                assert_eq!(rotated.spacing(), volume.spacing());
            }
        }
    }

    #[test]
    fn test_half_turn_mirrors_and_pads_first_row() {
        // dest (a, b) <- src (4 - a, 4 - b); a == 0 leaves the plane along p.
        let volume = labelled((2, 4, 4));
        let rotated =
            PlaneRotationResampler::rotate_in_plane(&volume, PI, Orientation::Axial, &options(BoundsMask::Legacy));
        for i0 in 0..2 {
            for b in 0..4 {
                assert_eq!(rotated.sample(i0, 0, b), Some(BACKGROUND));
            }
            for a in 1..4 {
                for b in 0..4 {
                    let src_b = (4 - b).min(3);
                    let expected = 100 * i0 as i16 + label(4 - a, src_b);
                    assert_eq!(rotated.sample(i0, a, b), Some(expected), "at ({i0}, {a}, {b})");
                }
            }
        }
    }

    #[test]
    fn test_half_turn_per_axis_pads_first_column_too() {
        let volume = labelled((1, 4, 4));
        let rotated =
            PlaneRotationResampler::rotate_in_plane(&volume, PI, Orientation::Axial, &options(BoundsMask::PerAxis));
        for a in 0..4 {
            assert_eq!(rotated.sample(0, a, 0), Some(BACKGROUND));
            assert_eq!(rotated.sample(0, 0, a), Some(BACKGROUND));
        }
        assert_eq!(rotated.sample(0, 1, 1), Some(label(3, 3)));
        assert_eq!(rotated.sample(0, 3, 2), Some(label(1, 2)));
    }

    #[test]
    fn test_quarter_turn_legacy_mask_misses_second_axis_overflow() {
        // dest (a, b) <- src (b, 4 - a); only q leaves the plane, at a == 0.
        let volume = labelled((1, 4, 4));
        let legacy =
            PlaneRotationResampler::rotate_in_plane(&volume, FRAC_PI_2, Orientation::Axial, &options(BoundsMask::Legacy));
        let per_axis = PlaneRotationResampler::rotate_in_plane(
            &volume,
            FRAC_PI_2,
            Orientation::Axial,
            &options(BoundsMask::PerAxis),
        );
        for b in 0..4 {
            // clamped gather from the last column instead of padding
            assert_eq!(legacy.sample(0, 0, b), Some(label(b, 3)));
            assert_eq!(per_axis.sample(0, 0, b), Some(BACKGROUND));
        }
        for a in 1..4 {
            for b in 0..4 {
                assert_eq!(legacy.sample(0, a, b), Some(label(b, 4 - a)));
                assert_eq!(per_axis.sample(0, a, b), Some(label(b, 4 - a)));
            }
        }
    }

    #[test]
    fn test_three_quarter_turn_pads_first_column() {
        // dest (a, b) <- src (4 - b, a); p leaves the plane at b == 0.
        let volume = labelled((1, 4, 4));
        let rotated = PlaneRotationResampler::rotate_in_plane(
            &volume,
            3.0 * FRAC_PI_2,
            Orientation::Axial,
            &options(BoundsMask::Legacy),
        );
        for a in 0..4 {
            assert_eq!(rotated.sample(0, a, 0), Some(BACKGROUND));
            for b in 1..4 {
                assert_eq!(rotated.sample(0, a, b), Some(label(4 - b, a)));
            }
        }
    }

    #[test]
    fn test_full_turn_wraps() {
        let volume = labelled((2, 4, 4));
        let once = PlaneRotationResampler::rotate_in_plane(&volume, PI, Orientation::Axial, &RotationOptions::default());
        let wrapped =
            PlaneRotationResampler::rotate_in_plane(&volume, 3.0 * PI, Orientation::Axial, &RotationOptions::default());
        assert_eq!(once, wrapped);
    }

    #[test]
    fn test_legacy_mask_pads_when_first_axis_exceeds_second() {
        // 6x2 plane at angle zero: the clamped p runs 2..=5, always >= 2.
        let volume = labelled((1, 6, 2));
        let rotated =
            PlaneRotationResampler::rotate_in_plane(&volume, 0.0, Orientation::Axial, &options(BoundsMask::Legacy));
        assert!(rotated.data().iter().all(|&v| v == BACKGROUND));
    }

    #[test]
    fn test_endpoint_inclusive_grid_stretches_coordinates() {
        // grid 0, 4/3, 8/3, 4 rounds to 0, 1, 3, 4
        let volume = labelled((1, 4, 4));
        let rotated = PlaneRotationResampler::rotate_in_plane(
            &volume,
            0.0,
            Orientation::Axial,
            &RotationOptions {
                background: BACKGROUND,
                grid: SamplingGrid::EndpointInclusive,
                mask: BoundsMask::Legacy,
            },
        );
        let rows = [0, 1, 3];
        let cols = [0, 1, 3, 3];
        for (a, &src_a) in rows.iter().enumerate() {
            for (b, &src_b) in cols.iter().enumerate() {
                assert_eq!(rotated.sample(0, a, b), Some(label(src_a, src_b)));
            }
        }
        for b in 0..4 {
            assert_eq!(rotated.sample(0, 3, b), Some(BACKGROUND));
        }
    }

    #[test]
    fn test_degenerate_plane_never_leaves_the_volume() {
        let volume = labelled((3, 1, 1));
        let unrotated =
            PlaneRotationResampler::rotate_in_plane(&volume, 0.0, Orientation::Axial, &RotationOptions::default());
        assert_eq!(unrotated, volume);
        for step in 0..16 {
            let angle = step as f64 * PI / 8.0;
            let rotated =
                PlaneRotationResampler::rotate_in_plane(&volume, angle, Orientation::Axial, &RotationOptions::default());
            assert_eq!(rotated.dim(), (3, 1, 1));
            for i0 in 0..3 {
                let value = rotated.sample(i0, 0, 0).unwrap();
                assert!(value == BACKGROUND || value == 100 * i0 as i16);
            }
        }
    }

    #[test]
    fn test_input_untouched_and_deterministic() {
        let volume = labelled((3, 5, 5));
        let before = volume.clone();
        let first = PlaneRotationResampler::rotate_in_plane(&volume, 0.7, Orientation::Axial, &RotationOptions::default());
        let second = PlaneRotationResampler::rotate_in_plane(&volume, 0.7, Orientation::Axial, &RotationOptions::default());
        assert_eq!(volume, before);
        assert_eq!(first, second);
    }
}
