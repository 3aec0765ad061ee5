use crate::enums::{Orientation, Reduction};
use crate::volume::{Image2D, Volume};

use ndarray::{ArrayView1, Axis, Zip};

/// Collapses a volume along one axis into a 2D image.
pub struct ProjectionReducer;

impl ProjectionReducer {
    /// Reduce every lane along `along` with `reduction`.
    ///
    /// The image keeps the two remaining axes in increasing order, so a
    /// coronal projection of an `(n0, n1, n2)` volume is `n0 x n2`.
    /// Averages are rounded half to even; use [`Self::project_mean`] to keep
    /// the fractional part.
    pub fn project(volume: &Volume, along: Orientation, reduction: Reduction) -> Image2D {
        let lanes = volume.data().lanes(Axis(along.axis()));
        let reduced = Zip::from(lanes).par_map_collect(|lane| match reduction {
            Reduction::Maximum => lane.fold(i16::MIN, |acc, &v| acc.max(v)),
            Reduction::Minimum => lane.fold(i16::MAX, |acc, &v| acc.min(v)),
            Reduction::Average => Self::mean(&lane).round_ties_even() as i16,
        });
        Image2D::new(reduced)
    }

    /// Average intensity projection without rounding back to `i16`.
    pub fn project_mean(volume: &Volume, along: Orientation) -> Image2D<f64> {
        let lanes = volume.data().lanes(Axis(along.axis()));
        Image2D::new(Zip::from(lanes).par_map_collect(|lane| Self::mean(&lane)))
    }

    #[inline]
    fn mean(lane: &ArrayView1<'_, i16>) -> f64 {
        // i64 holds the sum of any realistic lane of i16 exactly
        let sum: i64 = lane.iter().map(|&v| i64::from(v)).sum();
        sum as f64 / lane.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, array};

    fn cube() -> Volume {
        let data = array![[[1i16, -2], [4, 7]], [[10, 3], [-6, 0]]];
        Volume::new(data, (1.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn test_coronal_maximum() {
        let image = ProjectionReducer::project(&cube(), Orientation::Coronal, Reduction::Maximum);
        assert_eq!(image.data(), &array![[4i16, 7], [10, 3]]);
    }

    #[test]
    fn test_coronal_average() {
        let mean = ProjectionReducer::project_mean(&cube(), Orientation::Coronal);
        assert_eq!(mean.data(), &array![[2.5, 2.5], [2.0, 1.5]]);

        let rounded = ProjectionReducer::project(&cube(), Orientation::Coronal, Reduction::Average);
        assert_eq!(rounded.data(), &array![[2i16, 2], [2, 2]]);
    }

    #[test]
    fn test_coronal_minimum() {
        let image = ProjectionReducer::project(&cube(), Orientation::Coronal, Reduction::Minimum);
        assert_eq!(image.data(), &array![[1i16, -2], [-6, 0]]);
    }

    #[test]
    fn test_axial_and_sagittal_keep_remaining_axes() {
        let volume = Volume::new(Array3::from_shape_fn((2, 3, 4), |(i, j, k)| (i + j + k) as i16), (1.0, 1.0, 1.0))
            .unwrap();

        let axial = ProjectionReducer::project(&volume, Orientation::Axial, Reduction::Maximum);
        assert_eq!(axial.dim(), (3, 4));
        assert_eq!(axial.get(2, 3), Some(6));

        let sagittal = ProjectionReducer::project(&volume, Orientation::Sagittal, Reduction::Maximum);
        assert_eq!(sagittal.dim(), (2, 3));
        assert_eq!(sagittal.get(1, 0), Some(4));

        let sagittal_mean = ProjectionReducer::project_mean(&volume, Orientation::Sagittal);
        assert_eq!(sagittal_mean.get(0, 0), Some(1.5));
    }

    #[test]
    fn test_degenerate_axis_returns_the_slice() {
        let volume = Volume::new(Array3::from_shape_fn((1, 3, 3), |(_, j, k)| (j * 3 + k) as i16), (1.0, 1.0, 1.0))
            .unwrap();
        let expected = volume.mid_plane(Orientation::Axial);
        for reduction in [Reduction::Maximum, Reduction::Average, Reduction::Minimum] {
            assert_eq!(ProjectionReducer::project(&volume, Orientation::Axial, reduction), expected);
        }
    }

    #[test]
    fn test_average_does_not_overflow() {
        let volume = Volume::new(Array3::from_elem((4, 1, 1), i16::MAX), (1.0, 1.0, 1.0)).unwrap();
        let image = ProjectionReducer::project(&volume, Orientation::Axial, Reduction::Average);
        assert_eq!(image.get(0, 0), Some(i16::MAX));
    }
}
