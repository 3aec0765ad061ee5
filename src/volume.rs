use crate::enums::Orientation;

use ndarray::Array2;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray::s;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VolumeError {
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("Index {index} out of bounds for {orientation:?} axis of length {len}")]
    IndexOutOfBounds {
        index: usize,
        orientation: Orientation,
        len: usize,
    },
}

/// Dense scan intensities indexed `(axial, coronal, sagittal)` together
/// with the physical voxel spacing along each axis.
///
/// The shape is fixed at construction and no axis is empty. The data is
/// never mutated afterwards; transforms return new volumes.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    data: Array3<i16>,
    spacing: (f32, f32, f32),
}

impl Volume {
    /// Wrap an intensity array.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidVolume`] if any axis has length zero or
    /// the spacing is not finite and positive.
    pub fn new(data: Array3<i16>, spacing: (f32, f32, f32)) -> Result<Self, VolumeError> {
        let dim = data.dim();
        if dim.0 == 0 || dim.1 == 0 || dim.2 == 0 {
            return Err(VolumeError::InvalidVolume(format!(
                "empty axis in shape {dim:?}"
            )));
        }
        let (s0, s1, s2) = spacing;
        if [s0, s1, s2].iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(VolumeError::InvalidVolume(format!(
                "spacing must be finite and positive, got {spacing:?}"
            )));
        }
        Ok(Self { data, spacing })
    }

    /// Build a volume from a flat buffer in row-major `(axial, coronal, sagittal)` order.
    pub fn from_shape_vec(
        shape: (usize, usize, usize),
        samples: Vec<i16>,
        spacing: (f32, f32, f32),
    ) -> Result<Self, VolumeError> {
        let len = samples.len();
        let data = Array3::from_shape_vec(shape, samples).map_err(|_| {
            VolumeError::InvalidVolume(format!("{len} samples do not fill shape {shape:?}"))
        })?;
        Self::new(data, spacing)
    }

    /// Same spacing, new samples of the same shape.
    pub(crate) fn with_data(&self, data: Array3<i16>) -> Volume {
        debug_assert_eq!(data.dim(), self.data.dim());
        Volume {
            data,
            spacing: self.spacing,
        }
    }

    /// Get the dimensions of the volume (axial, coronal, sagittal)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<i16> {
        &self.data
    }

    pub fn spacing(&self) -> (f32, f32, f32) {
        self.spacing
    }

    #[inline]
    pub fn sample(&self, i0: usize, i1: usize, i2: usize) -> Option<i16> {
        self.data.get((i0, i1, i2)).copied()
    }

    /// Length of the axis selected by `orientation`.
    pub fn len_of(&self, orientation: Orientation) -> usize {
        self.data.len_of(Axis(orientation.axis()))
    }

    /// An axis of length one collapses rotations and projections along it
    /// to trivial results.
    pub fn is_degenerate(&self, orientation: Orientation) -> bool {
        self.len_of(orientation) == 1
    }

    /// Smallest and largest intensity in the volume.
    pub fn intensity_range(&self) -> (i16, i16) {
        self.data
            .iter()
            .fold((i16::MAX, i16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    pub fn get_slice_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
    ) -> Result<ArrayView2<'_, i16>, VolumeError> {
        let len = self.len_of(orientation);
        if index >= len {
            return Err(VolumeError::IndexOutOfBounds {
                index,
                orientation,
                len,
            });
        }
        let slice = match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
        };
        Ok(slice)
    }

    /// The slice through the middle of the volume along `orientation`.
    pub fn mid_plane(&self, orientation: Orientation) -> Image2D {
        let index = self.len_of(orientation) / 2;
        let slice = match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
        };
        Image2D::new(slice.to_owned())
    }

    /// A copy with the sample order reversed along `orientation`.
    pub fn flipped(&self, orientation: Orientation) -> Volume {
        let mut data = self.data.clone();
        data.invert_axis(Axis(orientation.axis()));
        Volume {
            data: data.as_standard_layout().into_owned(),
            spacing: self.spacing,
        }
    }

    /// Row-to-column spacing ratio of images sliced or projected along
    /// `orientation`.
    pub fn aspect_ratio(&self, orientation: Orientation) -> f32 {
        let spacing = [self.spacing.0, self.spacing.1, self.spacing.2];
        let (rows, cols) = orientation.plane_axes();
        spacing[rows] / spacing[cols]
    }
}

/// A 2D image produced by slicing or reducing a [`Volume`].
///
/// Rows and columns are the two retained source axes in increasing order.
#[derive(Clone, Debug, PartialEq)]
pub struct Image2D<T = i16> {
    data: Array2<T>,
}

impl<T: Copy + PartialOrd> Image2D<T> {
    pub fn new(data: Array2<T>) -> Self {
        Self { data }
    }

    /// (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<T> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.data.get((row, col)).copied()
    }

    /// Smallest and largest pixel, `None` for an empty image.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )
        }))
    }
}
