use crate::enums::{Orientation, Reduction};
use crate::projection::ProjectionReducer;
use crate::resampler::{PlaneRotationResampler, RotationOptions};
use crate::volume::{Image2D, Volume};

use log::{debug, info};
use rayon::prelude::*;
use std::f64::consts::TAU;
use thiserror::Error;
use web_time::Instant;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("A projection series needs at least one angle")]
    NoAngles,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesOptions {
    pub angle_count: usize,
    /// Axis held fixed while each volume is rotated.
    pub rotation_axis: Orientation,
    /// Axis every rotated volume is reduced along.
    pub projection_axis: Orientation,
    pub reduction: Reduction,
    pub rotation: RotationOptions,
}

impl Default for SeriesOptions {
    /// Five sagittal MIPs of volumes rotated in the axial plane.
    fn default() -> Self {
        Self {
            angle_count: 5,
            rotation_axis: Orientation::Axial,
            projection_axis: Orientation::Sagittal,
            reduction: Reduction::Maximum,
            rotation: RotationOptions::default(),
        }
    }
}

/// Projections of one volume rotated through a full turn.
///
/// `min` and `max` come from the unrotated volume and are the intensity
/// scale every frame should be displayed with.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionSeries {
    pub frames: Vec<Image2D>,
    /// Angle of each frame, radians.
    pub angles: Vec<f64>,
    pub min: i16,
    pub max: i16,
}

impl ProjectionSeries {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn window(&self) -> (i16, i16) {
        (self.min, self.max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &Image2D)> {
        self.angles.iter().copied().zip(self.frames.iter())
    }
}

pub struct RotationalProjectionSeries;

impl RotationalProjectionSeries {
    /// `count` angles stepping by `2π / count` from 0; the full turn itself
    /// is excluded.
    pub fn angles(count: usize) -> Vec<f64> {
        let step = TAU / count as f64;
        (0..count).map(|i| i as f64 * step).collect()
    }

    /// Rotate `volume` to every angle of a full turn and project each result.
    ///
    /// Frames are computed in parallel but returned in angle order. Each
    /// rotated volume is dropped as soon as it has been projected.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NoAngles`] if `options.angle_count` is zero.
    pub fn build(volume: &Volume, options: &SeriesOptions) -> Result<ProjectionSeries, SeriesError> {
        if options.angle_count == 0 {
            return Err(SeriesError::NoAngles);
        }

        let t0 = Instant::now();
        let (min, max) = volume.intensity_range();
        let angles = Self::angles(options.angle_count);

        let frames: Vec<Image2D> = angles
            .par_iter()
            .enumerate()
            .map(|(index, &angle)| {
                let rotated = PlaneRotationResampler::rotate_in_plane(
                    volume,
                    angle,
                    options.rotation_axis,
                    &options.rotation,
                );
                let frame =
                    ProjectionReducer::project(&rotated, options.projection_axis, options.reduction);
                debug!("frame {index} at {angle:.4} rad done");
                frame
            })
            .collect();

        info!(
            "{} {:?} frames of {:?} volume in {:?}",
            frames.len(),
            options.reduction,
            volume.dim(),
            t0.elapsed()
        );

        Ok(ProjectionSeries {
            frames,
            angles,
            min,
            max,
        })
    }
}
