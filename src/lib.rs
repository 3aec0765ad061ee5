//! # Rotational MIP library
//!
//! This crate derives 2D diagnostic views from a volumetric scan and builds
//! rotational intensity projections for cine-like display.
//!
//! A [`Volume`] holds the scan intensities indexed (axial, coronal,
//! sagittal) together with the voxel spacing. From it the crate produces
//!  - Mid-plane slices along any of the three medical axes
//!  - Maximum, average and minimum intensity projections
//!    ([`ProjectionReducer`])
//!  - Volumes rotated within one plane by nearest-neighbour resampling
//!    ([`PlaneRotationResampler`])
//!  - Projection series over a full turn that share one intensity window
//!    ([`RotationalProjectionSeries`])
//!
//! DICOM files are read with the dicom-rs ecosystem ([`VolumeLoader`]) and
//! results can be written as grayscale PNGs or an animated GIF with the
//! helpers in [`render`]. Rotation and projection run in parallel using
//! rayon.
//!
//! # Examples
//!
//! ## Rotational sagittal MIP of a CT scan
//!
//! ```no_run
//! # use dicom_rotational_mip::{Orientation, RotationalProjectionSeries, SeriesOptions, VolumeLoader, render};
//! let volume = VolumeLoader::load_from_file("scan.dcm", Some((3.27, 0.98, 0.98)))
//!     .expect("should have loaded the scan")
//!     .flipped(Orientation::Axial);
//! let series = RotationalProjectionSeries::build(&volume, &SeriesOptions::default())
//!     .expect("should have built five frames");
//! let frames = render::series_to_gray(&series, volume.aspect_ratio(Orientation::Sagittal))
//!     .expect("should have rendered frames");
//! render::save_cine_gif(&frames, "rotation.gif", 200).expect("should have written gif");
//! ```

pub mod enums;
pub mod projection;
pub mod render;
pub mod resampler;
pub mod series;
pub mod volume;
pub mod volume_loader;

pub use enums::{BoundsMask, Orientation, Reduction, SamplingGrid, SortBy};
pub use projection::ProjectionReducer;
pub use resampler::{PlaneRotationResampler, RotationOptions};
pub use series::{ProjectionSeries, RotationalProjectionSeries, SeriesError, SeriesOptions};
pub use volume::{Image2D, Volume, VolumeError};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
