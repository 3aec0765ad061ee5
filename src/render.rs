//! Grayscale output of projections for viewing outside the crate.

use crate::series::ProjectionSeries;
use crate::volume::Image2D;

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, DynamicImage, Frame, GrayImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not build a {width}x{height} image")]
    Buffer { width: u32, height: u32 },

    #[error("Series has no frames")]
    NoFrames,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

#[inline]
fn normalize_to_u8(value: f64, lo: f64, hi: f64) -> u8 {
    if hi <= lo {
        return 0;
    }
    ((value - lo) / (hi - lo) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Map `image` linearly onto 0..=255, `window.0` to black and `window.1`
/// to white. Values outside the window saturate.
pub fn to_gray<T>(image: &Image2D<T>, window: (f64, f64)) -> Result<GrayImage, RenderError>
where
    T: Copy + PartialOrd + Into<f64>,
{
    let (height, width) = image.dim();
    let (lo, hi) = window;
    let pixel_data: Vec<u8> = image
        .data()
        .iter()
        .map(|&v| normalize_to_u8(v.into(), lo, hi))
        .collect();
    let (width, height) = (width as u32, height as u32);
    GrayImage::from_raw(width, height, pixel_data).ok_or(RenderError::Buffer { width, height })
}

/// The image's own range, for views without a shared window.
pub fn auto_window<T>(image: &Image2D<T>) -> (f64, f64)
where
    T: Copy + PartialOrd + Into<f64>,
{
    image
        .min_max()
        .map(|(lo, hi)| (lo.into(), hi.into()))
        .unwrap_or((0.0, 0.0))
}

/// Scale rows by `aspect` (row spacing over column spacing) so anatomy is
/// shown with its physical proportions.
pub fn stretch(image: &GrayImage, aspect: f32) -> GrayImage {
    let height = ((image.height() as f32 * aspect).round() as u32).max(1);
    imageops::resize(image, image.width(), height, FilterType::Nearest)
}

/// Every frame of `series` on the series' shared intensity window.
pub fn series_to_gray(series: &ProjectionSeries, aspect: f32) -> Result<Vec<GrayImage>, RenderError> {
    let (lo, hi) = series.window();
    series
        .frames
        .iter()
        .map(|frame| Ok(stretch(&to_gray(frame, (lo.into(), hi.into()))?, aspect)))
        .collect()
}

pub fn save_png(image: &GrayImage, path: impl AsRef<Path>) -> Result<(), RenderError> {
    image.save(path.as_ref())?;
    Ok(())
}

/// Write `frames` as an endlessly looping animated GIF.
pub fn save_cine_gif(
    frames: &[GrayImage],
    path: impl AsRef<Path>,
    delay_ms: u32,
) -> Result<(), RenderError> {
    if frames.is_empty() {
        return Err(RenderError::NoFrames);
    }
    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(frames.iter().map(|gray| {
        let rgba = DynamicImage::ImageLuma8(gray.clone()).into_rgba8();
        Frame::from_parts(rgba, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1))
    }))?;
    Ok(())
}
