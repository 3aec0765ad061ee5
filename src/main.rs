use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use dicom_rotational_mip::{
    BoundsMask, Orientation, ProjectionReducer, Reduction, RotationOptions,
    RotationalProjectionSeries, SamplingGrid, SeriesOptions, SortBy, Volume, VolumeLoader,
    render,
};
use log::info;

#[derive(Debug, clap::ValueEnum, Clone, Copy)]
enum ArgGrid {
    Unit,
    EndpointInclusive,
}

#[derive(Debug, clap::ValueEnum, Clone, Copy)]
enum ArgMask {
    Legacy,
    PerAxis,
}

#[derive(Debug, clap::ValueEnum, Clone, Copy)]
enum ArgReduction {
    Max,
    Mean,
    Min,
}

#[derive(Parser, Debug)]
struct Args {
    /// multi-frame DICOM file, or a directory of single-frame .dcm files
    input: PathBuf,
    /// directory the images are written to
    dest_path: PathBuf,
    #[arg(long, default_value_t = 5)]
    frames: usize,
    #[arg(long, default_value_t = -1000, allow_negative_numbers = true)]
    background: i16,
    /// slice distance, row and column spacing in mm
    #[arg(long, value_delimiter = ',')]
    spacing: Option<Vec<f32>>,
    /// keep the stored slice order instead of putting the last slice on top
    #[arg(long)]
    no_flip: bool,
    #[arg(long, value_enum, default_value = "unit")]
    grid: ArgGrid,
    #[arg(long, value_enum, default_value = "legacy")]
    mask: ArgMask,
    #[arg(long, value_enum, default_value = "max")]
    reduction: ArgReduction,
    /// time each cine frame is shown
    #[arg(long, default_value_t = 200)]
    delay_ms: u32,
}

fn load(args: &Args) -> Result<Volume, Box<dyn Error>> {
    let spacing = match args.spacing.as_deref() {
        Some(&[s0, s1, s2]) => Some((s0, s1, s2)),
        Some(other) => return Err(format!("expected three spacing values, got {other:?}").into()),
        None => None,
    };
    let volume = if args.input.is_dir() {
        VolumeLoader::load_from_directory(&args.input, SortBy::InstanceNumber, spacing)?
    } else {
        VolumeLoader::load_from_file(&args.input, spacing)?
    };
    Ok(if args.no_flip {
        volume
    } else {
        volume.flipped(Orientation::Axial)
    })
}

fn save_views(volume: &Volume, dest: &Path) -> Result<(), Box<dyn Error>> {
    let views = [("coronal", Orientation::Coronal), ("sagittal", Orientation::Sagittal)];
    for (name, orientation) in views {
        let aspect = volume.aspect_ratio(orientation);

        let mid = volume.mid_plane(orientation);
        let mid = render::to_gray(&mid, render::auto_window(&mid))?;
        render::save_png(&render::stretch(&mid, aspect), dest.join(format!("{name}_mid.png")))?;

        let mip = ProjectionReducer::project(volume, orientation, Reduction::Maximum);
        let mip = render::to_gray(&mip, render::auto_window(&mip))?;
        render::save_png(&render::stretch(&mip, aspect), dest.join(format!("{name}_mip.png")))?;

        let aip = ProjectionReducer::project_mean(volume, orientation);
        let aip = render::to_gray(&aip, render::auto_window(&aip))?;
        render::save_png(&render::stretch(&aip, aspect), dest.join(format!("{name}_aip.png")))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();
    fs::create_dir_all(&args.dest_path)?;

    let volume = load(&args)?;
    info!("volume {:?}, spacing {:?}", volume.dim(), volume.spacing());

    save_views(&volume, &args.dest_path)?;

    let options = SeriesOptions {
        angle_count: args.frames,
        reduction: match args.reduction {
            ArgReduction::Max => Reduction::Maximum,
            ArgReduction::Mean => Reduction::Average,
            ArgReduction::Min => Reduction::Minimum,
        },
        rotation: RotationOptions {
            background: args.background,
            grid: match args.grid {
                ArgGrid::Unit => SamplingGrid::Unit,
                ArgGrid::EndpointInclusive => SamplingGrid::EndpointInclusive,
            },
            mask: match args.mask {
                ArgMask::Legacy => BoundsMask::Legacy,
                ArgMask::PerAxis => BoundsMask::PerAxis,
            },
        },
        ..SeriesOptions::default()
    };
    let series = RotationalProjectionSeries::build(&volume, &options)?;
    let frames = render::series_to_gray(&series, volume.aspect_ratio(options.projection_axis))?;
    for (idx, frame) in frames.iter().enumerate() {
        render::save_png(frame, args.dest_path.join(format!("rotation_{idx:03}.png")))?;
    }
    render::save_cine_gif(&frames, args.dest_path.join("rotation.gif"), args.delay_ms)?;
    info!("wrote {} rotation frames to {:?}", frames.len(), args.dest_path);

    Ok(())
}
