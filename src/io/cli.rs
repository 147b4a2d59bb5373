//! Command-line interface for splitting images into tiles and stitching them back

use crate::dataset::{DatasetMode, DatasetSource, collect_all, open_dataset};
use crate::distribution::fanout::{Identity, process_parallel_with};
use crate::io::configuration::{
    DEFAULT_OVERLAP_SIZE, DEFAULT_TILE_SIZE, DEFAULT_WORKERS, STITCHED_SUFFIX, TILE_EXTENSION,
};
use crate::io::error::Result;
use crate::io::image::{load_rgb, save_image, save_tile};
use crate::io::progress::ProgressManager;
use crate::math::fidelity::{mean_squared_error, peak_signal_to_noise};
use crate::spatial::grid::GridShape;
use crate::spatial::preprocess::{SizeWarning, make_multiple_of, scale_width};
use crate::spatial::size::output_size;
use crate::spatial::stitch::Stitcher;
use crate::spatial::tiles::{Tile, TileGrid, resize_exact};
use clap::{Args, Parser, Subcommand};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tilestitch")]
#[command(
    author,
    version,
    about = "Split large images into overlapping tiles and stitch processed tiles back together"
)]
/// Command-line arguments for the tiling tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Split an image into overlapping tile files
    Split(SplitArgs),
    /// Stitch tiles back into one image
    Stitch(StitchArgs),
}

/// Tile geometry shared by both operations
#[derive(Args, Debug, Clone, Copy)]
pub struct TilingArgs {
    /// Edge length of a tile's nominal area in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub tile_size: u32,

    /// Halo width around each tile in pixels
    #[arg(long, default_value_t = DEFAULT_OVERLAP_SIZE)]
    pub overlap: u32,
}

/// Arguments of `split`
#[derive(Args)]
pub struct SplitArgs {
    /// Source image
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Directory for tile files (defaults to `<stem>_tiles` next to the image)
    #[arg(short = 'd', long)]
    pub out_dir: Option<PathBuf>,

    /// Tile geometry
    #[command(flatten)]
    pub tiling: TilingArgs,

    /// Rescale the source to this width first, keeping its aspect ratio
    #[arg(long)]
    pub load_width: Option<u32>,

    /// Resize every block to a multiple of this before writing it
    #[arg(long)]
    pub model_base: Option<u32>,
}

/// Arguments of `stitch`
#[derive(Args)]
pub struct StitchArgs {
    /// Tile directory (folder mode) or source image (grid mode)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where the tiles come from
    #[arg(short, long, value_enum, default_value_t = DatasetMode::Folder)]
    pub mode: DatasetMode,

    /// Output image (defaults to `<stem>_stitched.png` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tile geometry
    #[command(flatten)]
    pub tiling: TilingArgs,

    /// Declared number of grid rows instead of inferring it
    #[arg(long, requires = "cols")]
    pub rows: Option<u32>,

    /// Declared number of grid columns instead of inferring it
    #[arg(long, requires = "rows")]
    pub cols: Option<u32>,

    /// Parallel workers used to process tiles in grid mode
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
}

impl StitchArgs {
    /// Grid declared on the command line, if any
    pub const fn declared_shape(&self) -> Option<GridShape> {
        match (self.rows, self.cols) {
            (Some(rows), Some(cols)) => Some(GridShape::new(rows, cols)),
            _ => None,
        }
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for the chosen verbosity
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Install the global logger; `RUST_LOG` overrides the verbosity flags
    pub fn init_logging(&self) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(self.log_level()));
        builder.format_timestamp_secs();
        // A logger installed earlier (e.g. by a test harness) stays in place
        let _ = builder.try_init();
    }
}

/// Executes the parsed command with progress tracking
pub struct Runner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl Runner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if loading, tiling, stitching or saving fails
    pub fn run(&mut self) -> Result<()> {
        let result = match &self.cli.command {
            Command::Split(args) => Self::split(args, self.progress_manager.as_mut()),
            Command::Stitch(args) => Self::stitch(args, self.progress_manager.as_mut()),
        };

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        result
    }

    fn split(args: &SplitArgs, mut progress: Option<&mut ProgressManager>) -> Result<()> {
        let start_time = Instant::now();
        let TilingArgs { tile_size, overlap } = args.tiling;

        let mut source = load_rgb(&args.image)?;
        if let Some(width) = args.load_width {
            source = scale_width(&source, width, tile_size)?;
        }

        let grid = TileGrid::new(&source, tile_size, overlap)?;
        let out_dir = args
            .out_dir
            .clone()
            .unwrap_or_else(|| default_tile_dir(&args.image));
        let stem = file_stem(&args.image);
        let warning = SizeWarning::new();

        if let Some(pm) = progress.as_deref_mut() {
            pm.start_stage("split", grid.len());
        }

        for tile in &grid {
            let tile = match args.model_base {
                Some(base) => tile.try_map_block(|block| make_multiple_of(&block, base, &warning))?,
                None => tile,
            };
            save_tile(&tile, &out_dir, &stem, TILE_EXTENSION)?;

            if let Some(pm) = progress.as_deref() {
                pm.tick(0);
            }
        }

        log::info!(
            "wrote {} tiles ({} rows x {} cols) to {} in {:.2?}",
            grid.len(),
            grid.rows(),
            grid.cols(),
            out_dir.display(),
            start_time.elapsed()
        );
        Ok(())
    }

    fn stitch(args: &StitchArgs, mut progress: Option<&mut ProgressManager>) -> Result<()> {
        let start_time = Instant::now();
        let TilingArgs { tile_size, overlap } = args.tiling;

        let (tiles, reference) = match args.mode {
            DatasetMode::Folder => {
                let source = DatasetSource::Folder {
                    dir: args.input.clone(),
                };
                (collect_all(&*open_dataset(&source)?)?, None)
            }
            DatasetMode::Grid => {
                let image = load_rgb(&args.input)?;
                let reference = normalized_reference(&image, tile_size)?;
                let source = DatasetSource::Grid {
                    image,
                    tile_size,
                    overlap,
                };
                let tiles = collect_all(&*open_dataset(&source)?)?;
                let tiles = Self::fan_out(tiles, args.workers, progress.as_deref_mut())?;
                (tiles, Some(reference))
            }
        };

        let mut stitcher = Stitcher::new(tile_size, overlap)?;
        if let Some(shape) = args.declared_shape() {
            stitcher = stitcher.with_shape(shape);
        }
        let stitched = stitcher.stitch(&tiles)?;

        if let Some(reference) = reference {
            report_fidelity(&stitched, &reference)?;
        }

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| stitched_output_path(&args.input));
        save_image(&stitched, &output)?;

        log::info!(
            "stitched {} tiles into {}x{} image {} in {:.2?}",
            tiles.len(),
            stitched.width(),
            stitched.height(),
            output.display(),
            start_time.elapsed()
        );
        Ok(())
    }

    fn fan_out(
        tiles: Vec<Tile>,
        workers: usize,
        progress: Option<&mut ProgressManager>,
    ) -> Result<Vec<Tile>> {
        match progress {
            Some(pm) => {
                pm.start_workers(tiles.len(), workers);
                let pm = &*pm;
                process_parallel_with(tiles, workers, &Identity, &|worker: usize| pm.tick(worker))
            }
            None => process_parallel_with(tiles, workers, &Identity, &|_: usize| {}),
        }
    }
}

// The stitched canvas of an identity round trip equals the normalized source
// whenever the grid didn't gain extra border-only rows or columns
fn normalized_reference(image: &RgbImage, tile_size: u32) -> Result<RgbImage> {
    let (width, height) = output_size(image.width(), image.height(), tile_size)?;
    Ok(resize_exact(image, width, height))
}

fn report_fidelity(stitched: &RgbImage, reference: &RgbImage) -> Result<()> {
    if stitched.dimensions() != reference.dimensions() {
        log::info!(
            "stitched size {:?} differs from normalized size {:?}; skipping fidelity check",
            stitched.dimensions(),
            reference.dimensions()
        );
        return Ok(());
    }

    let mse = mean_squared_error(stitched, reference)?;
    let psnr = peak_signal_to_noise(stitched, reference)?;
    log::info!("round trip mse {mse:.4}, psnr {psnr:.2} dB");
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Directory `split` writes to when none is given
pub fn default_tile_dir(image_path: &Path) -> PathBuf {
    let dir_name = format!("{}_tiles", file_stem(image_path));

    if let Some(parent) = image_path.parent() {
        parent.join(dir_name)
    } else {
        PathBuf::from(dir_name)
    }
}

/// Image `stitch` writes to when no output is given
pub fn stitched_output_path(input_path: &Path) -> PathBuf {
    let output_name = format!("{}{STITCHED_SUFFIX}.png", file_stem(input_path));

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
