//! Tiling constants and runtime configuration defaults

/// Default edge length of a tile's nominal area in pixels
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Default halo width around each tile in pixels
pub const DEFAULT_OVERLAP_SIZE: u32 = 0;

/// Models consume blocks whose sides are a multiple of this
pub const DEFAULT_MODEL_BASE: u32 = 4;

/// Default number of parallel workers for fan-out
pub const DEFAULT_WORKERS: usize = 4;

/// Border colour added around the resized image before slicing
pub const BORDER_FILL: [u8; 3] = [255, 255, 255];

// Per-channel normalisation applied when blocks become model tensors
/// Channel mean used for tensor normalisation
pub const TENSOR_MEAN: f32 = 0.5;
/// Channel standard deviation used for tensor normalisation
pub const TENSOR_STD: f32 = 0.5;

// File naming
/// Extension used when writing tile files
pub const TILE_EXTENSION: &str = "png";
/// Suffix added to stitched output filenames
pub const STITCHED_SUFFIX: &str = "_stitched";
/// Extensions accepted when scanning directories for images
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "tif"];
/// Name suffixes of derived modality images that are never used as inputs
pub const EXCLUDED_MODALITIES: [&str; 10] = [
    "Hema",
    "DAPI",
    "DAPILap2",
    "Ki67",
    "Seg",
    "Marked",
    "SegRefined",
    "SegOverlaid",
    "Marker",
    "Lap2",
];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
