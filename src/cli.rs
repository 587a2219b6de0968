use crate::constants::DEFAULT_QUALITY;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-press",
    about = "Recursively compress the images in a directory tree",
    long_about = "img-press walks a directory tree and re-encodes every JPEG, PNG and WebP file \
                  it finds, optionally downscaling to a bounding box. Results either overwrite \
                  the originals in place or land in an output directory that mirrors the input \
                  tree's structure. Files that fail to process are reported and skipped; the run \
                  always continues with the next file.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    img-press ./photos -o ./compressed -q 65 -w 1920 -H 1080\n  \
    img-press ./assets -q 40 --convert\n  \
    img-press ./gallery"
)]
pub struct Args {
    #[arg(help = "Input directory to walk recursively")]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        help = "Output directory (default: overwrite in place)",
        long_help = "Write results into this directory, reproducing the input tree's \
                     subdirectory structure. When omitted, every file is overwritten in place."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        help = "JPEG quality (1-95, default: 60)",
        long_help = "Quality for the lossy JPEG encoder, from 1 (smallest) to 95 (best). \
                     PNG output is optimized losslessly and ignores this setting."
    )]
    pub quality: u8,

    #[arg(
        short = 'w',
        long,
        help = "Maximum width in pixels",
        long_help = "Downscale images wider than this to fit, preserving aspect ratio. \
                     Images are never enlarged."
    )]
    pub max_width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        help = "Maximum height in pixels",
        long_help = "Downscale images taller than this to fit, preserving aspect ratio. \
                     Images are never enlarged."
    )]
    pub max_height: Option<u32>,

    #[arg(
        long,
        help = "Convert every output to JPEG instead of keeping the source format",
        long_help = "By default each file is saved back in its own detected format. With this \
                     flag every output is re-encoded as JPEG. Filenames are preserved verbatim \
                     either way."
    )]
    pub convert: bool,
}
