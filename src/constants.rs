pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 95;
pub const DEFAULT_QUALITY: u8 = 60;

/// Extensions eligible for processing, compared case-insensitively.
/// Anything else is skipped without producing an outcome.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// oxipng preset used for the lossless PNG path. Quality does not apply there.
pub const PNG_OPTIMIZATION_PRESET: u8 = 4;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
