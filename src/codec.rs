use crate::constants::PNG_OPTIMIZATION_PRESET;
use crate::error::{Result, TranscodeError};
use crate::formats::PressFormat;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::path::Path;

/// A raster decoded from disk together with its content-detected format.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// `None` when the file content is a format this tool cannot write back.
    pub format: Option<PressFormat>,
}

/// Decode, resize and encode collaborator used by the batch transcoder.
///
/// Stateless by contract; kept behind a trait so the transcoder can be
/// exercised with a fake codec.
pub trait ImageCodec {
    /// Decode a file into a raster, detecting the format from content
    /// rather than from the file extension.
    fn decode(&self, path: &Path) -> Result<DecodedImage>;

    /// Shrink the raster to fit within `max_width` x `max_height`,
    /// preserving aspect ratio. Images that already fit are left unchanged;
    /// nothing is ever upscaled.
    fn downscale(&self, image: &mut DynamicImage, max_width: u32, max_height: u32);

    /// Encode the raster to `path` in the given format. Quality only applies
    /// to the lossy JPEG encoder; PNG goes through lossless optimization.
    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: PressFormat,
        quality: u8,
    ) -> Result<()>;
}

/// Production codec backed by the `image` crate, with oxipng handling
/// the PNG output path.
pub struct PressCodec;

impl ImageCodec for PressCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format().and_then(PressFormat::from_detected);
        let image = reader.decode()?;
        Ok(DecodedImage { image, format })
    }

    fn downscale(&self, image: &mut DynamicImage, max_width: u32, max_height: u32) {
        if image.width() <= max_width && image.height() <= max_height {
            return;
        }
        *image = image.thumbnail(max_width, max_height);
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: PressFormat,
        quality: u8,
    ) -> Result<()> {
        match format {
            PressFormat::Jpeg => save_jpeg(image, path, quality),
            PressFormat::Png => save_optimized_png(image, path),
            PressFormat::WebP => {
                image.save_with_format(path, format.to_image_format())?;
                Ok(())
            }
        }
    }
}

/// Encode to an in-memory buffer first so a failed encode never leaves a
/// truncated file at the output path.
fn save_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    // JPEG carries no alpha channel; flatten when the source has one.
    if image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    } else {
        image.write_with_encoder(encoder)?;
    }

    fs::write(path, &buffer)?;
    Ok(())
}

fn save_optimized_png(image: &DynamicImage, path: &Path) -> Result<()> {
    // Uniquely named intermediate in the output directory, so no sibling
    // file can be clobbered; removed on every exit path when it drops.
    let out_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let temp_path = tempfile::Builder::new()
        .prefix(".img-press-")
        .suffix(".png")
        .tempfile_in(out_dir)?
        .into_temp_path();

    image.save_with_format(&temp_path, ImageFormat::Png)?;

    let mut options = oxipng::Options::from_preset(PNG_OPTIMIZATION_PRESET);
    options.force = true;

    let input = oxipng::InFile::Path(temp_path.to_path_buf());
    let output = oxipng::OutFile::Path {
        path: Some(path.to_path_buf()),
        preserve_attrs: false,
    };
    oxipng::optimize(&input, &output, &options)
        .map_err(|e| TranscodeError::PngOptimization(e.to_string()))?;

    Ok(())
}
