/// Type-safe handling of the formats this tool reads and writes.
///
/// The extension check only gates which files are picked up by the walk;
/// the format actually used for saving comes from content detection at
/// decode time, so a mislabelled file is still handled correctly.
use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use image::ImageFormat;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressFormat {
    /// Lossy; the configured quality applies.
    Jpeg,
    /// Lossless; saved through the PNG optimizer, no quality parameter.
    Png,
    /// Saved through the codec's lossless-where-possible path.
    WebP,
}

impl PressFormat {
    /// Map a file extension (without the dot) to a format, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(PressFormat::Jpeg),
            "png" => Some(PressFormat::Png),
            "webp" => Some(PressFormat::WebP),
            _ => None,
        }
    }

    /// Map a content-detected format to one this tool can write back.
    pub fn from_detected(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(PressFormat::Jpeg),
            ImageFormat::Png => Some(PressFormat::Png),
            ImageFormat::WebP => Some(PressFormat::WebP),
            _ => None,
        }
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            PressFormat::Jpeg => ImageFormat::Jpeg,
            PressFormat::Png => ImageFormat::Png,
            PressFormat::WebP => ImageFormat::WebP,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PressFormat::Jpeg => "jpg",
            PressFormat::Png => "png",
            PressFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for PressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PressFormat::Jpeg => "JPEG",
            PressFormat::Png => "PNG",
            PressFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

/// Check whether a path carries one of the supported image extensions.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}
