//! The batch transcoder: walk an input tree, filter by extension, and push
//! every candidate through decode -> optional downscale -> re-encode,
//! mirroring the input's subdirectory structure when an output root is set.
//!
//! Failures never cross file boundaries: each candidate ends in exactly one
//! reported outcome and the walk always moves on to the next file. The one
//! exception is the output root itself, which fails the run up front when it
//! cannot be created, since no file could be written after that.

use crate::codec::ImageCodec;
use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use crate::error::{Result, TranscodeError};
use crate::formats::{self, PressFormat};
use crate::report::{FileOutcome, Reporter, RunSummary};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Immutable settings for one transcoding run, validated once at entry.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_root: PathBuf,
    /// `None` overwrites every input file in place.
    pub output_root: Option<PathBuf>,
    /// Applied to the lossy JPEG encoder only.
    pub quality: u8,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// When false, every output is forced to JPEG regardless of source format.
    pub keep_format: bool,
}

impl RunConfig {
    pub fn new(
        input_root: PathBuf,
        output_root: Option<PathBuf>,
        quality: u8,
        max_width: Option<u32>,
        max_height: Option<u32>,
        keep_format: bool,
    ) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(TranscodeError::InvalidQuality(quality));
        }
        if max_width == Some(0) {
            return Err(TranscodeError::InvalidDimension("width"));
        }
        if max_height == Some(0) {
            return Err(TranscodeError::InvalidDimension("height"));
        }

        Ok(Self {
            input_root,
            output_root,
            quality,
            max_width,
            max_height,
            keep_format,
        })
    }
}

/// A file discovered during the walk whose extension is in the supported set.
#[derive(Debug)]
pub struct Candidate {
    pub input: PathBuf,
    /// Directory of the file relative to the input root; empty for files
    /// directly under the root.
    pub relative_dir: PathBuf,
    pub file_name: OsString,
}

/// Walk the input root and collect every supported candidate, in walk order.
///
/// A missing or empty root yields no candidates rather than an error, and
/// unreadable entries are skipped the same way the walk skips them.
pub fn collect_candidates(input_root: &Path) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(input_root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !formats::has_supported_extension(path) {
            continue;
        }

        let relative_dir = path
            .parent()
            .and_then(|dir| dir.strip_prefix(input_root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        candidates.push(Candidate {
            input: path.to_path_buf(),
            relative_dir,
            file_name: entry.file_name().to_os_string(),
        });
    }

    candidates
}

/// Process every candidate under the configured input root, streaming one
/// outcome per file to the reporter and returning the aggregate summary.
pub fn run_transcode(
    config: &RunConfig,
    codec: &dyn ImageCodec,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    let started = Instant::now();

    if let Some(output_root) = &config.output_root {
        // Nothing can be written if the output root itself cannot be created.
        fs::create_dir_all(output_root)
            .map_err(|_| TranscodeError::DirectoryCreation(output_root.clone()))?;
    }

    let candidates = collect_candidates(&config.input_root);
    reporter.run_started(candidates.len());

    let mut summary = RunSummary::default();
    for candidate in candidates {
        let outcome = match process_file(&candidate, config, codec) {
            Ok((output, bytes_before, bytes_after)) => FileOutcome::Compressed {
                input: candidate.input,
                output,
                bytes_before,
                bytes_after,
            },
            Err(error) => FileOutcome::Failed {
                input: candidate.input,
                error,
            },
        };
        reporter.file_done(&outcome);
        summary.record(&outcome);
    }

    reporter.run_finished();
    summary.elapsed = started.elapsed();
    Ok(summary)
}

/// Per-file pipeline: resolve the output target, decode, optionally
/// downscale, resolve the save format and encode. Any error here is the
/// file's own failure and never aborts the run.
fn process_file(
    candidate: &Candidate,
    config: &RunConfig,
    codec: &dyn ImageCodec,
) -> Result<(PathBuf, u64, u64)> {
    let output_path = resolve_output_path(candidate, config)?;

    let bytes_before = fs::metadata(&candidate.input)?.len();
    let mut decoded = codec.decode(&candidate.input)?;

    if config.max_width.is_some() || config.max_height.is_some() {
        let max_width = config.max_width.unwrap_or(decoded.image.width());
        let max_height = config.max_height.unwrap_or(decoded.image.height());
        codec.downscale(&mut decoded.image, max_width, max_height);
    }

    let save_format = if config.keep_format {
        // Content detection wins over the extension. A detected format this
        // tool cannot write back falls through to the lossy fallback.
        decoded.format.unwrap_or(PressFormat::Jpeg)
    } else {
        PressFormat::Jpeg
    };

    codec.encode(&decoded.image, &output_path, save_format, config.quality)?;
    let bytes_after = fs::metadata(&output_path)?.len();

    Ok((output_path, bytes_before, bytes_after))
}

fn resolve_output_path(candidate: &Candidate, config: &RunConfig) -> Result<PathBuf> {
    let Some(output_root) = &config.output_root else {
        return Ok(candidate.input.clone());
    };

    let out_dir = output_root.join(&candidate.relative_dir);
    // A subdirectory that cannot be mirrored fails only the files inside it.
    fs::create_dir_all(&out_dir).map_err(|_| TranscodeError::DirectoryCreation(out_dir.clone()))?;

    Ok(out_dir.join(&candidate.file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodedImage;
    use image::DynamicImage;
    use std::cell::RefCell;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    /// Codec that fabricates rasters without touching real image data, so
    /// the transcoder contract can be tested in isolation.
    struct FakeCodec {
        fail_on: Vec<&'static str>,
        encoded_formats: RefCell<Vec<PressFormat>>,
    }

    impl FakeCodec {
        fn new() -> Self {
            Self {
                fail_on: Vec::new(),
                encoded_formats: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(names: Vec<&'static str>) -> Self {
            Self {
                fail_on: names,
                encoded_formats: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageCodec for FakeCodec {
        fn decode(&self, path: &Path) -> Result<DecodedImage> {
            let name = path.file_name().unwrap().to_string_lossy();
            if self.fail_on.iter().any(|f| name == *f) {
                return Err(TranscodeError::PngOptimization("corrupt data".to_string()));
            }
            Ok(DecodedImage {
                image: DynamicImage::new_rgb8(4, 4),
                format: Some(PressFormat::Png),
            })
        }

        fn downscale(&self, _image: &mut DynamicImage, _max_width: u32, _max_height: u32) {}

        fn encode(
            &self,
            _image: &DynamicImage,
            path: &Path,
            format: PressFormat,
            _quality: u8,
        ) -> Result<()> {
            self.encoded_formats.borrow_mut().push(format);
            fs::write(path, b"pressed")?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct CollectingReporter {
        total: usize,
        successes: Vec<PathBuf>,
        failures: Vec<PathBuf>,
    }

    impl Reporter for CollectingReporter {
        fn run_started(&mut self, total_files: usize) {
            self.total = total_files;
        }

        fn file_done(&mut self, outcome: &FileOutcome) {
            match outcome {
                FileOutcome::Compressed { input, .. } => self.successes.push(input.clone()),
                FileOutcome::Failed { input, .. } => self.failures.push(input.clone()),
            }
        }
    }

    fn write_file(path: &Path, contents: &[u8]) {
        File::create(path).unwrap().write_all(contents).unwrap();
    }

    fn config(input: &Path, output: Option<&Path>) -> RunConfig {
        RunConfig::new(
            input.to_path_buf(),
            output.map(Path::to_path_buf),
            60,
            None,
            None,
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_run_config_quality_bounds() {
        let root = PathBuf::from("in");
        assert!(matches!(
            RunConfig::new(root.clone(), None, 0, None, None, true),
            Err(TranscodeError::InvalidQuality(0))
        ));
        assert!(matches!(
            RunConfig::new(root.clone(), None, 96, None, None, true),
            Err(TranscodeError::InvalidQuality(96))
        ));
        assert!(RunConfig::new(root.clone(), None, 1, None, None, true).is_ok());
        assert!(RunConfig::new(root, None, 95, None, None, true).is_ok());
    }

    #[test]
    fn test_run_config_rejects_zero_dimensions() {
        let root = PathBuf::from("in");
        assert!(matches!(
            RunConfig::new(root.clone(), None, 60, Some(0), None, true),
            Err(TranscodeError::InvalidDimension("width"))
        ));
        assert!(matches!(
            RunConfig::new(root, None, 60, None, Some(0), true),
            Err(TranscodeError::InvalidDimension("height"))
        ));
    }

    #[test]
    fn test_collect_candidates_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir.path().join("a.jpg"), b"x");
        write_file(&temp_dir.path().join("b.PNG"), b"x");
        write_file(&temp_dir.path().join("notes.txt"), b"x");

        let subdir = temp_dir.path().join("sub");
        fs::create_dir(&subdir).unwrap();
        write_file(&subdir.join("c.webp"), b"x");

        let mut candidates = collect_candidates(temp_dir.path());
        candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].file_name, "a.jpg");
        assert_eq!(candidates[0].relative_dir, PathBuf::new());
        assert_eq!(candidates[2].file_name, "c.webp");
        assert_eq!(candidates[2].relative_dir, PathBuf::from("sub"));
    }

    #[test]
    fn test_collect_candidates_missing_root_yields_nothing() {
        let candidates = collect_candidates(Path::new("/nonexistent/input/root"));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_one_outcome_per_candidate_and_failure_isolation() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir(&input).unwrap();
        write_file(&input.join("good.jpg"), b"real enough");
        write_file(&input.join("bad.png"), b"");
        write_file(&input.join("skip.txt"), b"not an image");

        let codec = FakeCodec::failing_on(vec!["bad.png"]);
        let mut reporter = CollectingReporter::default();
        let summary = run_transcode(
            &config(&input, Some(&output)),
            &codec,
            &mut reporter,
        )
        .unwrap();

        assert_eq!(reporter.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(reporter.successes, vec![input.join("good.jpg")]);
        assert_eq!(reporter.failures, vec![input.join("bad.png")]);

        assert!(output.join("good.jpg").exists());
        assert!(!output.join("bad.png").exists());
        assert!(!output.join("skip.txt").exists());
    }

    #[test]
    fn test_output_tree_mirrors_input_structure() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a");
        let nested = input.join("x");
        fs::create_dir_all(&nested).unwrap();
        write_file(&nested.join("img.jpg"), b"original");

        let output = temp_dir.path().join("b");
        let codec = FakeCodec::new();
        let mut reporter = CollectingReporter::default();
        let summary =
            run_transcode(&config(&input, Some(&output)), &codec, &mut reporter).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert!(output.join("x").join("img.jpg").exists());
        // Input is untouched in mirrored mode.
        assert_eq!(fs::read(nested.join("img.jpg")).unwrap(), b"original");
    }

    #[test]
    fn test_in_place_mode_overwrites_input() {
        let temp_dir = TempDir::new().unwrap();
        let input_file = temp_dir.path().join("photo.jpg");
        write_file(&input_file, b"original");

        let codec = FakeCodec::new();
        let mut reporter = CollectingReporter::default();
        let summary = run_transcode(&config(temp_dir.path(), None), &codec, &mut reporter).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(fs::read(&input_file).unwrap(), b"pressed");
    }

    #[test]
    fn test_format_retention_disabled_forces_jpeg() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        write_file(&input.join("img.png"), b"x");

        let output = temp_dir.path().join("out");
        let mut cfg = config(&input, Some(&output));
        cfg.keep_format = false;

        let codec = FakeCodec::new();
        let mut reporter = CollectingReporter::default();
        run_transcode(&cfg, &codec, &mut reporter).unwrap();

        assert_eq!(*codec.encoded_formats.borrow(), vec![PressFormat::Jpeg]);
        // Filename is preserved verbatim even though the format changed.
        assert!(output.join("img.png").exists());
    }

    #[test]
    fn test_format_retention_uses_detected_format() {
        let temp_dir = TempDir::new().unwrap();
        // FakeCodec detects everything as PNG regardless of extension.
        write_file(&temp_dir.path().join("img.jpg"), b"x");

        let codec = FakeCodec::new();
        let mut reporter = CollectingReporter::default();
        run_transcode(&config(temp_dir.path(), None), &codec, &mut reporter).unwrap();

        assert_eq!(*codec.encoded_formats.borrow(), vec![PressFormat::Png]);
    }

    #[test]
    fn test_missing_input_root_is_an_empty_run() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("does-not-exist");

        let codec = FakeCodec::new();
        let mut reporter = CollectingReporter::default();
        let summary = run_transcode(&config(&input, None), &codec, &mut reporter).unwrap();

        assert_eq!(summary.processed(), 0);
        assert_eq!(reporter.total, 0);
    }
}
