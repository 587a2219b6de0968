pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod formats;
pub mod report;
pub mod transcode;

pub use codec::{DecodedImage, ImageCodec, PressCodec};
pub use error::{Result, TranscodeError};
pub use formats::{has_supported_extension, PressFormat};
pub use report::{ConsoleReporter, FileOutcome, Reporter, RunSummary};
pub use transcode::{collect_candidates, run_transcode, Candidate, RunConfig};
