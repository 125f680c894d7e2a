pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod report;

pub use config::{CliOverrides, FileConfig, MergerConfig, DEFAULT_CONFIG_PATH};
pub use error::MergerError;
pub use io::{
    parse_transcript, parse_transcript_file, render_transcript, write_transcript, MergeReport,
    ParsedTranscript, MAX_FORMAT_ERRORS,
};
pub use logging::{init_console_logging, init_logging};
pub use merge::{merge_segments, MergeOutcome};
pub use models::{Anomaly, AnomalyKind, Paragraph, Segment, UNKNOWN_SPEAKER};
pub use pipeline::{run_merge, MergeSummary};
pub use report::{ExitStatus, LogReporter, StatusReporter};
