use std::path::Path;

use crate::config::MergerConfig;
use crate::error::MergerError;
use crate::io::{parse_transcript_file, write_transcript, MergeReport};
use crate::merge::merge_segments;
use crate::report::StatusReporter;

/// Counts for one completed merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub segments: usize,
    pub paragraphs: usize,
    pub anomalies: usize,
}

/// Run one merge end to end: read, parse, merge, serialize, write.
///
/// One input file is one atomic unit of work: nothing is written unless
/// parsing and merging succeed, and an existing output file is never
/// clobbered. Anomalies accumulate during the pass and are flushed to the
/// reporter before the output is written; they never block the merge or
/// change its exit signal.
pub fn run_merge(
    config: &MergerConfig,
    report_path: Option<&Path>,
    reporter: &mut dyn StatusReporter,
) -> Result<MergeSummary, MergerError> {
    let parsed = parse_transcript_file(&config.input)?;
    let outcome = merge_segments(&parsed.segments);

    let mut anomalies = parsed.anomalies;
    anomalies.extend(outcome.anomalies);
    anomalies.sort_by_key(|a| a.segment_index);
    for anomaly in &anomalies {
        reporter.anomaly(anomaly);
    }

    let output_path = config.output_path();
    write_transcript(&outcome.paragraphs, &output_path)?;

    if let Some(path) = report_path {
        MergeReport::new(&outcome.paragraphs, &anomalies, parsed.segments.len())
            .write_json(path)?;
    }

    let summary = MergeSummary {
        segments: parsed.segments.len(),
        paragraphs: outcome.paragraphs.len(),
        anomalies: anomalies.len(),
    };
    reporter.info(&format!(
        "merged {} segments into {} paragraphs ({} anomalies) -> {}",
        summary.segments,
        summary.paragraphs,
        summary.anomalies,
        output_path.display()
    ));
    Ok(summary)
}
