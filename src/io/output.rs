use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::MergerError;
use crate::models::{Anomaly, Paragraph, UNKNOWN_SPEAKER};

/// Render paragraphs in the input line format, one paragraph per line.
///
/// Times use the shortest decimal form that parses back to the same value,
/// so re-reading the output reproduces the paragraph boundaries exactly.
/// Unattributed paragraphs are written under the reserved
/// [`UNKNOWN_SPEAKER`] label, which the merge engine treats as
/// unattributed wherever it appears, so they stay isolated on re-merge.
pub fn render_transcript(paragraphs: &[Paragraph]) -> String {
    let mut output = String::new();
    for paragraph in paragraphs {
        let speaker = if paragraph.speaker_id.is_empty() {
            UNKNOWN_SPEAKER
        } else {
            &paragraph.speaker_id
        };
        output.push_str(&format!(
            "[{} - {}] {}",
            paragraph.start, paragraph.end, speaker
        ));
        if !paragraph.text.is_empty() {
            output.push(' ');
            output.push_str(&paragraph.text);
        }
        output.push('\n');
    }
    output
}

/// Write the merged transcript, refusing to clobber an existing file.
///
/// The whole rendering is built in memory first; nothing is touched on
/// disk until serialization has succeeded.
pub fn write_transcript(paragraphs: &[Paragraph], path: &Path) -> Result<(), MergerError> {
    let rendered = render_transcript(paragraphs);
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| MergerError::io(format!("creating {}", path.display()), e))?;
    file.write_all(rendered.as_bytes())
        .map_err(|e| MergerError::io(format!("writing {}", path.display()), e))?;
    Ok(())
}

/// Machine-readable account of one merge run.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport<'a> {
    pub paragraphs: &'a [Paragraph],
    pub anomalies: &'a [Anomaly],
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportMetadata {
    pub segment_count: usize,
    pub paragraph_count: usize,
    pub anomaly_count: usize,
}

impl<'a> MergeReport<'a> {
    pub fn new(
        paragraphs: &'a [Paragraph],
        anomalies: &'a [Anomaly],
        segment_count: usize,
    ) -> Self {
        Self {
            paragraphs,
            anomalies,
            metadata: ReportMetadata {
                segment_count,
                paragraph_count: paragraphs.len(),
                anomaly_count: anomalies.len(),
            },
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), MergerError> {
        let file = std::fs::File::create(path)
            .map_err(|e| MergerError::io(format!("creating {}", path.display()), e))?;
        serde_json::to_writer_pretty(file, self).map_err(|e| {
            MergerError::io(
                format!("writing {}", path.display()),
                std::io::Error::other(e),
            )
        })?;
        Ok(())
    }
}
