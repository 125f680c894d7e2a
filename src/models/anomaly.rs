use serde::Serialize;

/// Classification of non-fatal data-quality issues found during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Line had no recognizable `[start - end]` header and was skipped.
    MalformedLine,
    /// Segment carried no speaker label.
    MissingSpeaker,
    /// A timestamp field did not parse and a substitute was used.
    InvalidTimestamp,
    /// Segment ends before it starts.
    NegativeSpan,
    /// Segment starts before the previous segment ended.
    TimestampRegression,
}

/// A non-fatal condition detected while parsing or merging. Logged through
/// the status reporter, never blocks the merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Index of the offending segment in input order. For a line that
    /// produced no segment, the index the segment would have had.
    pub segment_index: usize,
    pub detail: String,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, segment_index: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            segment_index,
            detail: detail.into(),
        }
    }
}
