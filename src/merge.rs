use crate::models::{Anomaly, AnomalyKind, Paragraph, Segment};

/// Result of one merge pass.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Merged paragraphs, in input order.
    pub paragraphs: Vec<Paragraph>,
    /// Non-fatal conditions detected during the pass.
    pub anomalies: Vec<Anomaly>,
}

/// The open paragraph being grown while the current speaker holds the floor.
struct Accumulator {
    speaker_id: String,
    start: f64,
    end: f64,
    text: String,
    segment_count: usize,
}

impl Accumulator {
    fn open(segment: &Segment) -> Self {
        Self {
            speaker_id: segment.speaker_id.clone(),
            start: segment.start,
            end: segment.end,
            text: segment.text.clone(),
            segment_count: 1,
        }
    }

    fn append(&mut self, segment: &Segment) {
        self.end = segment.end;
        if !segment.text.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(&segment.text);
        }
        self.segment_count += 1;
    }

    fn close(self) -> Paragraph {
        Paragraph {
            speaker_id: self.speaker_id,
            start: self.start,
            end: self.end,
            text: self.text,
            segment_count: self.segment_count,
        }
    }
}

/// Collapse runs of consecutive same-speaker segments into paragraphs.
///
/// Single pass over the input: each segment either extends the open
/// paragraph (exact speaker match) or closes it and opens a new one.
/// Unattributed segments (empty label, or the reserved
/// [`UNKNOWN_SPEAKER`](crate::models::UNKNOWN_SPEAKER) marker) are flagged
/// and emitted as their own single-segment paragraphs under the empty
/// speaker id; an unknown attribution always ends the current run and
/// never absorbs a neighbor, and two adjacent unattributed segments do not
/// merge with each other either. Timing irregularities are flagged but
/// never block merging. Output order equals input order and every input
/// segment lands in exactly one paragraph.
pub fn merge_segments(segments: &[Segment]) -> MergeOutcome {
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut anomalies: Vec<Anomaly> = Vec::new();
    let mut accumulator: Option<Accumulator> = None;
    let mut previous_end: Option<f64> = None;

    for (index, segment) in segments.iter().enumerate() {
        if let Some(last_end) = previous_end {
            if segment.start < last_end {
                anomalies.push(Anomaly::new(
                    AnomalyKind::TimestampRegression,
                    index,
                    format!(
                        "line {}: segment starts at {} before the previous segment ended at {}",
                        segment.line, segment.start, last_end
                    ),
                ));
            }
        }
        previous_end = Some(segment.end);

        if segment.is_unattributed() {
            if let Some(open) = accumulator.take() {
                paragraphs.push(open.close());
            }
            anomalies.push(Anomaly::new(
                AnomalyKind::MissingSpeaker,
                index,
                format!("line {}: segment has no speaker attribution", segment.line),
            ));
            paragraphs.push(Paragraph {
                speaker_id: String::new(),
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
                segment_count: 1,
            });
            continue;
        }

        let same_speaker = accumulator
            .as_ref()
            .is_some_and(|open| open.speaker_id == segment.speaker_id);
        if same_speaker {
            if let Some(open) = accumulator.as_mut() {
                open.append(segment);
            }
        } else {
            if let Some(open) = accumulator.take() {
                paragraphs.push(open.close());
            }
            accumulator = Some(Accumulator::open(segment));
        }
    }

    if let Some(open) = accumulator {
        paragraphs.push(open.close());
    }

    MergeOutcome {
        paragraphs,
        anomalies,
    }
}
