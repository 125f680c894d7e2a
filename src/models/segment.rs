use serde::Serialize;

/// Reserved speaker label for utterances with no attribution. Diarizers
/// emit it for spans they cannot assign, and the serializer writes it for
/// paragraphs with an empty speaker id, so the label never names a real
/// speaker: wherever it appears, the merge engine treats it the same as an
/// empty label.
pub const UNKNOWN_SPEAKER: &str = "SPEAKER_UNKNOWN";

/// One diarized utterance as read from the input transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Speaker label, e.g. `SPEAKER_00`. Empty when the source line carried
    /// no recognizable speaker field.
    pub speaker_id: String,
    /// Start of the utterance in seconds.
    pub start: f64,
    /// End of the utterance in seconds.
    pub end: f64,
    /// Utterance text, possibly empty.
    pub text: String,
    /// 1-based line number in the source file.
    pub line: usize,
}

impl Segment {
    /// Duration of this utterance in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether this utterance carries no usable speaker attribution: an
    /// empty label, or the reserved [`UNKNOWN_SPEAKER`] marker.
    pub fn is_unattributed(&self) -> bool {
        self.speaker_id.is_empty() || self.speaker_id == UNKNOWN_SPEAKER
    }
}

/// A maximal run of consecutive same-speaker segments collapsed into one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    /// Speaker label shared by every constituent segment.
    pub speaker_id: String,
    /// Start of the first constituent segment.
    pub start: f64,
    /// End of the last constituent segment.
    pub end: f64,
    /// Constituent texts joined with single spaces.
    pub text: String,
    /// Number of segments merged into this paragraph.
    pub segment_count: usize,
}

impl Paragraph {
    /// Duration of this paragraph in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_duration() {
        let segment = Segment {
            speaker_id: "SPEAKER_00".to_string(),
            start: 0.5,
            end: 2.0,
            text: "hello".to_string(),
            line: 1,
        };
        assert_eq!(segment.duration(), 1.5);
    }

    #[test]
    fn test_negative_span_duration_clamps_to_zero() {
        let segment = Segment {
            speaker_id: "SPEAKER_00".to_string(),
            start: 2.0,
            end: 1.0,
            text: String::new(),
            line: 1,
        };
        assert_eq!(segment.duration(), 0.0);
    }

    #[test]
    fn test_paragraph_duration() {
        let paragraph = Paragraph {
            speaker_id: "SPEAKER_00".to_string(),
            start: 1.0,
            end: 4.5,
            text: "hello there".to_string(),
            segment_count: 2,
        };
        assert_eq!(paragraph.duration(), 3.5);
    }

    #[test]
    fn test_unattributed_covers_empty_and_reserved_labels() {
        let mut segment = Segment {
            speaker_id: String::new(),
            start: 0.0,
            end: 1.0,
            text: String::new(),
            line: 1,
        };
        assert!(segment.is_unattributed());

        segment.speaker_id = UNKNOWN_SPEAKER.to_string();
        assert!(segment.is_unattributed());

        segment.speaker_id = "SPEAKER_00".to_string();
        assert!(!segment.is_unattributed());
    }
}
