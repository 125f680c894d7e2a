use std::path::Path;

use crate::error::MergerError;
use crate::models::{Anomaly, AnomalyKind, Segment};

/// Unrecognizable lines tolerated before the whole file is rejected.
pub const MAX_FORMAT_ERRORS: usize = 10;

/// Segments extracted from one transcript, with any field-level anomalies
/// found along the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedTranscript {
    pub segments: Vec<Segment>,
    pub anomalies: Vec<Anomaly>,
}

/// Parse a transcript file into the ordered segment sequence.
///
/// The file is decoded leniently: bytes that are not valid UTF-8 are
/// replaced rather than rejected, since diarization engines are sloppy
/// about encodings.
pub fn parse_transcript_file(path: &Path) -> Result<ParsedTranscript, MergerError> {
    let bytes = std::fs::read(path)
        .map_err(|e| MergerError::io(format!("reading {}", path.display()), e))?;
    parse_transcript(&String::from_utf8_lossy(&bytes))
}

/// Parse transcript content, one utterance per line:
///
/// ```text
/// [<start> - <end>] <speaker> <text...>
/// ```
///
/// Start and end are decimal seconds. The speaker is any whitespace-free
/// label; the exact vocabulary belongs to the upstream format definition.
/// Blank lines and trailing whitespace are tolerated. Lines with a
/// recognizable header but a bad field yield a segment with a substituted
/// value plus an anomaly; lines with no recognizable header yield an
/// anomaly only. The parse as a whole fails when more than
/// [`MAX_FORMAT_ERRORS`] lines are unrecognizable, or when a non-blank
/// file yields no segments at all.
pub fn parse_transcript(content: &str) -> Result<ParsedTranscript, MergerError> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut anomalies: Vec<Anomaly> = Vec::new();
    let mut malformed = 0usize;
    let mut first_malformed_line = 0usize;

    for (lineno, raw_line) in content.lines().enumerate() {
        let lineno = lineno + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let index = segments.len();
        let Some((start_field, end_field, rest)) = split_header(line) else {
            malformed += 1;
            if first_malformed_line == 0 {
                first_malformed_line = lineno;
            }
            if malformed > MAX_FORMAT_ERRORS {
                return Err(MergerError::parse(
                    lineno,
                    format!("more than {MAX_FORMAT_ERRORS} unrecognizable lines"),
                ));
            }
            anomalies.push(Anomaly::new(
                AnomalyKind::MalformedLine,
                index,
                format!("line {lineno}: no recognizable [start - end] header ({line})"),
            ));
            continue;
        };

        let previous_end = segments.last().map(|s| s.end).unwrap_or(0.0);
        let start = match parse_timestamp(start_field) {
            Some(value) => value,
            None => {
                anomalies.push(Anomaly::new(
                    AnomalyKind::InvalidTimestamp,
                    index,
                    format!(
                        "line {lineno}: bad start time {start_field:?}, substituting {previous_end}"
                    ),
                ));
                previous_end
            }
        };
        let end = match parse_timestamp(end_field) {
            Some(value) => value,
            None => {
                anomalies.push(Anomaly::new(
                    AnomalyKind::InvalidTimestamp,
                    index,
                    format!("line {lineno}: bad end time {end_field:?}, substituting {start}"),
                ));
                start
            }
        };
        if end < start {
            anomalies.push(Anomaly::new(
                AnomalyKind::NegativeSpan,
                index,
                format!("line {lineno}: segment ends at {end} before it starts at {start}"),
            ));
        }

        let (speaker, text) = match rest.split_once(' ') {
            Some((speaker, text)) => (speaker, text.trim_start()),
            None => (rest, ""),
        };

        segments.push(Segment {
            speaker_id: speaker.to_string(),
            start,
            end,
            text: text.to_string(),
            line: lineno,
        });
    }

    if segments.is_empty() && malformed > 0 {
        return Err(MergerError::parse(
            first_malformed_line,
            "file contains no parseable segments",
        ));
    }

    Ok(ParsedTranscript {
        segments,
        anomalies,
    })
}

/// Split `[a - b] rest` into its three parts, or None when the bracketed
/// header cannot be located. The time separator is space-hyphen-space, so
/// a (bogus) leading sign on a timestamp stays with its field.
fn split_header(line: &str) -> Option<(&str, &str, &str)> {
    let inner = line.strip_prefix('[')?;
    let close = inner.find(']')?;
    let (times, rest) = (&inner[..close], inner[close + 1..].trim_start());
    let (start_field, end_field) = times.split_once(" - ")?;
    Some((start_field.trim(), end_field.trim(), rest))
}

/// Parse a timestamp field as non-negative decimal seconds.
fn parse_timestamp(field: &str) -> Option<f64> {
    field
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_SPEAKER;

    #[test]
    fn test_parse_well_formed_transcript() {
        let content = "\
[0.50 - 1.25] SPEAKER_00 hello there
[1.30 - 2.00] SPEAKER_00 how are you
[2.10 - 3.40] SPEAKER_01 fine thanks
";
        let parsed = parse_transcript(content).unwrap();

        assert_eq!(parsed.segments.len(), 3);
        assert!(parsed.anomalies.is_empty());

        let first = &parsed.segments[0];
        assert_eq!(first.speaker_id, "SPEAKER_00");
        assert_eq!(first.start, 0.5);
        assert_eq!(first.end, 1.25);
        assert_eq!(first.text, "hello there");
        assert_eq!(first.line, 1);

        assert_eq!(parsed.segments[2].speaker_id, "SPEAKER_01");
        assert_eq!(parsed.segments[2].line, 3);
    }

    #[test]
    fn test_blank_lines_and_trailing_whitespace_tolerated() {
        let content = "[0.0 - 1.0] SPEAKER_00 hello   \n\n   \n[1.0 - 2.0] SPEAKER_00 again\n\n";
        let parsed = parse_transcript(content).unwrap();
        assert_eq!(parsed.segments.len(), 2);
        assert!(parsed.anomalies.is_empty());
        assert_eq!(parsed.segments[0].text, "hello");
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let parsed = parse_transcript("").unwrap();
        assert!(parsed.segments.is_empty());
        assert!(parsed.anomalies.is_empty());

        let parsed = parse_transcript("\n   \n\t\n").unwrap();
        assert!(parsed.segments.is_empty());
        assert!(parsed.anomalies.is_empty());
    }

    #[test]
    fn test_segment_without_text() {
        let parsed = parse_transcript("[0.0 - 1.0] SPEAKER_00\n").unwrap();
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.segments[0].text, "");
        assert!(parsed.anomalies.is_empty());
    }

    #[test]
    fn test_missing_speaker_yields_empty_label() {
        let parsed = parse_transcript("[0.0 - 1.0]\n").unwrap();
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.segments[0].speaker_id, "");
        assert_eq!(parsed.segments[0].text, "");
    }

    #[test]
    fn test_reserved_label_kept_verbatim() {
        // Attribution policy belongs to the merge engine; the parser only
        // extracts fields.
        let parsed = parse_transcript("[0.0 - 1.0] SPEAKER_UNKNOWN mumbling\n").unwrap();
        assert_eq!(parsed.segments[0].speaker_id, UNKNOWN_SPEAKER);
        assert!(parsed.segments[0].is_unattributed());
        assert!(parsed.anomalies.is_empty());
    }

    #[test]
    fn test_bad_start_time_substitutes_previous_end() {
        let content = "[0.0 - 1.5] SPEAKER_00 first\n[x.y - 2.5] SPEAKER_00 second\n";
        let parsed = parse_transcript(content).unwrap();

        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.segments[1].start, 1.5);
        assert_eq!(parsed.segments[1].end, 2.5);
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].kind, AnomalyKind::InvalidTimestamp);
        assert_eq!(parsed.anomalies[0].segment_index, 1);
    }

    #[test]
    fn test_bad_end_time_substitutes_start() {
        let parsed = parse_transcript("[2.0 - oops] SPEAKER_00 hello\n").unwrap();
        assert_eq!(parsed.segments[0].start, 2.0);
        assert_eq!(parsed.segments[0].end, 2.0);
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].kind, AnomalyKind::InvalidTimestamp);
    }

    #[test]
    fn test_negative_timestamp_is_invalid() {
        let parsed = parse_transcript("[-1.0 - 2.0] SPEAKER_00 hello\n").unwrap();
        assert_eq!(parsed.segments[0].start, 0.0);
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].kind, AnomalyKind::InvalidTimestamp);
    }

    #[test]
    fn test_negative_span_flagged_but_kept() {
        let parsed = parse_transcript("[3.0 - 1.0] SPEAKER_00 backwards\n").unwrap();
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.segments[0].start, 3.0);
        assert_eq!(parsed.segments[0].end, 1.0);
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].kind, AnomalyKind::NegativeSpan);
    }

    #[test]
    fn test_malformed_line_skipped_among_good_lines() {
        let content = "\
[0.0 - 1.0] SPEAKER_00 hello
this line is not a segment
[1.0 - 2.0] SPEAKER_00 world
";
        let parsed = parse_transcript(content).unwrap();

        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].kind, AnomalyKind::MalformedLine);
        // The skipped line would have been segment 1.
        assert_eq!(parsed.anomalies[0].segment_index, 1);
        assert!(parsed.anomalies[0].detail.contains("line 2"));
    }

    #[test]
    fn test_unterminated_header_is_malformed() {
        let content = "[0.0 - 1.0] SPEAKER_00 fine\n[2.0 - 3.0 SPEAKER_01 truncated\n";
        let parsed = parse_transcript(content).unwrap();
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].kind, AnomalyKind::MalformedLine);
    }

    #[test]
    fn test_error_threshold_is_fatal() {
        let mut content = String::from("[0.0 - 1.0] SPEAKER_00 fine\n");
        for _ in 0..(MAX_FORMAT_ERRORS + 1) {
            content.push_str("garbage\n");
        }
        let error = parse_transcript(&content).unwrap_err();
        assert!(matches!(error, MergerError::Parse { .. }));
    }

    #[test]
    fn test_file_with_nothing_parseable_is_fatal() {
        let error = parse_transcript("not a transcript\nstill not one\n").unwrap_err();
        match error {
            MergerError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_integer_timestamps_accepted() {
        let parsed = parse_transcript("[2 - 3] SPEAKER_00 short\n").unwrap();
        assert_eq!(parsed.segments[0].start, 2.0);
        assert_eq!(parsed.segments[0].end, 3.0);
        assert!(parsed.anomalies.is_empty());
    }
}
