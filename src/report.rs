use tracing::{error, info, warn};

use crate::error::MergerError;
use crate::models::Anomaly;

/// Final process outcome, ordered so that elevation is a plain max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitStatus {
    /// Clean completion. Anomalies alone never leave this state.
    Success = 0,
    /// Defined non-fatal completion, e.g. built-in defaults substituted
    /// for a missing default config file.
    Warning = 1,
    /// Unrecoverable failure of any kind.
    UncertainError = 2,
}

impl ExitStatus {
    /// Numeric code handed to the invoking shell.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Sink for status events during a run. The merger classifies outcomes
/// through this interface; only `main` ever terminates the process.
pub trait StatusReporter {
    fn info(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn anomaly(&mut self, anomaly: &Anomaly);
    fn fatal(&mut self, error: &MergerError);
    /// Exit signal for everything reported so far.
    fn exit_status(&self) -> ExitStatus;
}

/// Production reporter: forwards events to `tracing` and ratchets the exit
/// status upward, never downward.
#[derive(Debug)]
pub struct LogReporter {
    status: ExitStatus,
}

impl LogReporter {
    pub fn new() -> Self {
        Self {
            status: ExitStatus::Success,
        }
    }

    fn elevate(&mut self, status: ExitStatus) {
        self.status = self.status.max(status);
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for LogReporter {
    fn info(&mut self, message: &str) {
        info!("{message}");
    }

    fn warning(&mut self, message: &str) {
        warn!("{message}");
        self.elevate(ExitStatus::Warning);
    }

    fn anomaly(&mut self, anomaly: &Anomaly) {
        // Logged, but anomalies never alter the exit signal.
        warn!("segment {}: {}", anomaly.segment_index, anomaly.detail);
    }

    fn fatal(&mut self, error: &MergerError) {
        // Causes are embedded in the error's own rendering.
        error!("{error}");
        self.elevate(error.exit_status());
    }

    fn exit_status(&self) -> ExitStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnomalyKind;

    #[test]
    fn test_anomalies_do_not_elevate() {
        let mut reporter = LogReporter::new();
        reporter.anomaly(&Anomaly::new(
            AnomalyKind::TimestampRegression,
            2,
            "starts before previous segment ended",
        ));
        reporter.anomaly(&Anomaly::new(AnomalyKind::MissingSpeaker, 3, "no speaker"));
        assert_eq!(reporter.exit_status(), ExitStatus::Success);
    }

    #[test]
    fn test_warning_elevates_once() {
        let mut reporter = LogReporter::new();
        reporter.warning("default config file not found");
        assert_eq!(reporter.exit_status(), ExitStatus::Warning);
    }

    #[test]
    fn test_fatal_outranks_warning_in_either_order() {
        let mut reporter = LogReporter::new();
        reporter.fatal(&MergerError::config("bad config"));
        reporter.warning("too late to matter");
        assert_eq!(reporter.exit_status(), ExitStatus::UncertainError);

        let mut reporter = LogReporter::new();
        reporter.warning("first");
        reporter.fatal(&MergerError::config("then this"));
        assert_eq!(reporter.exit_status(), ExitStatus::UncertainError);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Warning.code(), 1);
        assert_eq!(ExitStatus::UncertainError.code(), 2);
    }
}
