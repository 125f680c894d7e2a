use thiserror::Error;

use crate::report::ExitStatus;

/// Fatal failure conditions. Field-level input problems are not errors;
/// they surface as [`Anomaly`](crate::models::Anomaly) records instead.
#[derive(Debug, Error)]
pub enum MergerError {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl MergerError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The exit signal a fatal error maps to. This is the single
    /// classification point for unrecoverable failures: every fatal kind
    /// collapses to an uncertain error, while non-fatal conditions never
    /// reach this function at all.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Config { .. } | Self::Parse { .. } | Self::Io { .. } | Self::Internal { .. } => {
                ExitStatus::UncertainError
            }
        }
    }
}
