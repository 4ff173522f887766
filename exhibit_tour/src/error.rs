use std::fmt;
use std::io;

/// Errors raised while loading or validating tour setup data.
///
/// Per-frame code never returns these; see [`FrameIssue`] for what happens at runtime.
#[derive(Debug)]
pub enum TourError {
    /// File access failures
    Io {
        operation: String,
        source: io::Error,
    },

    /// Malformed configuration documents
    Config {
        context: String,
        source: serde_json::Error,
    },

    /// Configuration that parsed but cannot drive a tour
    Validation { item: String, reason: String },
}

impl TourError {
    pub fn validation(item: impl Into<String>, reason: impl Into<String>) -> TourError {
        TourError::Validation {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourError::Io { operation, source } => {
                write!(f, "I/O error during '{}': {}", operation, source)
            }
            TourError::Config { context, source } => {
                write!(f, "Configuration error: {} ({})", context, source)
            }
            TourError::Validation { item, reason } => {
                write!(f, "Invalid {}: {}", item, reason)
            }
        }
    }
}

impl std::error::Error for TourError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TourError::Io { source, .. } => Some(source),
            TourError::Config { source, .. } => Some(source),
            TourError::Validation { .. } => None,
        }
    }
}

/// A frame that could not run one of its steps. Always recoverable: the step is skipped
/// for this tick and retried on the next.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameIssue {
    /// A collaborator (rig, head, waypoint, collider) is absent
    MissingReference(&'static str),
    /// An index outside the valid range, clamped before use
    OutOfRangeIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// A near-zero direction (e.g. looking straight up) made a rotation undefined
    DegenerateGeometry(&'static str),
    /// An input control produced no usable value and was read as neutral
    InputReadFailure(&'static str),
}

impl fmt::Display for FrameIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameIssue::MissingReference(what) => write!(f, "missing reference: {}", what),
            FrameIssue::OutOfRangeIndex { what, index, len } => {
                write!(f, "{} index {} out of range (len {})", what, index, len)
            }
            FrameIssue::DegenerateGeometry(what) => write!(f, "degenerate geometry: {}", what),
            FrameIssue::InputReadFailure(what) => write!(f, "input read failure: {}", what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = TourError::validation("gaze.hold_seconds", "must be positive");
        assert_eq!(err.to_string(), "Invalid gaze.hold_seconds: must be positive");
    }

    #[test]
    fn test_config_error_has_source() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = TourError::Config {
            context: "tour.json".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_frame_issue_display() {
        let issue = FrameIssue::OutOfRangeIndex {
            what: "group",
            index: 4,
            len: 2,
        };
        assert_eq!(issue.to_string(), "group index 4 out of range (len 2)");
    }
}
