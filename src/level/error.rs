use std::path::PathBuf;

use thiserror::Error;

/// Which capacity check an oversized level failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OversizeAxis {
    /// Longest grid column has more cells than fit across the screen
    Horizontal,
    /// More grid columns than fit down the screen
    Vertical,
}

impl std::fmt::Display for OversizeAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OversizeAxis::Horizontal => f.write_str("too many blocks per strip"),
            OversizeAxis::Vertical => f.write_str("too many strips"),
        }
    }
}

/// Errors raised while reading, writing or placing a level.
///
/// None of these are fatal: loading and saving report them through the log
/// and a `bool`, and oversize levels are still built.
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("Malformed level data at line {line_no} ({line:?}): {reason}")]
    Format {
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("Level file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Level too big, {axis}: {found}/{capacity}")]
    Oversize {
        axis: OversizeAxis,
        found: usize,
        capacity: usize,
    },
}

impl LevelError {
    pub(crate) fn format(line_no: usize, line: &str, reason: impl Into<String>) -> Self {
        LevelError::Format {
            line_no,
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LevelError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for a missing backing file
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LevelError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_mentions_line() {
        let err = LevelError::format(3, "1,x,2", "invalid digit");
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("1,x,2"));
    }

    #[test]
    fn test_not_found_detection() {
        let err = LevelError::io(
            "missing.map",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());

        let err = LevelError::Oversize {
            axis: OversizeAxis::Horizontal,
            found: 20,
            capacity: 16,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Level too big, too many blocks per strip: 20/16");
    }
}
