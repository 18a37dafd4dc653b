//! Level text codec
//!
//! Reading and writing are symmetric: columns are comma-joined without a
//! leading separator and the metadata line is `velocity,theme,gravity`.

use super::error::LevelError;
use super::grid::LevelTuning;

/// Line that separates grid data from metadata
pub const DATA_END: &str = ";";

/// Metadata field positions
const POS_VELOCITY: usize = 0;
const POS_THEME: usize = 1;
const POS_GRAVITY: usize = 2;
const METADATA_FIELDS: usize = 3;

/// Result of parsing a level file
#[derive(Debug, Default)]
pub struct ParsedLevel {
    /// Column-major cell codes
    pub cells: Vec<Vec<i32>>,
    pub tuning: LevelTuning,
    /// Non-fatal problems (short metadata line); tuning keeps defaults for these
    pub issues: Vec<LevelError>,
}

/// Parse level text.
///
/// A malformed number anywhere is fatal. A metadata line with fewer than
/// three fields is reported in [`ParsedLevel::issues`] and leaves the tuning
/// at its defaults.
pub fn parse(text: &str) -> Result<ParsedLevel, LevelError> {
    let mut level = ParsedLevel::default();
    let mut lines = text.lines().enumerate();

    let mut saw_data_end = false;
    for (idx, raw) in lines.by_ref() {
        let line = raw.trim();
        if line == DATA_END {
            saw_data_end = true;
            break;
        }
        level.cells.push(parse_column(idx + 1, line)?);
    }

    if !saw_data_end {
        return Ok(level);
    }

    match lines.next() {
        Some((idx, raw)) => {
            let line = raw.trim();
            let values = parse_metadata(idx + 1, line)?;
            if values.len() < METADATA_FIELDS {
                level.issues.push(LevelError::format(
                    idx + 1,
                    line,
                    format!(
                        "missing metadata, expected {} fields, found {}",
                        METADATA_FIELDS,
                        values.len()
                    ),
                ));
            } else {
                level.tuning = LevelTuning {
                    ball_velocity: values[POS_VELOCITY],
                    // Stored as a float, truncated
                    theme: values[POS_THEME] as i32,
                    gravity: values[POS_GRAVITY],
                };
            }
        }
        None => {
            let line_no = text.lines().count() + 1;
            level
                .issues
                .push(LevelError::format(line_no, "", "missing metadata line"));
        }
    }

    Ok(level)
}

fn parse_column(line_no: usize, line: &str) -> Result<Vec<i32>, LevelError> {
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i32>()
                .map_err(|e| LevelError::format(line_no, line, format!("{token:?}: {e}")))
        })
        .collect()
}

fn parse_metadata(line_no: usize, line: &str) -> Result<Vec<f32>, LevelError> {
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<f32>()
                .map_err(|e| LevelError::format(line_no, line, format!("{token:?}: {e}")))
        })
        .collect()
}

/// Serialize cells and tuning into level text
pub fn serialize(cells: &[Vec<i32>], tuning: &LevelTuning) -> String {
    let mut out = String::new();
    for column in cells {
        let joined: Vec<String> = column.iter().map(|code| code.to_string()).collect();
        out.push_str(&joined.join(","));
        out.push('\n');
    }
    out.push_str(DATA_END);
    out.push('\n');

    let mut fields = [String::new(), String::new(), String::new()];
    fields[POS_VELOCITY] = tuning.ball_velocity.to_string();
    fields[POS_THEME] = tuning.theme.to_string();
    fields[POS_GRAVITY] = tuning.gravity.to_string();
    out.push_str(&fields.join(","));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1,0,-2\n-1,-1\n;\n1.5,2,0.25\n";

    #[test]
    fn test_parse_sample() {
        let level = parse(SAMPLE).unwrap();
        assert_eq!(level.cells, vec![vec![1, 0, -2], vec![-1, -1]]);
        assert_eq!(level.tuning.ball_velocity, 1.5);
        assert_eq!(level.tuning.theme, 2);
        assert_eq!(level.tuning.gravity, 0.25);
        assert!(level.issues.is_empty());
    }

    #[test]
    fn test_parse_tolerates_crlf_and_spaces() {
        let level = parse("1, 2 ,3\r\n;\r\n1,0,0\r\n").unwrap();
        assert_eq!(level.cells, vec![vec![1, 2, 3]]);
        assert_eq!(level.tuning.ball_velocity, 1.0);
    }

    #[test]
    fn test_theme_truncated() {
        let level = parse("1\n;\n1,3.9,0\n").unwrap();
        assert_eq!(level.tuning.theme, 3);
    }

    #[test]
    fn test_malformed_cell_is_error() {
        let err = parse("1,2\n1,x\n;\n1,0,0\n").unwrap_err();
        match err {
            LevelError::Format { line_no, line, .. } => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "1,x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_metadata_is_error() {
        let err = parse("1\n;\nfast,0,0\n").unwrap_err();
        assert!(matches!(err, LevelError::Format { line_no: 3, .. }));
    }

    #[test]
    fn test_short_metadata_keeps_defaults() {
        let level = parse("1,1\n;\n2.0,1\n").unwrap();
        assert_eq!(level.cells, vec![vec![1, 1]]);
        assert_eq!(level.tuning, LevelTuning::default());
        assert_eq!(level.issues.len(), 1);
        assert!(matches!(level.issues[0], LevelError::Format { line_no: 3, .. }));
    }

    #[test]
    fn test_missing_metadata_section() {
        let level = parse("1,1\n2\n").unwrap();
        assert_eq!(level.cells.len(), 2);
        assert_eq!(level.tuning, LevelTuning::default());
        assert!(level.issues.is_empty());

        let level = parse("1,1\n;\n").unwrap();
        assert_eq!(level.issues.len(), 1);
    }

    #[test]
    fn test_empty_line_is_empty_column() {
        let level = parse("1\n\n-1\n;\n1,0,0\n").unwrap();
        assert_eq!(level.cells, vec![vec![1], vec![], vec![-1]]);
    }

    #[test]
    fn test_serialize_format() {
        let tuning = LevelTuning {
            ball_velocity: 1.5,
            theme: 2,
            gravity: 0.25,
        };
        let text = serialize(&[vec![1, 0, -2], vec![-1, -1]], &tuning);
        assert_eq!(text, SAMPLE);
    }

    #[test]
    fn test_round_trip_exact() {
        let tuning = LevelTuning {
            ball_velocity: 0.1,
            theme: 7,
            gravity: -0.003,
        };
        let cells = vec![vec![0, 5, -3], vec![], vec![-12, 0, 0, 1]];
        let parsed = parse(&serialize(&cells, &tuning)).unwrap();
        assert_eq!(parsed.cells, cells);
        assert_eq!(parsed.tuning, tuning);
        assert!(parsed.issues.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: serialize then parse yields the same grid and tuning
            #[test]
            fn prop_round_trip(
                cells in prop::collection::vec(prop::collection::vec(-9i32..10, 0..12), 0..10),
                ball_velocity in 0.01f32..10.0,
                theme in 0i32..8,
                gravity in -1.0f32..1.0,
            ) {
                let tuning = LevelTuning { ball_velocity, theme, gravity };
                let parsed = parse(&serialize(&cells, &tuning)).unwrap();
                prop_assert_eq!(parsed.cells, cells);
                prop_assert_eq!(parsed.tuning, tuning);
            }
        }
    }
}
