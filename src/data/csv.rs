//! CSV ingestion for the tabular model shapes.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled correctly
//!
//! Label modes:
//! - `ClassIndex`  — the last column is an integer class index (0-based),
//!   one-hot encoded into a vector of length `n_classes`.
//! - `OneHot`      — the last `n_label_cols` columns are floats forming the
//!   label vector.
//! - `Regression`  — the last `n_target_cols` columns are raw float targets.

use crate::data::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Last column is an integer class index; one-hot encode to `n_classes`.
    ClassIndex { n_classes: usize },
    /// Last `n_label_cols` columns are the label vector.
    OneHot { n_label_cols: usize },
    /// Last `n_target_cols` columns are continuous regression targets.
    Regression { n_target_cols: usize },
}

/// Parses CSV bytes into (inputs, targets).
///
/// # Arguments
/// - `data`       — raw CSV bytes (UTF-8)
/// - `label_mode` — how to interpret the label column(s)
///
/// # Returns
/// `(inputs, targets)` where each is a `Vec<Vec<f64>>` of equal length,
/// ready for `MemoryStream`.
pub fn parse_csv(
    data: &[u8],
    label_mode: LabelMode,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), DataError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| DataError::CsvFormat("CSV file is not valid UTF-8".into()))?;

    let mut lines = text.lines().peekable();

    // Auto-detect header: skip first line if any cell is non-numeric.
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut targets: Vec<Vec<f64>> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.is_empty() {
            continue;
        }
        let row = row_idx + 1;

        match label_mode {
            LabelMode::ClassIndex { n_classes } => {
                if cells.len() < 2 {
                    return Err(DataError::Csv {
                        row,
                        message: format!(
                            "expected at least 2 columns (features + class index), got {}",
                            cells.len()
                        ),
                    });
                }
                let feature_cells = &cells[..cells.len() - 1];
                let label_cell = cells.last().unwrap();

                let feats = parse_floats(feature_cells, row)?;
                let class_idx: usize = label_cell.trim().parse::<usize>().map_err(|_| {
                    DataError::Csv {
                        row,
                        message: format!(
                            "class index '{}' is not a non-negative integer",
                            label_cell
                        ),
                    }
                })?;
                if class_idx >= n_classes {
                    return Err(DataError::Csv {
                        row,
                        message: format!("class index {} >= n_classes {}", class_idx, n_classes),
                    });
                }
                let mut one_hot = vec![0.0f64; n_classes];
                one_hot[class_idx] = 1.0;

                inputs.push(feats);
                targets.push(one_hot);
            }
            LabelMode::OneHot { n_label_cols } | LabelMode::Regression { n_target_cols: n_label_cols } => {
                if cells.len() < n_label_cols + 1 {
                    return Err(DataError::Csv {
                        row,
                        message: format!(
                            "expected at least {} columns, got {}",
                            n_label_cols + 1,
                            cells.len()
                        ),
                    });
                }
                let split = cells.len() - n_label_cols;
                let feats = parse_floats(&cells[..split], row)?;
                let lbls = parse_floats(&cells[split..], row)?;

                inputs.push(feats);
                targets.push(lbls);
            }
        }
    }

    if inputs.is_empty() {
        return Err(DataError::CsvFormat("CSV contains no data rows after parsing".into()));
    }

    // Verify all rows have the same feature width.
    let n_feats = inputs[0].len();
    for (i, row) in inputs.iter().enumerate() {
        if row.len() != n_feats {
            return Err(DataError::Csv {
                row: i + 1,
                message: format!(
                    "feature count {} does not match first row's {}",
                    row.len(),
                    n_feats
                ),
            });
        }
    }

    Ok((inputs, targets))
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    let cells = parse_csv_row(line);
    cells.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                    // Escaped quote inside quoted field.
                    current.push('"');
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            c => current.push(c),
        }
        i += 1;
    }
    fields.push(current);
    fields
}

/// Parses a slice of string cells as `f64`, with row info on failure.
fn parse_floats(cells: &[String], row: usize) -> Result<Vec<f64>, DataError> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| DataError::Csv {
                row,
                message: format!("'{}' is not a valid number", c),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_index_rows_are_one_hot_encoded() {
        let csv = b"x1,x2,label\n1.0,2.0,0\n3.0,4.0,2\n";
        let (inputs, targets) =
            parse_csv(csv, LabelMode::ClassIndex { n_classes: 3 }).unwrap();
        assert_eq!(inputs, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(targets, vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]]);
    }

    #[test]
    fn regression_targets_stay_raw() {
        let csv = b"1.0,2.0,-3.5\n4.0,5.0,0.25\n";
        let (inputs, targets) =
            parse_csv(csv, LabelMode::Regression { n_target_cols: 1 }).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(targets, vec![vec![-3.5], vec![0.25]]);
    }

    #[test]
    fn header_is_skipped_headerless_is_not() {
        let with_header = b"a,b,y\n1,2,0\n";
        let (inputs, _) =
            parse_csv(with_header, LabelMode::ClassIndex { n_classes: 1 }).unwrap();
        assert_eq!(inputs.len(), 1);

        let without = b"1,2,0\n3,4,0\n";
        let (inputs, _) =
            parse_csv(without, LabelMode::ClassIndex { n_classes: 1 }).unwrap();
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let row = parse_csv_row("\"1,5\",2");
        assert_eq!(row, vec!["1,5".to_string(), "2".to_string()]);
    }

    #[test]
    fn out_of_range_class_index_errors() {
        let csv = b"1.0,5\n";
        let err = parse_csv(csv, LabelMode::ClassIndex { n_classes: 3 }).unwrap_err();
        assert!(matches!(err, DataError::Csv { row: 1, .. }));
    }
}
