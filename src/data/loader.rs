use std::path::Path;

use super::error::SpectrumError;
use super::model::{SpectrumMetadata, SpectrumRecord, DATA_START};

/// Positions of the scalars on the metadata line.
const SZA_TOKEN: usize = 4;
const ZOBS_TOKEN: usize = 5;
const XZO_TOKEN: usize = 10;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a `.spt` spectrum file written by GFIT.
pub fn read_spt(path: &Path) -> Result<SpectrumRecord, SpectrumError> {
    let text = std::fs::read_to_string(path).map_err(|source| SpectrumError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_spt(&text)
}

/// Parse the contents of a `.spt` file.
///
/// Layout:
/// ```text
///  line 0    banner (ignored)
///  line 1    metadata tokens; #4 = SZA, #5 = zobs, #10 = xzo
///  line 2    column names
///  line 3..  one whitespace separated row of numbers per sample
/// ```
pub fn parse_spt(text: &str) -> Result<SpectrumRecord, SpectrumError> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.len() > DATA_START && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() < DATA_START {
        return Err(SpectrumError::MissingLines { found: lines.len() });
    }

    let meta = parse_metadata(lines[1])?;
    let header: Vec<String> = lines[2].split_whitespace().map(str::to_string).collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(lines.len() - DATA_START); header.len()];
    for (offset, line) in lines[DATA_START..].iter().enumerate() {
        let line_no = offset + DATA_START;
        let row = parse_row(line, line_no, &header)?;
        for (column, value) in values.iter_mut().zip(row) {
            column.push(value);
        }
    }

    SpectrumRecord::assemble(header, values, meta)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_metadata(line: &str) -> Result<SpectrumMetadata, SpectrumError> {
    let params: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if params.len() <= XZO_TOKEN {
        return Err(SpectrumError::Metadata {
            reason: format!(
                "expected at least {} tokens, found {}",
                XZO_TOKEN + 1,
                params.len()
            ),
        });
    }

    let scalar = |idx: usize, name: &str| -> Result<f64, SpectrumError> {
        let token = &params[idx];
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SpectrumError::Metadata {
                reason: format!("token {idx} ({name}) '{token}' is not a finite number"),
            })
    };

    Ok(SpectrumMetadata {
        sza: scalar(SZA_TOKEN, "sza")?,
        zobs: scalar(ZOBS_TOKEN, "zobs")?,
        xzo: scalar(XZO_TOKEN, "xzo")?,
        params,
    })
}

fn parse_row(line: &str, line_no: usize, header: &[String]) -> Result<Vec<f64>, SpectrumError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != header.len() {
        return Err(SpectrumError::TokenCount {
            line: line_no,
            expected: header.len(),
            found: tokens.len(),
        });
    }

    tokens
        .iter()
        .zip(header)
        .map(|(tok, column)| {
            let value = tok.parse::<f64>().map_err(|_| SpectrumError::NonNumeric {
                line: line_no,
                column: column.clone(),
                token: tok.to_string(),
            })?;
            if !value.is_finite() {
                return Err(SpectrumError::NonFinite {
                    line: line_no,
                    column: column.clone(),
                });
            }
            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CONT, FREQ, TC, TM};

    const PARAMS: &str = " 4000.0 4100.0 0.005 1.0 45.25 0.237 0.0 1.0 0.0 0.0 0.5";

    fn spt(header: &str, rows: &[&str]) -> String {
        let mut text = format!("test.spt  GFIT version 5\n{PARAMS}\n{header}\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_documented_example() {
        let text = spt(" Freq Cont Tm Tc", &["1000 2.0 1.0 0.8", "1001 2.0 0.6 0.4"]);
        let record = parse_spt(&text).unwrap();

        assert_eq!(record.header, vec![FREQ, CONT, TM, TC]);
        assert_eq!(record.params.len(), 11);
        assert_eq!(record.sza, 45.25);
        assert_eq!(record.zobs, 0.237);
        assert_eq!(record.xzo, 0.5);

        let tm = record.column(TM).unwrap();
        let tc = record.column(TC).unwrap();
        assert!((tm[0] - 0.0).abs() < 1e-12 && (tm[1] + 0.4).abs() < 1e-12);
        assert!((tc[0] + 0.2).abs() < 1e-12 && (tc[1] + 0.6).abs() < 1e-12);
        assert!((record.residual[0] - 20.0).abs() < 1e-9);
        assert!((record.residual[1] - 20.0).abs() < 1e-9);
        assert!((record.rms_residual - 20.0).abs() < 1e-9);
    }

    #[test]
    fn all_columns_share_a_length() {
        let text = spt(
            "Freq Tm Tc h2o co2",
            &[
                "6200.00 0.91 0.90 0.99 0.95",
                "6200.01 0.85 0.87 0.98 0.90",
                "6200.02 0.70 0.69 0.97 0.80",
                "6200.03 0.95 0.96 1.00 0.99",
            ],
        );
        let record = parse_spt(&text).unwrap();

        assert_eq!(record.len(), 4);
        for name in &record.header {
            assert_eq!(record.columns[name].len(), record.residual.len());
        }
        assert_eq!(record.column(FREQ).unwrap()[2], 6200.02);
    }

    #[test]
    fn rms_is_root_mean_square_of_residuals() {
        let text = spt(
            "Freq Tm Tc",
            &["1 0.91 0.90", "2 0.85 0.87", "3 0.70 0.66", "4 0.95 0.96"],
        );
        let record = parse_spt(&text).unwrap();
        let mean_sq =
            record.residual.iter().map(|r| r * r).sum::<f64>() / record.residual.len() as f64;
        let expected = mean_sq.sqrt();
        assert!((record.rms_residual - expected).abs() <= 1e-9 * expected);
    }

    #[test]
    fn wrong_token_count_names_the_line() {
        let text = spt("Freq Tm Tc", &["1 0.9 0.9", "2 0.8", "3 0.7 0.7"]);
        let err = parse_spt(&text).unwrap_err();
        assert!(matches!(
            err,
            SpectrumError::TokenCount {
                line: 4,
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(err.line(), Some(4));
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let text = spt("Freq Tm Tc", &["1 0.9 abc"]);
        let err = parse_spt(&text).unwrap_err();
        match err {
            SpectrumError::NonNumeric {
                line,
                column,
                token,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Tc");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_is_rejected() {
        let text = spt("Freq Tm Tc", &["1 0.9 0.9", "2 NaN 0.9"]);
        let err = parse_spt(&text).unwrap_err();
        assert!(matches!(err, SpectrumError::NonFinite { line: 4, .. }));
    }

    #[test]
    fn short_metadata_line_is_fatal() {
        let text = "banner\n1 2 3 4 5 6 7 8 9 10\nFreq Tm Tc\n1 0.9 0.9\n";
        let err = parse_spt(text).unwrap_err();
        assert!(matches!(err, SpectrumError::Metadata { .. }));
    }

    #[test]
    fn truncated_file_is_fatal() {
        let err = parse_spt("banner\n").unwrap_err();
        assert!(matches!(err, SpectrumError::MissingLines { found: 1 }));
    }

    #[test]
    fn header_only_file_has_no_data() {
        let text = spt("Freq Tm Tc", &[]);
        assert!(matches!(parse_spt(&text).unwrap_err(), SpectrumError::NoData));
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let mut text = spt("Freq Tm Tc", &["1 0.9 0.9"]);
        text.push_str("\n   \n");
        assert_eq!(parse_spt(&text).unwrap().len(), 1);
    }

    #[test]
    fn blank_line_inside_data_is_rejected() {
        let text = spt("Freq Tm Tc", &["1 0.9 0.9", "", "2 0.8 0.8"]);
        assert!(matches!(
            parse_spt(&text).unwrap_err(),
            SpectrumError::TokenCount { line: 4, found: 0, .. }
        ));
    }

    #[test]
    fn missing_measured_column_is_incomplete() {
        let text = spt("Freq Tc co2", &["1 0.9 0.9"]);
        assert!(matches!(
            parse_spt(&text).unwrap_err(),
            SpectrumError::Incomplete { missing: "Tm" }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("ggg_spectra_missing_file.spt");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(read_spt(&path).unwrap_err(), SpectrumError::Io { .. }));
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("ggg_spectra_{}.spt", std::process::id()));
        std::fs::write(&path, spt("Freq Tm Tc", &["1 0.9 0.8"])).unwrap();
        let record = read_spt(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!((record.rms_residual - 10.0).abs() < 1e-9);
    }
}
