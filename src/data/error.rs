use std::path::PathBuf;

use thiserror::Error;

/// Why a `.spt` file could not be turned into a [`SpectrumRecord`].
///
/// Line numbers are zero-based indices into the file, so the metadata line is
/// line 1 and the first data row is line 3.
///
/// [`SpectrumRecord`]: super::model::SpectrumRecord
#[derive(Debug, Error)]
pub enum SpectrumError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("expected at least 3 header lines, found {found}")]
    MissingLines { found: usize },

    #[error("line 1: {reason}")]
    Metadata { reason: String },

    #[error("line {line}: expected {expected} values, found {found}")]
    TokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{token}' is not a number")]
    NonNumeric {
        line: usize,
        column: String,
        token: String,
    },

    #[error("line {line}, column '{column}': non-finite value")]
    NonFinite { line: usize, column: String },

    #[error("line {line}: continuum rescaling produced a non-finite transmittance")]
    NonFiniteRescale { line: usize },

    #[error("incomplete spectrum: missing '{missing}' column")]
    Incomplete { missing: &'static str },

    #[error("spectrum has no data rows")]
    NoData,
}

impl SpectrumError {
    /// Zero-based file line the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Metadata { .. } => Some(1),
            Self::TokenCount { line, .. }
            | Self::NonNumeric { line, .. }
            | Self::NonFinite { line, .. }
            | Self::NonFiniteRescale { line } => Some(*line),
            _ => None,
        }
    }
}
