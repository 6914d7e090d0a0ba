use std::borrow::Cow;
use std::collections::BTreeMap;

use super::error::SpectrumError;

/// Frequency axis column (wavenumber, cm⁻¹).
pub const FREQ: &str = "Freq";
/// Measured transmittance column.
pub const TM: &str = "Tm";
/// Calculated transmittance column.
pub const TC: &str = "Tc";
/// Continuum level column, only present in some GFIT versions.
pub const CONT: &str = "Cont";

/// Index of the first data row in a `.spt` file.
pub const DATA_START: usize = 3;

/// Columns that are not retrieved species.
const NON_SPECIES: [&str; 4] = [FREQ, TM, TC, CONT];

// ---------------------------------------------------------------------------
// SpectrumMetadata – the scalar line of a `.spt` file
// ---------------------------------------------------------------------------

/// Tokens of the metadata line plus the scalars the viewer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumMetadata {
    pub params: Vec<String>,
    /// Solar zenith angle (degrees).
    pub sza: f64,
    /// Observer altitude (km).
    pub zobs: f64,
    /// Zero-level offset applied together with the continuum.
    pub xzo: f64,
}

// ---------------------------------------------------------------------------
// SpectrumRecord – one parsed `.spt` file
// ---------------------------------------------------------------------------

/// A fully parsed spectrum fit: the column table, the metadata scalars and
/// the residuals derived from them.
///
/// When a `Cont` column is present, `Tm` and `Tc` in `columns` already hold
/// the continuum-normalised transmittances.
#[derive(Debug, Clone)]
pub struct SpectrumRecord {
    pub header: Vec<String>,
    pub columns: BTreeMap<String, Vec<f64>>,
    pub params: Vec<String>,
    pub sza: f64,
    pub zobs: f64,
    pub xzo: f64,
    /// `100 * (Tm - Tc)` per sample, in percent.
    pub residual: Vec<f64>,
    pub rms_residual: f64,
}

impl SpectrumRecord {
    /// Assemble a record from per-column values laid out in `header` order.
    ///
    /// This is the only place the continuum rescaling happens, so a record
    /// never sees it twice.
    pub fn assemble(
        header: Vec<String>,
        values: Vec<Vec<f64>>,
        meta: SpectrumMetadata,
    ) -> Result<Self, SpectrumError> {
        let mut columns = BTreeMap::new();
        for (name, column) in header.iter().zip(values) {
            // A repeated name keeps its first column.
            columns.entry(name.clone()).or_insert(column);
        }

        for required in [TM, TC] {
            if !columns.contains_key(required) {
                return Err(SpectrumError::Incomplete { missing: required });
            }
        }

        let n_rows = columns.values().next().map_or(0, Vec::len);
        if n_rows == 0 {
            return Err(SpectrumError::NoData);
        }

        if let Some(cont) = columns.get(CONT).cloned() {
            for name in [TM, TC] {
                if let Some(t) = columns.get_mut(name) {
                    rescale_to_continuum(t, &cont, meta.xzo)?;
                }
            }
        }

        let residual: Vec<f64> = columns[TM]
            .iter()
            .zip(&columns[TC])
            .map(|(tm, tc)| 100.0 * (tm - tc))
            .collect();
        let rms_residual = rms(&residual);

        Ok(SpectrumRecord {
            header,
            columns,
            params: meta.params,
            sza: meta.sza,
            zobs: meta.zobs,
            xzo: meta.xzo,
            residual,
            rms_residual,
        })
    }

    /// Number of spectral samples.
    pub fn len(&self) -> usize {
        self.residual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residual.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn frequency(&self) -> Option<&[f64]> {
        self.column(FREQ)
    }

    /// The x values to plot against: `Freq`, or the sample index if the file
    /// has no frequency column.
    pub fn abscissa(&self) -> Cow<'_, [f64]> {
        match self.frequency() {
            Some(freq) => Cow::Borrowed(freq),
            None => Cow::Owned((0..self.len()).map(|i| i as f64).collect()),
        }
    }

    /// Smallest and largest abscissa value.
    pub fn frequency_span(&self) -> (f64, f64) {
        self.abscissa()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }

    pub fn has_continuum(&self) -> bool {
        self.columns.contains_key(CONT)
    }

    /// Retrieved species columns, in header order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.header
            .iter()
            .map(String::as_str)
            .filter(|name| !NON_SPECIES.contains(name))
    }
}

/// `T' = (T / Cont - xzo) / (1 - xzo)`, in place.
fn rescale_to_continuum(t: &mut [f64], cont: &[f64], xzo: f64) -> Result<(), SpectrumError> {
    for (row, (value, c)) in t.iter_mut().zip(cont).enumerate() {
        let scaled = (*value / c - xzo) / (1.0 - xzo);
        if !scaled.is_finite() {
            return Err(SpectrumError::NonFiniteRescale {
                line: row + DATA_START,
            });
        }
        *value = scaled;
    }
    Ok(())
}

/// Root mean square of `values`.
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean_sq = values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64;
    mean_sq.sqrt()
}
