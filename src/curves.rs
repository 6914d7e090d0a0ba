use eframe::egui::Color32;

use crate::color::{ColorTable, CALCULATED_COLOR, MEASURED_COLOR};
use crate::data::model::{SpectrumRecord, TC, TM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Species,
    Measured,
    Calculated,
}

/// One toggleable line of the spectrum plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Legend / checkbox label.
    pub label: String,
    /// Record column holding the y values.
    pub column: String,
    pub color: Color32,
    pub kind: CurveKind,
}

/// Species curves in header order, then measured and calculated.
pub fn build_curves(record: &SpectrumRecord, colors: &ColorTable) -> Vec<Curve> {
    let mut curves: Vec<Curve> = record
        .species()
        .map(|species| Curve {
            label: species.to_string(),
            column: species.to_string(),
            color: colors.color_for(species),
            kind: CurveKind::Species,
        })
        .collect();

    curves.push(Curve {
        label: "Measured".to_string(),
        column: TM.to_string(),
        color: MEASURED_COLOR,
        kind: CurveKind::Measured,
    });
    curves.push(Curve {
        label: "Calculated".to_string(),
        column: TC.to_string(),
        color: CALCULATED_COLOR,
        kind: CurveKind::Calculated,
    });
    curves
}

/// `[x, y]` pairs for a curve.
pub fn curve_points(record: &SpectrumRecord, curve: &Curve) -> Vec<[f64; 2]> {
    let x = record.abscissa();
    let y = record.column(&curve.column).unwrap_or_default();
    x.iter().zip(y).map(|(&xi, &yi)| [xi, yi]).collect()
}

pub fn residual_points(record: &SpectrumRecord) -> Vec<[f64; 2]> {
    record
        .abscissa()
        .iter()
        .zip(&record.residual)
        .map(|(&xi, &ri)| [xi, ri])
        .collect()
}

/// Title line of the spectrum plot.
pub fn plot_title(name: &str, record: &SpectrumRecord) -> String {
    format!(
        "{name}; SZA={}; zobs={}km; %resid=100*(Measured-Calculated); RMSresid={:.4}%",
        record.sza, record.zobs, record.rms_residual
    )
}
