// ---------------------------------------------------------------------------
// Axis ranges remembered across spectrum loads
// ---------------------------------------------------------------------------

/// Default transmittance range of the spectrum plot.
pub const DEFAULT_Y: AxisRange = AxisRange::new(-0.04, 1.04);
/// Default range of the residual plot, in percent.
pub const DEFAULT_RESIDUAL_Y: AxisRange = AxisRange::new(-3.0, 3.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}

impl AxisRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Equal within a tiny fraction of the range width.
    pub fn approx_eq(&self, other: &AxisRange) -> bool {
        let tol = 1e-9 * self.width().abs().max(other.width().abs()).max(1e-12);
        (self.start - other.start).abs() <= tol && (self.end - other.end).abs() <= tol
    }
}

/// What both plots show: a shared x range and one y range per plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: AxisRange,
    pub y: AxisRange,
    pub residual_y: AxisRange,
}

impl ViewBounds {
    pub fn approx_eq(&self, other: &ViewBounds) -> bool {
        self.x.approx_eq(&other.x)
            && self.y.approx_eq(&other.y)
            && self.residual_y.approx_eq(&other.residual_y)
    }
}

/// The last view bounds the user looked at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMemory {
    x: Option<AxisRange>,
    y: AxisRange,
    residual_y: AxisRange,
}

impl Default for AxisMemory {
    fn default() -> Self {
        Self {
            x: None,
            y: DEFAULT_Y,
            residual_y: DEFAULT_RESIDUAL_Y,
        }
    }
}

impl AxisMemory {
    pub fn remember(&mut self, bounds: ViewBounds) {
        self.x = Some(bounds.x);
        self.y = bounds.y;
        self.residual_y = bounds.residual_y;
    }

    /// Bounds to open a spectrum covering `span = (min, max)` with.
    ///
    /// The remembered x range survives when it lies within the new spectrum
    /// widened by half its width on each side, so zooms that slightly exceed
    /// the window are kept. The y ranges are always kept since every curve is
    /// a transmittance or a residual.
    pub fn restore(&self, span: (f64, f64)) -> ViewBounds {
        let (lo, hi) = span;
        let extent = AxisRange::new(lo, hi);
        let half_width = (hi - lo) / 2.0;

        let x = match self.x {
            Some(prev) if lo - half_width < prev.start && hi + half_width > prev.end => prev,
            _ => extent,
        };

        ViewBounds {
            x,
            y: self.y,
            residual_y: self.residual_y,
        }
    }

    pub fn x(&self) -> Option<AxisRange> {
        self.x
    }

    pub fn y(&self) -> AxisRange {
        self.y
    }

    pub fn residual_y(&self) -> AxisRange {
        self.residual_y
    }
}
