use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::bounds::{AxisRange, DEFAULT_RESIDUAL_Y, DEFAULT_Y};
use crate::color::{to_hex, RESIDUAL_COLOR, ZERO_LINE_COLOR};
use crate::curves::{curve_points, plot_title, residual_points};
use crate::state::Session;

// ---------------------------------------------------------------------------
// Standalone HTML snapshot of a spectrum
// ---------------------------------------------------------------------------

const WIDTH: f64 = 1000.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 150.0;
const SPECTRUM_TOP: f64 = 40.0;
const SPECTRUM_HEIGHT: f64 = 400.0;
const RESIDUAL_GAP: f64 = 20.0;
const RESIDUAL_HEIGHT: f64 = 150.0;
const MARGIN_BOTTOM: f64 = 50.0;

/// Name of the custom spectra folder's parent directory, used to tell
/// snapshots of same-named spectra from different sites apart.
pub fn snapshot_suffix(custom_dir: Option<&Path>) -> Option<String> {
    custom_dir?
        .parent()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// `{save_dir}/{spectrum}.html`, or `{spectrum}_{suffix}.html` when viewing
/// spectra from a custom folder.
pub fn snapshot_path(save_dir: &Path, spectrum: &str, custom_dir: Option<&Path>) -> PathBuf {
    match snapshot_suffix(custom_dir) {
        Some(ext) => save_dir.join(format!("{spectrum}_{ext}.html")),
        None => save_dir.join(format!("{spectrum}.html")),
    }
}

/// Render `session` and write it under `save_dir`. Returns the written path.
pub fn write_snapshot(
    save_dir: &Path,
    session: &Session,
    custom_dir: Option<&Path>,
) -> Result<PathBuf> {
    let path = snapshot_path(save_dir, &session.name, custom_dir);
    let ext = snapshot_suffix(custom_dir).unwrap_or_default();
    let html = render_snapshot(session, &ext);
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// Browser tab title: the first 12 and last 3 characters of the name.
pub fn document_title(spectrum: &str) -> String {
    let chars: Vec<char> = spectrum.chars().collect();
    let head: String = chars.iter().take(12).collect();
    let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();
    head + &tail
}

/// Build the standalone HTML document for a session.
pub fn render_snapshot(session: &Session, ext: &str) -> String {
    let record = &session.record;
    let (lo, hi) = record.frequency_span();
    let x = AxisRange::new(lo, hi);

    let spectrum = Panel {
        top: SPECTRUM_TOP,
        height: SPECTRUM_HEIGHT,
        x,
        y: DEFAULT_Y,
    };
    let residual = Panel {
        top: SPECTRUM_TOP + SPECTRUM_HEIGHT + RESIDUAL_GAP,
        height: RESIDUAL_HEIGHT,
        x,
        y: DEFAULT_RESIDUAL_Y,
    };
    let total_height = residual.top + residual.height + MARGIN_BOTTOM;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{WIDTH}' height='{total_height}' font-family='sans-serif'>"
    );
    svg.push_str("<rect width='100%' height='100%' fill='white'/>\n");
    let _ = writeln!(
        svg,
        "<text x='{MARGIN_LEFT}' y='24' font-size='13'>{}</text>",
        escape(&plot_title(&session.name, record))
    );

    spectrum.frame(&mut svg, "clip-spectrum", "Transmittance", false);
    residual.frame(&mut svg, "clip-residual", "% Residuals", true);

    for (i, curve) in session.curves.iter().enumerate() {
        let _ = writeln!(
            svg,
            "<g id='curve-{i}' clip-path='url(#clip-spectrum)'>"
        );
        spectrum.polyline(&mut svg, &curve_points(record, curve), &to_hex(curve.color), 2.0);
        svg.push_str("</g>\n");
    }

    svg.push_str("<g clip-path='url(#clip-residual)'>\n");
    residual.polyline(&mut svg, &residual_points(record), &to_hex(RESIDUAL_COLOR), 1.0);
    residual.polyline(&mut svg, &[[lo, 0.0], [hi, 0.0]], &to_hex(ZERO_LINE_COLOR), 1.0);
    svg.push_str("</g>\n");

    // Legend
    let legend_x = WIDTH - MARGIN_RIGHT + 15.0;
    for (i, curve) in session.curves.iter().enumerate() {
        let y = SPECTRUM_TOP + 15.0 + 18.0 * i as f64;
        let _ = writeln!(
            svg,
            "<line x1='{legend_x}' y1='{y}' x2='{}' y2='{y}' stroke='{}' stroke-width='2'/>\
             <text x='{}' y='{}' font-size='12'>{}</text>",
            legend_x + 20.0,
            to_hex(curve.color),
            legend_x + 26.0,
            y + 4.0,
            escape(&curve.label)
        );
    }
    svg.push_str("</svg>\n");

    let mut controls = String::new();
    for (i, curve) in session.curves.iter().enumerate() {
        let _ = writeln!(
            controls,
            "<label><input type='checkbox' class='curve-toggle' data-curve='{i}' checked> {}</label><br>",
            escape(&curve.label)
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n<title>{title}</title>\n\
         <style>body {{ display: flex; font-family: sans-serif; }} \
         .controls {{ width: 200px; padding: 10px; }} \
         .ext {{ text-align: center; font-size: 1.3em; font-weight: bold; }}</style>\n\
         </head>\n<body>\n<div>\n{svg}<div class='ext'>{ext}</div>\n</div>\n\
         <div class='controls'>\n<button id='hide-all'>Hide all lines</button><br>\n\
         <button id='show-all'>Show all lines</button><br>\n{controls}</div>\n\
         <script>\n{SCRIPT}</script>\n</body>\n</html>\n",
        title = escape(&document_title(&session.name)),
        ext = escape(ext),
    )
}

const SCRIPT: &str = r#"const boxes = document.querySelectorAll('.curve-toggle');
function sync() {
  boxes.forEach(b => {
    document.getElementById('curve-' + b.dataset.curve).style.display = b.checked ? '' : 'none';
  });
}
boxes.forEach(b => b.addEventListener('change', sync));
document.getElementById('hide-all').onclick = () => { boxes.forEach(b => b.checked = false); sync(); };
document.getElementById('show-all').onclick = () => { boxes.forEach(b => b.checked = true); sync(); };
"#;

// ---------------------------------------------------------------------------
// SVG helpers
// ---------------------------------------------------------------------------

/// One plot area of the snapshot, in data and pixel coordinates.
struct Panel {
    top: f64,
    height: f64,
    x: AxisRange,
    y: AxisRange,
}

impl Panel {
    fn width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn sx(&self, x: f64) -> f64 {
        let span = if self.x.width() == 0.0 { 1.0 } else { self.x.width() };
        MARGIN_LEFT + (x - self.x.start) / span * self.width()
    }

    fn sy(&self, y: f64) -> f64 {
        self.top + (1.0 - (y - self.y.start) / self.y.width()) * self.height
    }

    /// Border, clip path, ticks and axis labels.
    fn frame(&self, svg: &mut String, clip_id: &str, y_label: &str, x_label: bool) {
        let (left, top, w, h) = (MARGIN_LEFT, self.top, self.width(), self.height);
        let _ = writeln!(
            svg,
            "<defs><clipPath id='{clip_id}'><rect x='{left}' y='{top}' width='{w}' height='{h}'/></clipPath></defs>\n\
             <rect x='{left}' y='{top}' width='{w}' height='{h}' fill='none' stroke='#64646e' stroke-width='1'/>"
        );

        for tick in ticks(self.y) {
            let sy = self.sy(tick);
            let _ = writeln!(
                svg,
                "<line x1='{}' y1='{sy:.1}' x2='{left}' y2='{sy:.1}' stroke='#64646e'/>\
                 <text x='{}' y='{:.1}' font-size='11' text-anchor='end'>{}</text>",
                left - 5.0,
                left - 8.0,
                sy + 4.0,
                format_tick(tick)
            );
        }
        let label_y = top + h / 2.0;
        let _ = writeln!(
            svg,
            "<text x='18' y='{label_y}' font-size='13' text-anchor='middle' \
             transform='rotate(-90 18 {label_y})'>{y_label}</text>"
        );

        if x_label {
            let bottom = top + h;
            for tick in ticks(self.x) {
                let sx = self.sx(tick);
                let _ = writeln!(
                    svg,
                    "<line x1='{sx:.1}' y1='{bottom}' x2='{sx:.1}' y2='{}' stroke='#64646e'/>\
                     <text x='{sx:.1}' y='{}' font-size='11' text-anchor='middle'>{}</text>",
                    bottom + 5.0,
                    bottom + 18.0,
                    format_tick(tick)
                );
            }
            let _ = writeln!(
                svg,
                "<text x='{}' y='{}' font-size='13' text-anchor='middle'>Wavenumber (cm\u{207B}\u{00B9})</text>",
                left + w / 2.0,
                bottom + 38.0
            );
        }
    }

    fn polyline(&self, svg: &mut String, points: &[[f64; 2]], stroke: &str, width: f64) {
        let _ = write!(
            svg,
            "<polyline fill='none' stroke='{stroke}' stroke-width='{width}' points='"
        );
        for &[x, y] in points {
            let _ = write!(svg, "{:.1},{:.1} ", self.sx(x), self.sy(y));
        }
        svg.push_str("'/>\n");
    }
}

/// Round tick positions covering `range`, roughly five of them.
fn ticks(range: AxisRange) -> Vec<f64> {
    let width = range.width();
    if !(width > 0.0) {
        return vec![range.start];
    }
    let raw = width / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        r if r < 1.5 => magnitude,
        r if r < 3.5 => 2.0 * magnitude,
        r if r < 7.5 => 5.0 * magnitude,
        _ => 10.0 * magnitude,
    };
    let first = (range.start / step).ceil() as i64;
    let last = (range.end / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

fn format_tick(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorTable;
    use crate::data::loader::parse_spt;

    fn session() -> Session {
        let record = parse_spt(
            "banner\n1 2 3 4 30 0.2 7 8 9 10 0.0\nFreq Tm Tc co2 h2o\n\
             6220 0.9 0.8 0.99 0.97\n6221 0.7 0.7 0.98 0.96\n6222 0.6 0.5 0.97 0.95\n",
        )
        .unwrap();
        let colors = ColorTable::from_json(r#"{"co2": "red", "h2o": "blue"}"#).unwrap();
        Session::new("pa20040721saaaaa.043_6220", record, &colors)
    }

    #[test]
    fn default_folder_snapshot_name() {
        let path = snapshot_path(Path::new("/out"), "pa2004.043", None);
        assert_eq!(path, PathBuf::from("/out/pa2004.043.html"));
    }

    #[test]
    fn custom_folder_adds_parent_suffix() {
        let custom = Path::new("/data/parkfalls/spectra");
        assert_eq!(snapshot_suffix(Some(custom)).as_deref(), Some("parkfalls"));
        let path = snapshot_path(Path::new("/out"), "pa2004.043", Some(custom));
        assert_eq!(path, PathBuf::from("/out/pa2004.043_parkfalls.html"));
    }

    #[test]
    fn root_custom_folder_has_no_suffix() {
        assert_eq!(snapshot_suffix(Some(Path::new("/spectra"))), None);
    }

    #[test]
    fn title_keeps_head_and_tail() {
        assert_eq!(document_title("pa20040721saaaaa.043_6220"), "pa20040721sa220");
        assert_eq!(document_title("abc"), "abcabc");
    }

    #[test]
    fn snapshot_contains_every_curve_and_control() {
        let session = session();
        let html = render_snapshot(&session, "parkfalls");

        assert!(html.contains("<title>pa20040721sa220</title>"));
        assert!(html.contains("<div class='ext'>parkfalls</div>"));
        for i in 0..session.curves.len() {
            assert!(html.contains(&format!("id='curve-{i}'")));
            assert!(html.contains(&format!("data-curve='{i}'")));
        }
        assert!(html.contains("stroke='#ff0000'"));
        assert!(html.contains("stroke='#7fff00'"));
        assert!(html.contains("Hide all lines"));
        assert!(html.contains("RMSresid="));
    }

    #[test]
    fn writes_snapshot_to_disk() {
        let dir = std::env::temp_dir().join(format!("ggg_spectra_export_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_snapshot(&dir, &session(), None).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(path.file_name().unwrap(), "pa20040721saaaaa.043_6220.html");
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let err = write_snapshot(Path::new("/definitely/not/here"), &session(), None);
        assert!(err.is_err());
    }

    #[test]
    fn ticks_are_round() {
        assert_eq!(ticks(AxisRange::new(-3.0, 3.0)), vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(format_tick(0.2), "0.2");
        assert_eq!(format_tick(6220.0), "6220");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    }
}
