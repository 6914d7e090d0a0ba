use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ggg_spectra::config::default_spectra_dir;
use ggg_spectra::data::loader::parse_spt;

/// Absorption lines per species: (centre, depth at centre).
const LINES: [(&str, &[(f64, f64)]); 3] = [
    ("co2", &[(6220.6, 0.35), (6221.4, 0.5), (6222.2, 0.45), (6223.0, 0.4)]),
    ("h2o", &[(6220.95, 0.25), (6222.75, 0.15)]),
    ("ch4", &[(6221.8, 0.12), (6223.35, 0.08)]),
];
const LINE_WIDTH: f64 = 0.04;
const XZO: f64 = 0.002;

fn species_transmittance(wn: f64, lines: &[(f64, f64)]) -> f64 {
    let tau: f64 = lines
        .iter()
        .map(|&(centre, depth)| depth * (-((wn - centre) / LINE_WIDTH).powi(2)).exp())
        .sum();
    (-tau).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let name = "zz20100101saaaaa.043_6220";
    let (start, end, n) = (6220.0, 6224.0, 400usize);

    let mut text = String::new();
    let _ = writeln!(text, " {name}   synthetic GFIT output");
    let _ = writeln!(
        text,
        "  {start:.4}  {end:.4}  0.0100  1.0000   48.125   0.350   1013.25   0.0012   0.987  0.0035   {XZO:.4}   1.0000"
    );
    let species: Vec<&str> = LINES.iter().map(|(s, _)| *s).collect();
    let _ = writeln!(text, " Freq Tm Tc Cont {}", species.join(" "));

    for i in 0..n {
        let wn = start + (end - start) * i as f64 / (n - 1) as f64;
        let per_species: Vec<f64> = LINES
            .iter()
            .map(|(_, lines)| species_transmittance(wn, lines))
            .collect();
        let cont = 0.8 + 0.02 * (wn - start);
        let calc: f64 = per_species.iter().product();
        let meas = calc + rng.gauss(0.0, 0.004);

        let _ = write!(
            text,
            " {wn:10.4} {:9.5} {:9.5} {cont:9.5}",
            (meas * (1.0 - XZO) + XZO) * cont,
            (calc * (1.0 - XZO) + XZO) * cont,
        );
        for t in &per_species {
            let _ = write!(text, " {t:9.5}");
        }
        text.push('\n');
    }

    let record = parse_spt(&text).context("generated spectrum does not parse")?;

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_spectra_dir);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;

    println!(
        "Wrote {} samples ({} species, RMS residual {:.4}%) to {}",
        record.len(),
        species.len(),
        record.rms_residual,
        path.display()
    );
    Ok(())
}
