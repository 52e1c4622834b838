//! Writes a synthetic UV-Vis comparison table for trying out the viewer.
//!
//! Usage: `generate_sample [output.csv]` (default `sample_absorption.csv`).

use anyhow::{Context, Result};

/// (centre nm, width nm, peak absorption)
type Band = (f64, f64, f64);

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn absorption_at(wavelength: f64, bands: &[Band]) -> f64 {
    bands
        .iter()
        .map(|&(mu, sigma, amp)| gaussian(wavelength, mu, sigma, amp))
        .sum()
}

/// Repeatable baseline jitter in `[-amplitude, amplitude]` for sample `index`.
///
/// Each index is hashed (splitmix64 finalizer) into two uniforms whose mean
/// gives a triangular distribution centred on zero.
fn jitter(index: u64, amplitude: f64) -> f64 {
    fn mix(mut z: u64) -> u64 {
        z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
    let unit = |z: u64| (z >> 11) as f64 / (1u64 << 53) as f64;
    let a = unit(mix(2 * index));
    let b = unit(mix(2 * index + 1));
    amplitude * (a + b - 1.0)
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_absorption.csv".to_string());

    // Computed spectrum: sharp bands, 2 nm grid over 180–700 nm.
    let theoretical_bands: [Band; 3] = [(265.0, 14.0, 1.6), (340.0, 22.0, 0.9), (455.0, 30.0, 0.55)];
    let theoretical: Vec<(f64, f64)> = (0..=260)
        .map(|i| {
            let wl = 180.0 + 2.0 * i as f64;
            (wl, absorption_at(wl, &theoretical_bands))
        })
        .collect();

    // Measured spectrum: red-shifted, broadened, noisy, 1 nm grid over 190–720 nm.
    let experimental_bands: [Band; 3] = [(271.0, 18.0, 1.35), (348.0, 27.0, 0.8), (468.0, 36.0, 0.5)];
    let experimental: Vec<(f64, f64)> = (0..=530u64)
        .map(|i| {
            let wl = 190.0 + i as f64;
            let abs = absorption_at(wl, &experimental_bands) + 0.02 + jitter(i, 0.02);
            (wl, abs)
        })
        .collect();

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "theoretical_wavelength_nm",
        "theoretical_absorption",
        "experimental_wavelength_nm",
        "experimental_absorption",
    ])?;

    // The shorter theoretical columns are padded with empty cells.
    let rows = theoretical.len().max(experimental.len());
    for i in 0..rows {
        let cell = |series: &[(f64, f64)], pick: fn(&(f64, f64)) -> f64| {
            series
                .get(i)
                .map(|p| format!("{:.4}", pick(p)))
                .unwrap_or_default()
        };
        writer.write_record([
            cell(&theoretical, |p| p.0),
            cell(&theoretical, |p| p.1),
            cell(&experimental, |p| p.0),
            cell(&experimental, |p| p.1),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {} theoretical and {} experimental points to {output_path}",
        theoretical.len(),
        experimental.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_is_repeatable_and_bounded() {
        let first: Vec<f64> = (0..500).map(|i| jitter(i, 0.02)).collect();
        let again: Vec<f64> = (0..500).map(|i| jitter(i, 0.02)).collect();
        assert_eq!(first, again);
        assert!(first.iter().all(|v| v.abs() <= 0.02));
        let mean = first.iter().sum::<f64>() / first.len() as f64;
        assert!(mean.abs() < 0.003);
    }
}
