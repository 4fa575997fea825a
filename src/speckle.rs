//! Local speckle statistics: block-wise contrast and autocorrelation
//! grain size

use std::ops::Deref;

use ndarray::{s, Array2};
use rustfft::num_complex::Complex;

use crate::fourier::{fft2, fftshift, ifft2};

// Guards the std/mean ratio in low-signal blocks
const CONTRAST_EPSILON: f64 = 1e-8;
// Guards the autocorrelation peak normalization
const PEAK_EPSILON: f64 = 1e-8;

/// Local speckle contrast C = σ/μ over non-overlapping blocks
///
/// The map is piecewise constant over the block tiles and zero wherever
/// the block mean falls below the validity threshold. Trailing tiles at
/// the border are dropped, not processed.
#[derive(Debug)]
pub struct ContrastMap(Array2<f64>);
impl Deref for ContrastMap {
    type Target = Array2<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ContrastMap {
    pub fn new(image: &Array2<f64>, block: usize, min_mean: f64) -> Self {
        let (h, w) = image.dim();
        let mut map = Array2::zeros((h, w));
        if block == 0 {
            return Self(map);
        }
        for y in (0..h.saturating_sub(block)).step_by(block) {
            for x in (0..w.saturating_sub(block)).step_by(block) {
                let patch = image.slice(s![y..y + block, x..x + block]);
                let mean = patch.mean().unwrap_or_default();
                if mean > min_mean {
                    let var = patch.mapv(|v| (v - mean).powi(2)).mean().unwrap_or_default();
                    map.slice_mut(s![y..y + block, x..x + block])
                        .fill(var.sqrt() / (mean + CONTRAST_EPSILON));
                }
            }
        }
        Self(map)
    }
    /// Arithmetic mean over the strictly positive map entries, NaN when
    /// no block is valid
    pub fn valid_mean(&self) -> f64 {
        let (sum, n) = self
            .0
            .iter()
            .filter(|&&c| c > 0f64)
            .fold((0f64, 0usize), |(sum, n), &c| (sum + c, n + 1));
        if n == 0 {
            f64::NAN
        } else {
            sum / n as f64
        }
    }
}

/// Speckle grain size estimate from the autocorrelation central lobe
#[derive(Debug, Clone)]
pub struct GrainEstimate {
    /// peak-normalized autocorrelation sampled along the central row,
    /// zero lag at the middle sample
    pub center_line: Vec<f64>,
    /// full width at half maximum [pixels]; NaN when the half-maximum
    /// crossing cannot be bracketed
    pub fwhm_px: f64,
}

/// Measures the speckle grain size on a centered square crop
///
/// The crop (clamped to the image bounds) is mean-subtracted and
/// autocorrelated; the FWHM of the central lobe along the horizontal
/// axis is the model-free grain size estimate.
pub fn grain_size(image: &Array2<f64>, crop_size: usize) -> GrainEstimate {
    let (h, w) = image.dim();
    let (cy, cx) = (h / 2, w / 2);
    let half = crop_size / 2;
    let y0 = cy.saturating_sub(half);
    let y1 = (cy + half).min(h);
    let x0 = cx.saturating_sub(half);
    let x1 = (cx + half).min(w);
    let mut crop = image.slice(s![y0..y1, x0..x1]).to_owned();
    if crop.is_empty() {
        return GrainEstimate {
            center_line: Vec::new(),
            fwhm_px: f64::NAN,
        };
    }
    let mean = crop.mean().unwrap_or_default();
    crop.mapv_inplace(|v| v - mean);

    let surface = autocorrelate(&crop);
    let center_line = surface.row(surface.nrows() / 2).to_vec();
    let fwhm_px = half_max_span(&center_line);
    GrainEstimate {
        center_line,
        fwhm_px,
    }
}

/// Full 2-D linear autocorrelation (zero-fill boundary) of a patch,
/// normalized so its peak is 1
///
/// Computed through the FFT of the zero-padded patch: the inverse
/// transform of the power spectrum over a (2h-1, 2w-1) grid equals the
/// direct linear correlation, with the zero lag shifted to the center.
pub fn autocorrelate(patch: &Array2<f64>) -> Array2<f64> {
    let (h, w) = patch.dim();
    if h == 0 || w == 0 {
        return Array2::zeros((0, 0));
    }
    let mut padded = Array2::zeros((2 * h - 1, 2 * w - 1));
    padded.slice_mut(s![..h, ..w]).assign(patch);
    let mut spectrum = fft2(&padded);
    spectrum.mapv_inplace(|c| Complex::new(c.norm_sqr(), 0f64));
    let surface = fftshift(&ifft2(spectrum)).mapv(|c| c.re);
    let peak = surface.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    surface.mapv(|v| v / (peak + PEAK_EPSILON))
}

/// Pixel span between the first and the last sample at or above half
/// maximum, NaN when fewer than two samples qualify
pub fn half_max_span(line: &[f64]) -> f64 {
    let mut above = line
        .iter()
        .enumerate()
        .filter(|(_, &v)| v >= 0.5)
        .map(|(i, _)| i);
    match (above.next(), above.last()) {
        (Some(first), Some(last)) => (last - first) as f64,
        _ => f64::NAN,
    }
}
