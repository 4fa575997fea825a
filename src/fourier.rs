//! Shared 2-D Fourier utilities: separable Hann window, forward/inverse
//! transforms and the zero-frequency centering shift

use ndarray::Array2;
use rustfft::{num_complex::Complex, FftPlanner};

/// Symmetric raised-cosine (Hann) window of length `n`
pub fn hann(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1f64],
        _ => (0..n)
            .map(|i| {
                (std::f64::consts::PI * i as f64 / (n - 1) as f64)
                    .sin()
                    .powi(2)
            })
            .collect(),
    }
}

// Row pass then column pass through a scratch buffer; works for any
// memory layout
fn transform(data: &mut Array2<Complex<f64>>, forward: bool) {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return;
    }
    let mut planner = FftPlanner::new();
    let (row_fft, col_fft) = if forward {
        (planner.plan_fft_forward(w), planner.plan_fft_forward(h))
    } else {
        (planner.plan_fft_inverse(w), planner.plan_fft_inverse(h))
    };
    let mut scratch = vec![Complex::default(); w.max(h)];
    for y in 0..h {
        for (x, value) in scratch[..w].iter_mut().enumerate() {
            *value = data[(y, x)];
        }
        row_fft.process(&mut scratch[..w]);
        for (x, value) in scratch[..w].iter().enumerate() {
            data[(y, x)] = *value;
        }
    }
    for x in 0..w {
        for (y, value) in scratch[..h].iter_mut().enumerate() {
            *value = data[(y, x)];
        }
        col_fft.process(&mut scratch[..h]);
        for (y, value) in scratch[..h].iter().enumerate() {
            data[(y, x)] = *value;
        }
    }
}

/// 2-D discrete Fourier transform of a real image
pub fn fft2(image: &Array2<f64>) -> Array2<Complex<f64>> {
    let mut data = image.mapv(|v| Complex::new(v, 0f64));
    transform(&mut data, true);
    data
}

/// 2-D inverse discrete Fourier transform, scaled by 1/(h·w)
pub fn ifft2(mut spectrum: Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    transform(&mut spectrum, false);
    let (h, w) = spectrum.dim();
    let scale = 1f64 / (h * w).max(1) as f64;
    spectrum.mapv_inplace(|c| c * scale);
    spectrum
}

/// Rolls the array so the zero-frequency (or zero-lag) sample lands at
/// (h/2, w/2)
pub fn fftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h, w), |(y, x)| {
        data[((y + h - h / 2) % h, (x + w - w / 2) % w)].clone()
    })
}
