use ndarray::Array2;

use crate::fourier::{fft2, fftshift, hann};

// Compresses the dynamic range of the magnitude spectrum
const LOG_EPSILON: f64 = 1e-3;

/// Log-magnitude centered 2-D Fourier spectrum of a masked intensity image
///
/// The image is tapered by a separable Hann window before the transform;
/// without it the hard edges of the core mask and of the frame dominate
/// the spectrum with leakage. The zero-frequency bin is shifted to the
/// array center and the magnitude is log10-compressed.
pub fn fft_fingerprint(masked: &Array2<f64>) -> Array2<f64> {
    let (h, w) = masked.dim();
    let win_y = hann(h);
    let win_x = hann(w);
    let windowed = Array2::from_shape_fn((h, w), |(y, x)| masked[(y, x)] * win_y[y] * win_x[x]);
    fftshift(&fft2(&windowed)).mapv(|c| (c.norm() + LOG_EPSILON).log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_shape_matches_the_input() {
        let image = Array2::from_elem((32, 48), 0.5);
        let fingerprint = fft_fingerprint(&image);
        assert_eq!(fingerprint.dim(), (32, 48));
    }

    #[test]
    fn dc_bin_dominates_a_smooth_image() {
        let image = Array2::from_elem((32, 32), 1f64);
        let fingerprint = fft_fingerprint(&image);
        let peak = fingerprint
            .indexed_iter()
            .fold(
                ((0, 0), f64::NEG_INFINITY),
                |(at, max), (yx, &v)| if v > max { (yx, v) } else { (at, max) },
            );
        assert_eq!(peak.0, (16, 16));
    }

    #[test]
    fn dark_image_fingerprint_is_the_log_floor() {
        let image = Array2::zeros((16, 16));
        let fingerprint = fft_fingerprint(&image);
        for &v in fingerprint.iter() {
            assert!((v - (-3f64)).abs() < 1e-9);
        }
    }
}
