//! Colormapped PNG export of the array-valued analysis products

use std::path::Path;

use ndarray::Array2;

/// Normalizes the samples to the array extrema and applies a colormap
fn to_rgb(data: &Array2<f64>, gradient: &colorous::Gradient) -> Vec<u8> {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    data.iter()
        .flat_map(|&value| {
            let t = if range > 0f64 {
                (value - min) / range
            } else {
                0.5
            };
            let color = gradient.eval_continuous(t);
            [color.r, color.g, color.b]
        })
        .collect()
}

/// Saves an array as a colormapped PNG image
///
/// The spectral fingerprint reads best with [`colorous::GREYS`] and the
/// contrast map with [`colorous::VIRIDIS`].
pub fn save_heatmap<P: AsRef<Path>>(
    data: &Array2<f64>,
    gradient: &colorous::Gradient,
    path: P,
) -> image::ImageResult<()> {
    let (h, w) = data.dim();
    image::save_buffer(
        path,
        &to_rgb(data, gradient),
        w as u32,
        h as u32,
        image::ExtendedColorType::Rgb8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_buffer_covers_every_pixel() {
        let data = Array2::from_shape_fn((4, 6), |(y, x)| (y * 6 + x) as f64);
        let rgb = to_rgb(&data, &colorous::VIRIDIS);
        assert_eq!(rgb.len(), 4 * 6 * 3);
    }

    #[test]
    fn flat_array_maps_to_the_colormap_midpoint() {
        let data = Array2::from_elem((2, 2), 1f64);
        let rgb = to_rgb(&data, &colorous::GREYS);
        let mid = colorous::GREYS.eval_continuous(0.5);
        assert_eq!(&rgb[..3], &[mid.r, mid.g, mid.b]);
    }
}
