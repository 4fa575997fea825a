use ndarray::{Array2, Zip};

#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("cannot locate the intensity peak of an empty image")]
    EmptyImage,
}
type Result<T> = std::result::Result<T, GeometryError>;

/// Intensity peak location in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Center {
    pub x: usize,
    pub y: usize,
}

/// Intensity image with the saturated core zeroed out, along with the
/// geometry it was derived from
#[derive(Debug)]
pub struct MaskedImage {
    /// intensity with all samples at radius <= core_radius set to zero
    pub image: Array2<f64>,
    /// Euclidean pixel distance to the peak, same shape as the image
    pub radius: Array2<f64>,
    /// the intensity peak the radii are measured from
    pub center: Center,
}

/// Returns the location of the brightest pixel
///
/// Ties are resolved to the first maximum in row-major order
pub fn peak_center(image: &Array2<f64>) -> Result<Center> {
    let mut peak: Option<(Center, f64)> = None;
    for ((y, x), &value) in image.indexed_iter() {
        match peak {
            Some((_, max)) if value <= max => (),
            _ => peak = Some((Center { x, y }, value)),
        }
    }
    peak.map(|(center, _)| center)
        .ok_or(GeometryError::EmptyImage)
}

/// Euclidean pixel distance of every pixel to `center`
pub fn radius_field(shape: (usize, usize), center: Center) -> Array2<f64> {
    Array2::from_shape_fn(shape, |(y, x)| {
        let dx = x as f64 - center.x as f64;
        let dy = y as f64 - center.y as f64;
        (dx * dx + dy * dy).sqrt()
    })
}

/// Locates the intensity peak and zeroes the central disk of radius
/// `core_radius` around it
///
/// The saturated core would otherwise dominate both the radial profile
/// and the Fourier fingerprint. The input image is left untouched.
pub fn center_and_mask(image: &Array2<f64>, core_radius: f64) -> Result<MaskedImage> {
    let center = peak_center(image)?;
    let radius = radius_field(image.dim(), center);
    let mut masked = image.clone();
    Zip::from(&mut masked).and(&radius).for_each(|i, &r| {
        if r <= core_radius {
            *i = 0f64;
        }
    });
    Ok(MaskedImage {
        image: masked,
        radius,
        center,
    })
}
