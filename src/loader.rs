use std::path::{Path, PathBuf};

use ndarray::Array2;

#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    #[error("failed to read the image file {1:?}")]
    Decode(#[source] image::ImageError, PathBuf),
    #[error("image {0:?} has no pixels")]
    Empty(PathBuf),
}
type Result<T> = std::result::Result<T, LoaderError>;

// Guards the max scaling of a flat image
const NORM_EPSILON: f64 = 1e-8;

/// Rescales the samples to [0,1]: minimum subtracted, maximum scaled
pub fn normalize(mut image: Array2<f64>) -> Array2<f64> {
    let min = image.iter().copied().fold(f64::INFINITY, f64::min);
    image.mapv_inplace(|v| v - min);
    let max = image.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    image.mapv_inplace(|v| v / (max + NORM_EPSILON));
    image
}

/// Grayscale intensity image loader
///
/// Decodes an image file, converts it to grayscale and normalizes the
/// samples to [0,1]. A missing or unreadable file is the one fatal
/// condition of the pipeline and is surfaced before any numeric stage
/// runs.
#[derive(Debug)]
pub struct ImageLoader {
    path: PathBuf,
}
impl ImageLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
    pub fn load(self) -> Result<Array2<f64>> {
        let gray = image::open(&self.path)
            .map_err(|e| LoaderError::Decode(e, self.path.clone()))?
            .to_luma8();
        let (w, h) = gray.dimensions();
        if w == 0 || h == 0 {
            return Err(LoaderError::Empty(self.path));
        }
        log::debug!("loaded {:?}: {}x{}", self.path, w, h);
        let image = Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
            gray.get_pixel(x as u32, y as u32)[0] as f64
        });
        Ok(normalize(image))
    }
}
