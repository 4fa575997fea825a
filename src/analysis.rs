//! Per-image analysis pipeline and run-level reporting

use std::{collections::BTreeMap, path::Path};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geometry::{self, MaskedImage},
    metrics::OpticalSetup,
    radial::{ProfileError, RadialProfile},
    speckle::{self, ContrastMap, GrainEstimate},
    spectral,
};
type Result<T> = std::result::Result<T, Error>;

/// Per-run analysis settings
///
/// The physical constants are fixed per run, not per image; the block,
/// crop and mask sizes are the pipeline's only tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// saturated core mask radius [pixels]
    pub core_radius: f64,
    /// speckle contrast block size [pixels]
    pub block: usize,
    /// minimum block mean intensity for a valid contrast estimate
    pub min_mean: f64,
    /// autocorrelation crop size [pixels]
    pub crop_size: usize,
    /// optical bench constants
    pub setup: OpticalSetup,
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            core_radius: 10f64,
            block: 24,
            min_mean: 0.02,
            crop_size: 256,
            setup: Default::default(),
        }
    }
}
impl AnalysisConfig {
    pub fn core_radius(self, core_radius: f64) -> Self {
        Self {
            core_radius,
            ..self
        }
    }
    pub fn block(self, block: usize) -> Self {
        Self { block, ..self }
    }
    pub fn min_mean(self, min_mean: f64) -> Self {
        Self { min_mean, ..self }
    }
    pub fn crop_size(self, crop_size: usize) -> Self {
        Self { crop_size, ..self }
    }
    pub fn setup(self, setup: OpticalSetup) -> Self {
        Self { setup, ..self }
    }
    /// Runs the full pipeline on one normalized intensity image
    ///
    /// Masking feeds the radial profile and the Fourier fingerprint;
    /// the speckle statistics run on the unmasked image (the saturated
    /// core barely moves the block statistics). A fully dark masked
    /// image degrades the radial products to `None` instead of aborting
    /// the remaining stages.
    pub fn analyze(&self, image: &Array2<f64>) -> Result<ImageAnalysis> {
        let masked = geometry::center_and_mask(image, self.core_radius)?;
        let radial = match RadialProfile::from_masked(&masked) {
            Ok(profile) => {
                let encircled_energy = profile.encircled_energy();
                let half_power_radius = profile.half_power_radius();
                Some(RadialAnalysis {
                    profile,
                    encircled_energy,
                    half_power_radius,
                })
            }
            Err(ProfileError::EmptyProfile) => {
                log::warn!("empty radial profile: the masked image holds no signal");
                None
            }
        };
        let fingerprint = spectral::fft_fingerprint(&masked.image);
        let contrast = ContrastMap::new(image, self.block, self.min_mean);
        let grain = speckle::grain_size(image, self.crop_size);
        let summary = SpeckleSummary {
            mean_contrast: contrast.valid_mean(),
            grain_fwhm_px: grain.fwhm_px,
            effective_aperture_m: self.setup.effective_aperture_from_speckle(grain.fwhm_px),
        };
        Ok(ImageAnalysis {
            masked,
            radial,
            fingerprint,
            contrast,
            grain,
            summary,
        })
    }
}

/// Radial products of one image
#[derive(Debug)]
pub struct RadialAnalysis {
    pub profile: RadialProfile,
    pub encircled_energy: Vec<f64>,
    pub half_power_radius: usize,
}

/// Full analysis products of one image
#[derive(Debug)]
pub struct ImageAnalysis {
    pub masked: MaskedImage,
    /// `None` when the masked image holds no positive sample
    pub radial: Option<RadialAnalysis>,
    pub fingerprint: Array2<f64>,
    pub contrast: ContrastMap,
    pub grain: GrainEstimate,
    pub summary: SpeckleSummary,
}

/// Reportable per-image figures
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpeckleSummary {
    /// mean σ/μ over the valid contrast blocks
    pub mean_contrast: f64,
    /// speckle grain FWHM [pixels]
    pub grain_fwhm_px: f64,
    /// effective aperture diameter [m]
    pub effective_aperture_m: f64,
}

/// Per-image report, ordered by image name
#[derive(Debug, Default)]
pub struct Summary(BTreeMap<String, SpeckleSummary>);
impl Summary {
    pub fn insert(&mut self, name: impl ToString, summary: SpeckleSummary) {
        self.0.insert(name.to_string(), summary);
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpeckleSummary)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Prints the summary table to the console
    pub fn print(&self) {
        println!("=== Speckle summary ===");
        for (name, summary) in self.iter() {
            println!(
                "{:15} : mean C = {:5.2}, FWHM = {:6.1} px, D_eff = {:.3e} m",
                name,
                summary.mean_contrast,
                summary.grain_fwhm_px,
                summary.effective_aperture_m
            );
        }
    }
    /// Saves the summary table to a CSV file, one row per image
    pub fn to_csv<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(filename).map_err(Error::Csv)?;
        wtr.write_record([
            "Image",
            "Mean contrast",
            "Grain FWHM [px]",
            "Effective aperture [m]",
        ])
        .map_err(Error::Csv)?;
        for (name, summary) in self.iter() {
            wtr.write_record([
                name.to_string(),
                format!("{}", summary.mean_contrast),
                format!("{}", summary.grain_fwhm_px),
                format!("{}", summary.effective_aperture_m),
            ])
            .map_err(Error::Csv)?;
        }
        Ok(())
    }
}
impl FromIterator<(String, SpeckleSummary)> for Summary {
    fn from_iter<T: IntoIterator<Item = (String, SpeckleSummary)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_pixel_image() -> Array2<f64> {
        let mut image = Array2::from_elem((64, 64), 0.01);
        image[(32, 32)] = 1f64;
        image
    }

    #[test]
    fn hot_pixel_end_to_end() {
        let analysis = AnalysisConfig::default()
            .core_radius(2f64)
            .crop_size(32)
            .analyze(&hot_pixel_image())
            .unwrap();
        assert_eq!(analysis.masked.image[(32, 32)], 0f64);
        let radial = analysis.radial.expect("background should survive the mask");
        assert!((radial.encircled_energy.last().unwrap() - 1f64).abs() < 1e-6);
        assert!(radial.half_power_radius > 0);
        assert_eq!(analysis.fingerprint.dim(), (64, 64));
    }

    #[test]
    fn all_zero_image_degrades_without_panicking() {
        let analysis = AnalysisConfig::default()
            .analyze(&Array2::zeros((64, 64)))
            .unwrap();
        assert!(analysis.radial.is_none());
        assert!(analysis.summary.mean_contrast.is_nan());
        assert!(analysis.summary.grain_fwhm_px.is_nan());
        assert!(analysis.summary.effective_aperture_m.is_nan());
    }

    #[test]
    fn summary_is_ordered_by_name() {
        let record = SpeckleSummary {
            mean_contrast: 0.5,
            grain_fwhm_px: 12f64,
            effective_aperture_m: 4.4e-5,
        };
        let mut summary = Summary::default();
        summary.insert("lens_convex", record);
        summary.insert("aperture_only", record);
        summary.insert("lens_planar", record);
        let names: Vec<_> = summary.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["aperture_only", "lens_convex", "lens_planar"]);
    }

    #[test]
    fn summary_csv_has_one_row_per_image() {
        let record = SpeckleSummary {
            mean_contrast: 0.5,
            grain_fwhm_px: 12f64,
            effective_aperture_m: 4.4e-5,
        };
        let mut summary = Summary::default();
        summary.insert("a", record);
        summary.insert("b", record);
        let path = std::env::temp_dir().join("speckle-metrics-summary.csv");
        summary.to_csv(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }
}
