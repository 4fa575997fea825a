use serde::{Deserialize, Serialize};

// Guards the inverse speckle relation against a vanishing grain size
const APERTURE_EPSILON: f64 = 1e-12;

/// Physical constants of the optical bench, fixed for an analysis run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpticalSetup {
    /// laser wavelength [m]
    pub wavelength_m: f64,
    /// aperture/lens to observation plane distance [m]
    pub z_m: f64,
    /// observation plane sampling [m/pixel]
    pub pixel_size_m: f64,
}
impl Default for OpticalSetup {
    fn default() -> Self {
        // 532nm green laser, 1m to the wall, 0.1mm per pixel on the wall
        Self {
            wavelength_m: 532e-9,
            z_m: 1f64,
            pixel_size_m: 1e-4,
        }
    }
}
impl OpticalSetup {
    /// Effective aperture diameter [m] from the speckle grain FWHM [pixels]
    ///
    /// Classic speckle relation for near-plane wave illumination,
    /// δx ≈ λ z / D_eff, solved for D_eff with δx the grain FWHM scaled
    /// to meters. A closed-form point estimate, not a fit; a NaN grain
    /// size propagates to a NaN diameter.
    pub fn effective_aperture_from_speckle(&self, fwhm_px: f64) -> f64 {
        if fwhm_px.is_nan() {
            return f64::NAN;
        }
        let delta_x = fwhm_px * self.pixel_size_m;
        self.wavelength_m * self.z_m / (delta_x + APERTURE_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_grain_size_propagates() {
        let setup = OpticalSetup::default();
        assert!(setup.effective_aperture_from_speckle(f64::NAN).is_nan());
    }

    #[test]
    fn vanishing_grain_size_stays_finite() {
        let setup = OpticalSetup::default();
        let d = setup.effective_aperture_from_speckle(0f64);
        assert!(d.is_finite());
        // the epsilon denominator takes over: 532e-9 * 1 / 1e-12
        assert!((d - 5.32e5).abs() < 1f64);
    }

    #[test]
    fn aperture_scales_inversely_with_grain_size() {
        let setup = OpticalSetup::default();
        let d10 = setup.effective_aperture_from_speckle(10f64);
        let d20 = setup.effective_aperture_from_speckle(20f64);
        assert!((d10 / d20 - 2f64).abs() < 1e-6);
        // 10px at 0.1mm/px: D = 532e-9 * 1 / 1e-3
        assert!((d10 - 5.32e-4).abs() < 1e-9);
    }
}
