use std::ops::Deref;

use ndarray::Array2;

use crate::geometry::MaskedImage;

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("no strictly positive samples left after masking")]
    EmptyProfile,
}
type Result<T> = std::result::Result<T, ProfileError>;

// Guards against empty radius bins
const BIN_EPSILON: f64 = 1e-8;
// Guards the encircled energy normalization
const NORM_EPSILON: f64 = 1e-12;

/// Azimuthally averaged intensity, indexed by integer radius [pixels]
///
/// Bin `r` holds the mean of all strictly positive masked samples whose
/// integer-truncated distance to the center is `r`; bins without any
/// contributing pixel come out numerically small instead of undefined.
#[derive(Debug, Clone)]
pub struct RadialProfile(Vec<f64>);
impl Deref for RadialProfile {
    type Target = Vec<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl RadialProfile {
    /// Bins the masked intensity by integer radius
    ///
    /// `masked` and `radius` must have the same shape; only strictly
    /// positive samples contribute. A fully masked or fully dark image
    /// is reported as [`ProfileError::EmptyProfile`].
    pub fn new(masked: &Array2<f64>, radius: &Array2<f64>) -> Result<Self> {
        let samples: Vec<(usize, f64)> = masked
            .iter()
            .zip(radius.iter())
            .filter(|(&value, _)| value > 0f64)
            .map(|(&value, &r)| (r as usize, value))
            .collect();
        let r_max = samples
            .iter()
            .map(|(r, _)| *r)
            .max()
            .ok_or(ProfileError::EmptyProfile)?;
        let mut sum = vec![0f64; r_max + 1];
        let mut count = vec![0usize; r_max + 1];
        for (r, value) in samples {
            sum[r] += value;
            count[r] += 1;
        }
        Ok(Self(
            sum.into_iter()
                .zip(count)
                .map(|(s, n)| s / (n as f64 + BIN_EPSILON))
                .collect(),
        ))
    }
    pub fn from_masked(masked: &MaskedImage) -> Result<Self> {
        Self::new(&masked.image, &masked.radius)
    }
    /// Normalized encircled energy
    ///
    /// E\[k\] is the cumulative sum of the r-weighted profile (polar area
    /// element) up to radius k, normalized to end at 1:
    ///
    /// E(R) = ∫_0^R I(r) r dr / ∫_0^∞ I(r) r dr
    pub fn encircled_energy(&self) -> Vec<f64> {
        let mut acc = 0f64;
        let cum: Vec<f64> = self
            .0
            .iter()
            .enumerate()
            .map(|(r, value)| {
                acc += value * r as f64;
                acc
            })
            .collect();
        let total = cum.last().copied().unwrap_or_default() + NORM_EPSILON;
        cum.into_iter().map(|e| e / total).collect()
    }
    /// Radius at which the encircled energy first reaches 50%
    ///
    /// A degenerate profile that never reaches 0.5 yields index 0, which
    /// callers must treat as a degeneracy signal rather than a true
    /// half-power point.
    pub fn half_power_radius(&self) -> usize {
        self.encircled_energy()
            .iter()
            .position(|&e| e >= 0.5)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{radius_field, Center};

    fn disk_image(n: usize, center: Center, rho: f64) -> (Array2<f64>, Array2<f64>) {
        let radius = radius_field((n, n), center);
        let image = radius.mapv(|r| if r < rho { 1f64 } else { 0f64 });
        (image, radius)
    }

    #[test]
    fn uniform_disk_profile_is_flat() {
        let (image, radius) = disk_image(64, Center { x: 32, y: 32 }, 20f64);
        let profile = RadialProfile::new(&image, &radius).unwrap();
        // every populated bin averages samples of value 1
        for (r, &value) in profile.iter().enumerate() {
            if value > 0f64 {
                assert!(
                    (value - 1f64).abs() < 1e-6,
                    "bin {} deviates from 1: {}",
                    r,
                    value
                );
            }
        }
    }

    #[test]
    fn encircled_energy_is_monotone_and_ends_at_one() {
        let (image, radius) = disk_image(64, Center { x: 32, y: 32 }, 20f64);
        let profile = RadialProfile::new(&image, &radius).unwrap();
        let energy = profile.encircled_energy();
        for pair in energy.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!((energy.last().unwrap() - 1f64).abs() < 1e-6);
    }

    #[test]
    fn half_power_radius_matches_direct_energy_computation() {
        let (image, radius) = disk_image(64, Center { x: 32, y: 32 }, 20f64);
        let profile = RadialProfile::new(&image, &radius).unwrap();
        // independent cumulative computation on the synthetic profile
        let weighted: Vec<f64> = profile
            .iter()
            .enumerate()
            .map(|(r, &v)| v * r as f64)
            .collect();
        let total: f64 = weighted.iter().sum();
        let mut acc = 0f64;
        let mut expected = 0usize;
        for (r, w) in weighted.iter().enumerate() {
            acc += w;
            if acc >= 0.5 * total {
                expected = r;
                break;
            }
        }
        let r50 = profile.half_power_radius();
        assert!(
            (r50 as i64 - expected as i64).abs() <= 1,
            "R50 {} vs direct {}",
            r50,
            expected
        );
    }

    #[test]
    fn fully_masked_image_is_an_empty_profile() {
        let image = Array2::zeros((32, 32));
        let radius = radius_field((32, 32), Center { x: 16, y: 16 });
        assert!(matches!(
            RadialProfile::new(&image, &radius),
            Err(ProfileError::EmptyProfile)
        ));
    }

    #[test]
    fn hot_pixel_background_profile() {
        // uniform 0.01 background with a hot pixel; the masked core
        // leaves only background samples
        let mut image = Array2::from_elem((64, 64), 0.01);
        image[(32, 32)] = 1f64;
        let masked = crate::geometry::center_and_mask(&image, 2f64).unwrap();
        let profile = RadialProfile::from_masked(&masked).unwrap();
        for (r, &value) in profile.iter().enumerate() {
            if value > 0f64 {
                assert!(
                    (value - 0.01).abs() < 1e-6,
                    "bin {} should hold the background level: {}",
                    r,
                    value
                );
            }
        }
        let energy = profile.encircled_energy();
        assert!((energy.last().unwrap() - 1f64).abs() < 1e-6);
        assert!(profile.half_power_radius() > 0);
    }
}
