/*!
# Laser speckle image characterization

Extracts four independent physical fingerprints from a single grayscale
intensity image of a laser-illuminated setup (pinhole, convex lens,
planar lens):

- azimuthally averaged radial intensity, encircled energy and the
  half-power radius ([`RadialProfile`]),
- the log-magnitude 2-D Fourier fingerprint ([`spectral::fft_fingerprint`]),
- local speckle contrast over spatial blocks ([`ContrastMap`]),
- speckle grain size from the autocorrelation central lobe
  ([`speckle::grain_size`]), converted to an effective aperture diameter
  through the classic speckle relation ([`OpticalSetup`]).

Every stage is a pure function of its inputs plus the physical constants;
images are independent and may be analyzed in parallel.

## Usage

```rust,no_run
use speckle_metrics::{AnalysisConfig, ImageLoader};

let image = ImageLoader::new("images/noLensPinhole.jpg").load()?;
let analysis = AnalysisConfig::default().core_radius(12f64).analyze(&image)?;
println!(
    "FWHM: {:.1}px , D_eff: {:.3e}m",
    analysis.summary.grain_fwhm_px, analysis.summary.effective_aperture_m
);
# Ok::<(), speckle_metrics::Error>(())
```
*/

mod analysis;
mod error;
pub mod fourier;
pub mod geometry;
pub mod loader;
pub mod metrics;
#[cfg(feature = "plot")]
pub mod plot;
pub mod radial;
pub mod render;
pub mod speckle;
pub mod spectral;

pub use analysis::{AnalysisConfig, ImageAnalysis, RadialAnalysis, SpeckleSummary, Summary};
pub use error::Error;
pub use geometry::{center_and_mask, Center, MaskedImage};
pub use loader::ImageLoader;
pub use metrics::OpticalSetup;
pub use radial::RadialProfile;
pub use speckle::{ContrastMap, GrainEstimate};
