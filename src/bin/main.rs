use std::{collections::BTreeMap, fs::create_dir_all, path::PathBuf};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use speckle_metrics::{render, AnalysisConfig, ImageAnalysis, ImageLoader, OpticalSetup, Summary};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "speckle-metrics",
    about = "Laser speckle and radial intensity image characterization"
)]
struct Opt {
    /// Image files to analyze
    #[structopt(required = true)]
    images: Vec<PathBuf>,
    /// Saturated core mask radius [pixels]
    #[structopt(short, long, default_value = "10")]
    core_radius: f64,
    /// Speckle contrast block size [pixels]
    #[structopt(short, long, default_value = "24")]
    block: usize,
    /// Minimum block mean intensity for a valid contrast estimate
    #[structopt(long, default_value = "0.02")]
    min_mean: f64,
    /// Autocorrelation crop size [pixels]
    #[structopt(long, default_value = "256")]
    crop_size: usize,
    /// Laser wavelength [m]
    #[structopt(short, long, default_value = "532e-9")]
    wavelength: f64,
    /// Aperture/lens to observation plane distance [m]
    #[structopt(short = "z", long, default_value = "1")]
    distance: f64,
    /// Observation plane sampling [m/pixel]
    #[structopt(short, long, default_value = "1e-4")]
    pixel_size: f64,
    /// Output directory for the rendered maps and charts
    #[structopt(short, long, default_value = "out")]
    out: PathBuf,
    /// Save the summary table to a CSV file
    #[structopt(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let config = AnalysisConfig::default()
        .core_radius(opt.core_radius)
        .block(opt.block)
        .min_mean(opt.min_mean)
        .crop_size(opt.crop_size)
        .setup(OpticalSetup {
            wavelength_m: opt.wavelength,
            z_m: opt.distance,
            pixel_size_m: opt.pixel_size,
        });
    create_dir_all(&opt.out)?;

    let bar = ProgressBar::new(opt.images.len() as u64).with_style(ProgressStyle::with_template(
        "{msg} [{bar:40.cyan/blue}] {pos}/{len}",
    )?);
    bar.set_message("Analyzing");
    // images are independent of one another
    let results: Vec<(String, ImageAnalysis)> = opt
        .images
        .par_iter()
        .progress_with(bar)
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            let image = ImageLoader::new(path).load()?;
            let analysis = config.analyze(&image)?;
            render::save_heatmap(
                &analysis.fingerprint,
                &colorous::GREYS,
                opt.out.join(format!("fft_{name}.png")),
            )?;
            render::save_heatmap(
                &analysis.contrast,
                &colorous::VIRIDIS,
                opt.out.join(format!("speckleC_{name}.png")),
            )?;
            Ok((name, analysis))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut radial_profiles = BTreeMap::new();
    let summary: Summary = results
        .into_iter()
        .map(|(name, analysis)| {
            match analysis.radial {
                Some(radial) => {
                    log::info!("{}: R50 = {} px", name, radial.half_power_radius);
                    radial_profiles.insert(name.clone(), radial.profile);
                }
                None => log::warn!("{}: degenerate radial profile", name),
            }
            #[cfg(feature = "plot")]
            speckle_metrics::plot::plot_autocorrelation(
                &analysis.grain.center_line,
                analysis.grain.fwhm_px,
                opt.out.join(format!("autocorr_{name}.svg")),
            );
            (name, analysis.summary)
        })
        .collect();

    #[cfg(feature = "plot")]
    speckle_metrics::plot::plot_radial_profiles(
        &radial_profiles,
        opt.out.join("radial_profiles.svg"),
    );
    #[cfg(not(feature = "plot"))]
    let _ = radial_profiles;

    summary.print();
    if let Some(filename) = opt.csv {
        summary.to_csv(filename)?;
    }

    Ok(())
}
