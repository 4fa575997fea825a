//! Radial profile charts (feature `plot`)

use std::{collections::BTreeMap, path::Path};

use plotters::prelude::*;

use crate::radial::RadialProfile;

// Floors the log scale below any populated bin
const LOG_FLOOR: f64 = 1e-8;

/// Log-scale radial intensity chart, one curve per image
pub fn plot_radial_profiles<P: AsRef<Path>>(profiles: &BTreeMap<String, RadialProfile>, path: P) {
    if profiles.is_empty() {
        return;
    }
    let plot = SVGBackend::new(path.as_ref(), (768, 512)).into_drawing_area();
    plot.fill(&WHITE).unwrap();

    let r_max = profiles.values().map(|p| p.len()).max().unwrap() as f64;
    let top = profiles
        .values()
        .flat_map(|p| p.iter())
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(LOG_FLOOR * 10f64);
    let mut chart = ChartBuilder::on(&plot)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(0f64..r_max, (LOG_FLOOR..top * 1.1).log_scale())
        .unwrap();
    chart
        .configure_mesh()
        .x_desc("Radius [pixels]")
        .y_desc("Mean intensity [a.u.]")
        .draw()
        .unwrap();

    let mut colors = colorous::TABLEAU10.iter().cycle();

    for (name, profile) in profiles.iter() {
        let color = colors.next().unwrap();
        let rgb = RGBColor(color.r, color.g, color.b);
        chart
            .draw_series(LineSeries::new(
                profile
                    .iter()
                    .enumerate()
                    .map(|(r, &value)| (r as f64, value.max(LOG_FLOOR))),
                &rgb,
            ))
            .unwrap()
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .unwrap();
}

/// Autocorrelation center-line chart with the half-maximum level
pub fn plot_autocorrelation<P: AsRef<Path>>(center_line: &[f64], fwhm_px: f64, path: P) {
    if center_line.is_empty() {
        return;
    }
    let plot = SVGBackend::new(path.as_ref(), (768, 512)).into_drawing_area();
    plot.fill(&WHITE).unwrap();

    let half = (center_line.len() / 2) as f64;
    let low = center_line.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut chart = ChartBuilder::on(&plot)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .caption(
            format!("FWHM = {:.1} px", fwhm_px),
            ("sans-serif", 20),
        )
        .build_cartesian_2d(-half..half, low.min(0f64)..1.05f64)
        .unwrap();
    chart
        .configure_mesh()
        .x_desc("Lag [pixels]")
        .y_desc("Normalized autocorrelation")
        .draw()
        .unwrap();

    chart
        .draw_series(LineSeries::new(
            center_line
                .iter()
                .enumerate()
                .map(|(i, &value)| (i as f64 - half, value)),
            &BLUE,
        ))
        .unwrap();
    chart
        .draw_series(LineSeries::new(
            [(-half, 0.5), (half, 0.5)],
            &RED,
        ))
        .unwrap();
}
