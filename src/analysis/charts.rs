use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::statistics::{equal_width_histogram, unit_histogram, Bucket};
use crate::error::{Error, Result};
use crate::models::{short_repo_name, DatasetStats};

const PALETTE: [RGBColor; 5] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(243, 156, 18),
    RGBColor(155, 89, 182),
];

const LOC_BUCKETS: usize = 20;
const FONT: &str = "sans-serif";

fn chart_err<E: Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}

/// Renders the four dataset figures as SVG files.
pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn render_all(&self, stats: &DatasetStats) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        Ok(vec![
            self.prs_per_repo(stats)?,
            self.comments_distribution(stats)?,
            self.loc_distribution(stats)?,
            self.review_types(stats)?,
        ])
    }

    pub fn prs_per_repo(&self, stats: &DatasetStats) -> Result<PathBuf> {
        let path = self.output_dir.join("prs_per_repo.svg");
        let bars: Vec<(String, u32)> = stats
            .by_repo
            .iter()
            .map(|(repo, s)| (short_repo_name(repo).to_string(), s.count as u32))
            .collect();

        draw_bars(&path, &bars)?;
        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }

    pub fn comments_distribution(&self, stats: &DatasetStats) -> Result<PathBuf> {
        let path = self.output_dir.join("comments_distribution.svg");
        let buckets = unit_histogram(&stats.review_counts)?;
        let mean = stats.avg_reviews_per_pr;

        draw_histogram(
            &path,
            &buckets,
            HistogramLabels {
                title: "Distribution of Review Comments per Pull Request",
                x_desc: "Number of Reviews",
                mean_label: format!("Mean: {:.1}", mean),
            },
            PALETTE[0],
            mean,
        )?;
        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }

    pub fn loc_distribution(&self, stats: &DatasetStats) -> Result<PathBuf> {
        let path = self.output_dir.join("loc_distribution.svg");
        let buckets = equal_width_histogram(&stats.loc_counts, LOC_BUCKETS)?;
        let mean = stats.avg_loc_per_pr;

        draw_histogram(
            &path,
            &buckets,
            HistogramLabels {
                title: "Distribution of Lines Changed per Pull Request",
                x_desc: "Lines Changed (Added + Deleted)",
                mean_label: format!("Mean: {:.0}", mean),
            },
            PALETTE[2],
            mean,
        )?;
        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }

    pub fn review_types(&self, stats: &DatasetStats) -> Result<PathBuf> {
        let path = self.output_dir.join("review_types.svg");
        let slices = [
            ("Inline Comments", stats.inline_comments, PALETTE[0]),
            ("General Reviews", stats.general_reviews, PALETTE[1]),
        ];

        draw_pie(&path, &slices)?;
        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }
}

fn draw_bars(path: &Path, bars: &[(String, u32)]) -> Result<()> {
    let n = bars.len().max(1) as u32;
    let top = bars.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let y_max = top + top / 5 + 1;

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Pull Requests Collected per Repository", (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0u32..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Repository")
        .y_desc("Number of Pull Requests")
        .axis_desc_style((FONT, 18))
        .draw()
        .map_err(chart_err)?;

    for (i, (_, count)) in bars.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.mix(0.8).filled())
                    .margin(25)
                    .data(std::iter::once((i as u32, *count))),
            )
            .map_err(chart_err)?;
        chart
            .draw_series(std::iter::once(Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(i as u32), *count),
                (FONT, 18)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Bottom)),
            )))
            .map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_pie(path: &Path, slices: &[(&str, usize, RGBColor)]) -> Result<()> {
    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let area = root
        .titled("Review Type Distribution", (FONT, 28))
        .map_err(chart_err)?;

    let total: usize = slices.iter().map(|(_, v, _)| v).sum();

    let (w, h) = area.dim_in_pixel();
    let center = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = w.min(h) as f64 * 0.36;
    let at = |angle: f64, distance: f64| -> (i32, i32) {
        (
            (center.0 + distance * angle.cos()).round() as i32,
            (center.1 - distance * angle.sin()).round() as i32,
        )
    };

    if total == 0 {
        area.draw(&Text::new(
            "No reviews collected",
            at(0.0, 0.0),
            (FONT, 22)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(chart_err)?;
    }

    // Counter-clockwise from twelve o'clock, each wedge pulled out slightly.
    let mut start = FRAC_PI_2;
    for (label, value, color) in slices.iter().filter(|(_, v, _)| *v > 0) {
        let share = *value as f64 / total as f64;
        let sweep = share * 2.0 * PI;
        let mid = start + sweep / 2.0;
        let explode = radius * 0.05;
        let origin = (explode * mid.cos(), explode * mid.sin());

        let steps = ((sweep / (PI / 90.0)).ceil() as usize).max(2);
        let mut points = vec![at(mid, explode)];
        points.extend((0..=steps).map(|k| {
            let angle = start + sweep * k as f64 / steps as f64;
            let (x, y) = (radius * angle.cos() + origin.0, radius * angle.sin() + origin.1);
            ((center.0 + x).round() as i32, (center.1 - y).round() as i32)
        }));

        area.draw(&Polygon::new(points, color.filled()))
            .map_err(chart_err)?;
        area.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            at(mid, radius * 0.6),
            (FONT, 22)
                .into_font()
                .color(&WHITE)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(chart_err)?;
        area.draw(&Text::new(
            label.to_string(),
            at(mid, radius * 1.18),
            (FONT, 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(chart_err)?;

        start += sweep;
    }

    root.present().map_err(chart_err)?;
    Ok(())
}

struct HistogramLabels {
    title: &'static str,
    x_desc: &'static str,
    mean_label: String,
}

fn draw_histogram(
    path: &Path,
    buckets: &[Bucket],
    labels: HistogramLabels,
    color: RGBColor,
    mean: f64,
) -> Result<()> {
    let x_min = buckets.first().map(|b| b.lower).unwrap_or(0.0);
    let x_max = buckets.last().map(|b| b.upper).unwrap_or(1.0);
    let top = buckets.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let y_max = top * 1.15 + 1.0;

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(labels.x_desc)
        .y_desc("Number of Pull Requests")
        .axis_desc_style((FONT, 18))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(buckets.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], color.mix(0.7).filled())
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(buckets.iter().filter(|b| b.count > 0).map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BLACK.stroke_width(1))
        }))
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            vec![(mean, 0.0), (mean, y_max)],
            RED.stroke_width(3),
        ))
        .map_err(chart_err)?
        .label(labels.mean_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((FONT, 16))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
