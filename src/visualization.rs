//! Visualization module: the six report charts, drawn with plotters.
//!
//! Each renderer takes already-aggregated data and returns an SVG document;
//! `write_charts` renders the full set and writes it to the output directory.
use std::f64::consts::PI;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::aggregation::{CategorySummary, Correlation, RegionSummary};
use crate::error::ReportError;
use crate::model::StoreRecord;
use crate::numfmt;
use crate::ranking::{self, Metric};

// ── Output names ────────────────────────────────────────────────────────────

pub mod chart_files {
    pub const REVENUE_BY_STORE: &str = "chart_1_revenue_by_store.svg";
    pub const CATEGORY_SHARE: &str = "chart_2_category_share.svg";
    pub const RATING_VS_REVENUE: &str = "chart_3_rating_vs_revenue.svg";
    pub const GEOGRAPHIC_MAP: &str = "chart_4_geographic_map.svg";
    pub const REGIONAL_ANALYSIS: &str = "chart_5_regional_analysis.svg";
    pub const PERFORMANCE_RANKING: &str = "chart_6_performance_ranking.svg";

    pub const ALL: [&str; 6] = [
        REVENUE_BY_STORE,
        CATEGORY_SHARE,
        RATING_VS_REVENUE,
        GEOGRAPHIC_MAP,
        REGIONAL_ANALYSIS,
        PERFORMANCE_RANKING,
    ];
}

// ── Config ──────────────────────────────────────────────────────────────────

/// Configuration for chart output.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Directory the SVG files are written to (created if absent)
    pub output_dir: PathBuf,
    /// Pixel height per store row in the horizontal bar charts
    pub bar_row_px: f64,
    /// Revenue represented by one unit of point area on the map
    pub revenue_per_point_area: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs/charts"),
            bar_row_px: 34.0,
            revenue_per_point_area: 1000.0,
        }
    }
}

/// Everything the charts draw from.
pub struct ChartInputs<'a> {
    pub records: &'a [StoreRecord],
    pub regions: &'a [RegionSummary],
    pub categories: &'a [CategorySummary],
    pub correlation: &'a Correlation,
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const FALLBACK_COLOR: RGBColor = RGBColor(127, 127, 127);

// ── Colours ─────────────────────────────────────────────────────────────────

fn palette_color(i: usize) -> RGBColor {
    let (r, g, b) = Palette99::pick(i).rgb();
    RGBColor(r, g, b)
}

/// Colour at `t` in [0, 1] along the hue arc `from..to`.
fn hue_ramp(t: f64, from: f64, to: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let (r, g, b) = HSLColor(from + (to - from) * t, 0.7, 0.5).rgb();
    RGBColor(r, g, b)
}

// violet → yellow, blue → red, red → green
const WARM_UP: (f64, f64) = (0.75, 0.15);
const COOL_TO_HOT: (f64, f64) = (0.62, 0.0);
const RED_TO_GREEN: (f64, f64) = (0.0, 0.33);

fn ramp(t: f64, arc: (f64, f64)) -> RGBColor {
    hue_ramp(t, arc.0, arc.1)
}

/// Position of item `i` among `n`, spread over [0, 1].
fn position(i: usize, n: usize) -> f64 {
    if n > 1 {
        i as f64 / (n - 1) as f64
    } else {
        0.5
    }
}

/// Fixed colour per region, assigned in first-seen order.
pub struct RegionPalette {
    entries: Vec<(String, RGBColor)>,
}

impl RegionPalette {
    pub fn new(regions: &[RegionSummary]) -> Self {
        let entries = regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.region.clone(), palette_color(i)))
            .collect();
        Self { entries }
    }

    pub fn color(&self, region: &str) -> RGBColor {
        self.entries
            .iter()
            .find(|(name, _)| name == region)
            .map_or(FALLBACK_COLOR, |(_, c)| *c)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == region)
    }

    pub fn entries(&self) -> &[(String, RGBColor)] {
        &self.entries
    }
}

// ── Shared drawing ──────────────────────────────────────────────────────────

/// Draw onto a white canvas of `size` pixels and return the SVG text.
fn render(
    size: (u32, u32),
    draw: impl FnOnce(&Area<'_>) -> Result<(), ReportError>,
) -> Result<String, ReportError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Min and max of `values`, `None` when empty.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// `lo..hi` widened by `frac` of its span on both sides; never empty.
fn padded((lo, hi): (f64, f64), frac: f64) -> Range<f64> {
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 1.0)..(hi + 1.0);
    }
    (lo - span * frac)..(hi + span * frac)
}

fn normalized(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        (v - lo) / (hi - lo)
    } else {
        0.5
    }
}

struct Bar {
    label: String,
    value: f64,
    color: RGBColor,
    annotation: String,
}

/// Horizontal bars on a zero-based value axis, first bar at the top.
/// `legend` entries are listed in the lower right corner.
fn horizontal_bars(
    area: &Area<'_>,
    caption: &str,
    bars: &[Bar],
    x_max: f64,
    x_desc: &str,
    legend: &[(String, RGBColor)],
) -> Result<(), ReportError> {
    let n = bars.len().max(1);
    // segment 0 is the bottom row
    let row = |i: usize| n - 1 - i;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(200)
        .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n + 1)
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(y) if *y < n => {
                bars.get(row(*y)).map_or_else(String::new, |b| b.label.clone())
            }
            _ => String::new(),
        })
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        let mut rect = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(row(i))),
                (b.value.max(0.0), SegmentValue::Exact(row(i) + 1)),
            ],
            b.color.filled(),
        );
        rect.set_margin(4, 4, 0, 0);
        rect
    }))?;
    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        Text::new(
            format!(" {}", b.annotation),
            (b.value.max(0.0), SegmentValue::CenterOf(row(i))),
            (FONT, 12),
        )
    }))?;

    if !legend.is_empty() {
        for (label, color) in legend {
            let color = *color;
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, SegmentValue<usize>)>>())?
                .label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

/// Vertical bars over `y_range`, one labelled slot per bar.
fn vertical_bars(
    area: &Area<'_>,
    caption: &str,
    bars: &[Bar],
    y_range: Range<f64>,
    y_desc: &str,
) -> Result<(), ReportError> {
    let n = bars.len().max(1);
    let (y_lo, y_hi) = (y_range.start, y_range.end);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 18))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n).into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => bars.get(*i).map_or_else(String::new, |b| b.label.clone()),
            _ => String::new(),
        })
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        let mut rect = Rectangle::new(
            [
                (SegmentValue::Exact(i), y_lo),
                (SegmentValue::Exact(i + 1), b.value.clamp(y_lo, y_hi)),
            ],
            b.color.filled(),
        );
        rect.set_margin(0, 0, 8, 8);
        rect
    }))?;
    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        Text::new(
            b.annotation.clone(),
            (SegmentValue::CenterOf(i), b.value.clamp(y_lo, y_hi)),
            (FONT, 12),
        )
    }))?;
    Ok(())
}

fn bar_chart_height(rows: usize, config: &ChartConfig) -> u32 {
    (140.0 + config.bar_row_px * rows.max(1) as f64).round() as u32
}

// ── Chart 1: revenue per store ──────────────────────────────────────────────

pub fn revenue_by_store_chart(records: &[StoreRecord], config: &ChartConfig) -> Result<String, ReportError> {
    let ranked = ranking::rank_by(records, Metric::Revenue);
    let n = ranked.len();
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| Bar {
            label: r.name.clone(),
            value: r.revenue,
            // brightest colour for the top store
            color: ramp(1.0 - position(i, n), WARM_UP),
            annotation: numfmt::currency(r.revenue, 0),
        })
        .collect();
    let x_max = bounds(records.iter().map(|r| r.revenue)).map_or(1.0, |(_, hi)| hi.max(1.0)) * 1.2;

    render((1100, bar_chart_height(n, config)), |root| {
        horizontal_bars(
            root,
            "Monthly revenue by store (highest at the top)",
            &bars,
            x_max,
            "Monthly revenue (R$)",
            &[],
        )
    })
}

// ── Chart 2: category share ─────────────────────────────────────────────────

pub fn category_share_chart(categories: &[CategorySummary]) -> Result<String, ReportError> {
    let total: f64 = categories.iter().map(|c| c.revenue_sum.max(0.0)).sum();

    let mut by_count: Vec<&CategorySummary> = categories.iter().collect();
    by_count.sort_by(|a, b| b.store_count.cmp(&a.store_count));
    let bars: Vec<Bar> = by_count
        .iter()
        .enumerate()
        .map(|(i, c)| Bar {
            label: c.category.clone(),
            value: c.store_count as f64,
            color: palette_color(i),
            annotation: c.store_count.to_string(),
        })
        .collect();
    let y_max = bounds(bars.iter().map(|b| b.value)).map_or(1.0, |(_, hi)| hi.max(1.0)) * 1.15;

    render((1400, 700), |root| {
        let (left, right) = root.split_horizontally(700);

        let left = left.titled("Category share of total revenue", (FONT, 20))?;
        if total > 0.0 {
            let (w, h) = left.dim_in_pixel();
            let center = (w as i32 / 2, h as i32 / 2);
            let radius = f64::from(w.min(h)) * 0.35;
            let sizes: Vec<f64> = categories.iter().map(|c| c.revenue_sum.max(0.0)).collect();
            let colors: Vec<RGBColor> = (0..categories.len()).map(palette_color).collect();
            let labels: Vec<String> = categories.iter().map(|c| c.category.clone()).collect();

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style((FONT, 14).into_font().color(&BLACK));
            pie.percentages((FONT, 13).into_font().color(&BLACK));
            left.draw(&pie)?;
        } else {
            left.draw(&Text::new("No revenue recorded", (260, 320), (FONT, 16)))?;
        }

        vertical_bars(&right, "Stores per category", &bars, 0.0..y_max, "Number of stores")
    })
}

// ── Chart 3: rating vs revenue ──────────────────────────────────────────────

pub fn rating_vs_revenue_chart(
    records: &[StoreRecord],
    palette: &RegionPalette,
    correlation: &Correlation,
) -> Result<String, ReportError> {
    let corr_text = correlation
        .coefficient
        .map_or_else(|| "n/a".to_string(), |c| format!("{c:.3}"));
    let ratings = bounds(records.iter().map(|r| r.rating)).unwrap_or((0.0, 5.0));
    let revenues = bounds(records.iter().map(|r| r.revenue)).unwrap_or((0.0, 1.0));

    render((1200, 700), |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Rating vs monthly revenue (correlation: {corr_text})"),
                (FONT, 22),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(100)
            .build_cartesian_2d(padded(ratings, 0.05), padded(revenues, 0.08))?;

        chart
            .configure_mesh()
            .x_desc("Average rating")
            .y_desc("Monthly revenue (R$)")
            .x_label_formatter(&|v| format!("{v:.1}"))
            .y_label_formatter(&|v| numfmt::thousands(*v, 0))
            .draw()?;

        for (region, color) in palette.entries() {
            let color = *color;
            chart
                .draw_series(
                    records
                        .iter()
                        .filter(|r| &r.region == region)
                        .map(|r| Circle::new((r.rating, r.revenue), 8, color.mix(0.7).filled())),
                )?
                .label(region.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }
        chart.draw_series(
            records
                .iter()
                .filter(|r| !palette.contains(&r.region))
                .map(|r| Circle::new((r.rating, r.revenue), 8, FALLBACK_COLOR.mix(0.7).filled())),
        )?;

        if let Some(trend) = correlation.trend {
            let (lo, hi) = ratings;
            chart
                .draw_series(LineSeries::new(
                    [lo, hi].map(|x| (x, trend.at(x))),
                    RED.stroke_width(2),
                ))?
                .label("Trend line")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}

// ── Chart 4: geographic map ─────────────────────────────────────────────────

struct MapPoint {
    lon: f64,
    lat: f64,
    radius: i32,
    color: RGBColor,
}

fn map_panel(
    area: &Area<'_>,
    caption: &str,
    lon: Range<f64>,
    lat: Range<f64>,
    points: &[MapPoint],
) -> Result<(), ReportError> {
    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 18))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(lon, lat)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_label_formatter(&|v| format!("{v:.1}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()?;

    chart.draw_series(points.iter().map(|p| {
        Circle::new((p.lon, p.lat), p.radius, p.color.mix(0.7).filled())
    }))?;
    Ok(())
}

pub fn geographic_map_chart(records: &[StoreRecord], config: &ChartConfig) -> Result<String, ReportError> {
    let lon = padded(bounds(records.iter().map(|r| r.longitude)).unwrap_or((-1.0, 1.0)), 0.08);
    let lat = padded(bounds(records.iter().map(|r| r.latitude)).unwrap_or((-1.0, 1.0)), 0.08);
    let revenue = bounds(records.iter().map(|r| r.revenue)).unwrap_or((0.0, 0.0));
    let rating = bounds(records.iter().map(|r| r.rating)).unwrap_or((0.0, 0.0));

    // large points first so small ones stay visible
    let by_revenue: Vec<MapPoint> = ranking::rank_by(records, Metric::Revenue)
        .into_iter()
        .map(|r| {
            let area = r.revenue.max(0.0) / config.revenue_per_point_area;
            MapPoint {
                lon: r.longitude,
                lat: r.latitude,
                radius: ((area / PI).sqrt() * 1.5).clamp(3.0, 40.0).round() as i32,
                color: ramp(normalized(r.revenue, revenue), WARM_UP),
            }
        })
        .collect();
    let by_rating: Vec<MapPoint> = records
        .iter()
        .map(|r| MapPoint {
            lon: r.longitude,
            lat: r.latitude,
            radius: 8,
            color: ramp(normalized(r.rating, rating), RED_TO_GREEN),
        })
        .collect();

    render((1500, 700), |root| {
        let (left, right) = root.split_horizontally(750);
        map_panel(
            &left,
            &format!(
                "Revenue by location (size = revenue, {} to {})",
                numfmt::currency(revenue.0, 0),
                numfmt::currency(revenue.1, 0)
            ),
            lon.clone(),
            lat.clone(),
            &by_revenue,
        )?;
        map_panel(
            &right,
            &format!(
                "Rating by location (red {:.1} to green {:.1})",
                rating.0, rating.1
            ),
            lon.clone(),
            lat.clone(),
            &by_rating,
        )
    })
}

// ── Chart 5: regional analysis ──────────────────────────────────────────────

pub fn regional_analysis_chart(regions: &[RegionSummary]) -> Result<String, ReportError> {
    let n = regions.len();
    let labelled = |values: Vec<f64>, color: &dyn Fn(usize) -> RGBColor, fmt: &dyn Fn(f64) -> String| -> Vec<Bar> {
        regions
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (r, value))| Bar {
                label: r.region.clone(),
                value,
                color: color(i),
                annotation: fmt(value),
            })
            .collect()
    };
    let upper = |bars: &[Bar]| bounds(bars.iter().map(|b| b.value)).map_or(1.0, |(_, hi)| hi.max(1e-9)) * 1.15;

    let revenue = labelled(
        regions.iter().map(|r| r.revenue_mean).collect(),
        &|i| ramp(position(i, n), WARM_UP),
        &|v| numfmt::currency(v, 0),
    );
    let rating = labelled(
        regions.iter().map(|r| r.rating_mean).collect(),
        &|i| ramp(position(i, n), (0.83, 0.1)),
        &|v| format!("{v:.2}"),
    );
    let shipping = labelled(
        regions.iter().map(|r| r.shipping_mean).collect(),
        &|i| ramp(position(i, n), COOL_TO_HOT),
        &|v| numfmt::currency(v, 2),
    );
    let units = labelled(
        regions.iter().map(|r| r.units_sum as f64).collect(),
        &palette_color,
        &|v| numfmt::thousands(v, 0),
    );

    // mean rating is zoomed to the usual rating band when it fits
    let (low, high) = bounds(rating.iter().map(|b| b.value)).unwrap_or((0.0, 5.0));
    let rating_floor = if low >= 3.5 { 3.5 } else { 0.0 };

    render((1400, 1000), |root| {
        let root = root.titled("Regional analysis", (FONT, 26))?;
        let panels = root.split_evenly((2, 2));
        vertical_bars(&panels[0], "Mean revenue by region", &revenue, 0.0..upper(&revenue), "Mean revenue (R$)")?;
        vertical_bars(&panels[1], "Mean rating by region", &rating, rating_floor..high.max(5.0), "Mean rating")?;
        vertical_bars(
            &panels[2],
            "Mean shipping cost by region",
            &shipping,
            0.0..upper(&shipping),
            "Mean shipping (R$)",
        )?;
        vertical_bars(&panels[3], "Units sold by region", &units, 0.0..upper(&units), "Units sold")
    })
}

// ── Chart 6: performance ranking ────────────────────────────────────────────

/// Requires scored records.
pub fn performance_ranking_chart(
    records: &[StoreRecord],
    palette: &RegionPalette,
    config: &ChartConfig,
) -> Result<String, ReportError> {
    if records.iter().any(|r| r.performance_score.is_none()) {
        return Err(ReportError::unavailable("performance scores not computed"));
    }
    let ranked = ranking::rank_by_score(records);

    let bars: Vec<Bar> = ranked
        .iter()
        .map(|r| {
            let score = r.performance_score.unwrap_or(0.0);
            Bar {
                label: r.name.clone(),
                value: score,
                color: palette.color(&r.region),
                annotation: format!("{score:.3}"),
            }
        })
        .collect();
    let x_max = bounds(bars.iter().map(|b| b.value)).map_or(0.1, |(_, hi)| hi.max(0.1)) * 1.12;

    render((1100, bar_chart_height(bars.len(), config)), |root| {
        horizontal_bars(
            root,
            "Store performance ranking (revenue, rating and shipping combined)",
            &bars,
            x_max,
            "Performance score",
            palette.entries(),
        )
    })
}

// ── Writing ─────────────────────────────────────────────────────────────────

/// Render all six charts and write them into `config.output_dir`.
/// Returns the written paths in chart order.
pub fn write_charts(inputs: &ChartInputs<'_>, config: &ChartConfig) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(&config.output_dir)?;
    let palette = RegionPalette::new(inputs.regions);

    let charts = [
        (chart_files::REVENUE_BY_STORE, revenue_by_store_chart(inputs.records, config)?),
        (chart_files::CATEGORY_SHARE, category_share_chart(inputs.categories)?),
        (
            chart_files::RATING_VS_REVENUE,
            rating_vs_revenue_chart(inputs.records, &palette, inputs.correlation)?,
        ),
        (chart_files::GEOGRAPHIC_MAP, geographic_map_chart(inputs.records, config)?),
        (chart_files::REGIONAL_ANALYSIS, regional_analysis_chart(inputs.regions)?),
        (
            chart_files::PERFORMANCE_RANKING,
            performance_ranking_chart(inputs.records, &palette, config)?,
        ),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (name, svg) in charts {
        let path = config.output_dir.join(name);
        debug!("Writing {} ({} bytes)", path.display(), svg.len());
        fs::write(&path, svg)?;
        info!("Chart saved: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, region: &str, revenue: f64, rating: f64, score: Option<f64>) -> StoreRecord {
        StoreRecord {
            name: name.to_string(),
            region: region.to_string(),
            category: "Moda".to_string(),
            revenue,
            units_sold: 100,
            rating,
            shipping_cost: 10.0,
            latitude: -23.5,
            longitude: -46.6,
            performance_score: score,
        }
    }

    fn region(name: &str) -> RegionSummary {
        RegionSummary {
            region: name.to_string(),
            store_count: 1,
            revenue_sum: 100.0,
            revenue_mean: 100.0,
            rating_sum: 4.0,
            rating_mean: 4.0,
            shipping_sum: 10.0,
            shipping_mean: 10.0,
            units_sum: 100,
            units_mean: 100.0,
        }
    }

    #[test]
    fn test_hue_ramp_clamps() {
        assert_eq!(hue_ramp(f64::NAN, 0.0, 0.33).rgb(), hue_ramp(0.0, 0.0, 0.33).rgb());
        assert_eq!(hue_ramp(7.0, 0.0, 0.33).rgb(), hue_ramp(1.0, 0.0, 0.33).rgb());
        assert_ne!(hue_ramp(0.0, 0.0, 0.33).rgb(), hue_ramp(1.0, 0.0, 0.33).rgb());
    }

    #[test]
    fn test_padded_range_is_never_empty() {
        let r = padded((3.0, 3.0), 0.05);
        assert!(r.start < 3.0 && r.end > 3.0);
        let r = padded((0.0, 100.0), 0.1);
        assert_eq!((r.start, r.end), (-10.0, 110.0));
    }

    #[test]
    fn test_region_palette_first_seen() {
        let palette = RegionPalette::new(&[region("Sul"), region("Norte")]);
        assert_eq!(palette.color("Sul").rgb(), palette_color(0).rgb());
        assert_eq!(palette.color("Norte").rgb(), palette_color(1).rgb());
        assert_eq!(palette.color("Marte").rgb(), FALLBACK_COLOR.rgb());
        assert!(!palette.contains("Marte"));
    }

    #[test]
    fn test_revenue_chart_lists_every_store() {
        let records = vec![
            record("Loja Praia", "Norte", 80_000.0, 4.8, None),
            record("Loja Centro", "Sul", 120_000.0, 4.2, None),
        ];
        let svg = revenue_by_store_chart(&records, &ChartConfig::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Loja Centro"));
        assert!(svg.contains("Loja Praia"));
        // value labels are drawn in rank order
        assert!(svg.find("R$ 120,000").unwrap() < svg.find("R$ 80,000").unwrap());
    }

    #[test]
    fn test_category_chart_labels_slices() {
        let cats = vec![
            CategorySummary {
                category: "Moda".to_string(),
                store_count: 2,
                revenue_sum: 500.0,
            },
            CategorySummary {
                category: "Casa".to_string(),
                store_count: 1,
                revenue_sum: 1500.0,
            },
        ];
        let svg = category_share_chart(&cats).unwrap();
        assert!(svg.contains("Moda"));
        assert!(svg.contains("Casa"));
        assert!(svg.contains('%'));
        assert!(svg.contains("Stores per category"));
    }

    #[test]
    fn test_scatter_title_shows_correlation() {
        let records = vec![
            record("A", "Sul", 100.0, 3.0, None),
            record("B", "Sul", 200.0, 4.0, None),
        ];
        let palette = RegionPalette::new(&[region("Sul")]);
        let corr = Correlation {
            coefficient: Some(1.0),
            trend: None,
        };
        let svg = rating_vs_revenue_chart(&records, &palette, &corr).unwrap();
        assert!(svg.contains("(correlation: 1.000)"));
        let svg = rating_vs_revenue_chart(&records, &palette, &Correlation::default()).unwrap();
        assert!(svg.contains("(correlation: n/a)"));
    }

    #[test]
    fn test_ranking_chart_requires_scores() {
        let palette = RegionPalette::new(&[region("Sul")]);
        let config = ChartConfig::default();
        let unscored = vec![record("A", "Sul", 100.0, 3.0, None)];
        assert!(performance_ranking_chart(&unscored, &palette, &config).is_err());

        let scored = vec![
            record("A", "Sul", 100.0, 3.0, Some(0.412)),
            record("B", "Sul", 100.0, 3.0, Some(0.871)),
        ];
        let svg = performance_ranking_chart(&scored, &palette, &config).unwrap();
        assert!(svg.find("0.871").unwrap() < svg.find("0.412").unwrap());
        assert!(svg.contains("Sul"));
    }

    #[test]
    fn test_empty_inputs_still_render() {
        let config = ChartConfig::default();
        assert!(revenue_by_store_chart(&[], &config).unwrap().contains("</svg>"));
        assert!(category_share_chart(&[]).unwrap().contains("No revenue recorded"));
        assert!(geographic_map_chart(&[], &config).unwrap().contains("</svg>"));
        assert!(regional_analysis_chart(&[]).unwrap().contains("</svg>"));
    }
}
