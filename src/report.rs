//! Console text and the end-to-end report run.

use std::path::PathBuf;

use log::{debug, info};
use polars::prelude::DataFrame;

use crate::aggregation::{self, ColumnStats, RegionSummary};
use crate::error::ReportError;
use crate::model::{StoreModel, StoreRecord};
use crate::numfmt;
use crate::ranking::{self, Metric};
use crate::schema::store;
use crate::scoring::ScoreWeights;
use crate::visualization::{self, ChartConfig, ChartInputs};

const RULE_WIDTH: usize = 70;

/// Settings for one report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub weights: ScoreWeights,
    /// Length of the top-N listings
    pub top_n: usize,
    /// `None` skips chart output
    pub charts: Option<ChartConfig>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            top_n: 3,
            charts: Some(ChartConfig::default()),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub best_store: String,
    pub best_score: f64,
    pub best_region: Option<String>,
    pub charts: Vec<PathBuf>,
    pub exploration: String,
    pub recommendations: String,
}

/// Explore, score, chart and recommend. Both tables must already be loaded.
pub fn generate_report(model: &mut StoreModel, options: &ReportOptions) -> Result<ReportSummary, ReportError> {
    let exploration = render_exploration(model)?;

    model.apply_scores(&options.weights)?;
    let stores = model.stores()?;
    let records = model.store_records()?;
    let regions = aggregation::region_summaries(stores)?;
    let categories = aggregation::category_summaries(stores)?;

    let charts = match &options.charts {
        Some(config) => {
            info!("Generating charts in {}", config.output_dir.display());
            let correlation = aggregation::rating_revenue_correlation(stores)?;
            let inputs = ChartInputs {
                records: &records,
                regions: &regions,
                categories: &categories,
                correlation: &correlation,
            };
            visualization::write_charts(&inputs, config)?
        }
        None => {
            debug!("Chart output disabled");
            Vec::new()
        }
    };

    let recommendations = render_recommendations(&records, &regions, options.top_n)?;
    let best = ranking::best_overall(&records)?;
    info!("Recommended store: {}", best.name);

    Ok(ReportSummary {
        best_store: best.name.clone(),
        best_score: best.performance_score.unwrap_or(0.0),
        best_region: ranking::best_region(&regions).map(|r| r.region.clone()),
        charts,
        exploration,
        recommendations,
    })
}

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

fn banner(lines: &mut Vec<String>, heading: &str) {
    lines.push(String::new());
    lines.push(rule('='));
    lines.push(heading.to_string());
    lines.push(rule('='));
}

// ── Exploration ─────────────────────────────────────────────────────────────

/// Row counts, column types, descriptive statistics and group counts.
pub fn render_exploration(model: &StoreModel) -> Result<String, ReportError> {
    let stores = model.stores()?;
    let products = model.products()?;

    let mut lines = Vec::new();
    banner(&mut lines, "STORE DATA OVERVIEW");
    lines.push(format!(
        "Generated: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    ));
    let data_dir = model.base_path();
    if !data_dir.as_os_str().is_empty() {
        lines.push(format!("Data directory: {}", data_dir.display()));
    }
    lines.push(format!("Stores loaded: {}", stores.height()));
    lines.push(format!("Product rows loaded: {}", products.height()));

    lines.push(String::new());
    lines.push("Store table columns:".to_string());
    lines.extend(column_listing(stores));

    lines.push(String::new());
    lines.push("Descriptive statistics:".to_string());
    lines.extend(stats_table(&aggregation::describe(stores)?));

    for (heading, column) in [
        ("Stores per region:", store::REGION),
        ("Stores per category:", store::CATEGORY),
    ] {
        lines.push(String::new());
        lines.push(heading.to_string());
        let counts = aggregation::value_counts(stores, column)?;
        let width = counts.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        for (key, count) in counts {
            lines.push(format!("  {key:<width$}  {count}"));
        }
    }

    Ok(lines.join("\n"))
}

fn column_listing(df: &DataFrame) -> Vec<String> {
    let names = df.get_column_names_str();
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    df.get_columns()
        .iter()
        .map(|c| {
            format!(
                "  {:<width$}  {} non-null  {}",
                c.name().as_str(),
                c.len() - c.null_count(),
                c.dtype()
            )
        })
        .collect()
}

fn stats_table(stats: &[ColumnStats]) -> Vec<String> {
    let width = stats
        .iter()
        .map(|s| s.column.len())
        .max()
        .unwrap_or(0)
        .max(12);

    let mut header = format!("  {:<6}", "");
    for s in stats {
        header += &format!("  {:>width$}", s.column);
    }
    let mut lines = vec![header];

    let rows: [(&str, fn(&ColumnStats) -> Option<f64>); 8] = [
        ("count", |s| Some(s.count as f64)),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    for (label, pick) in rows {
        let mut line = format!("  {label:<6}");
        for s in stats {
            line += &format!("  {:>width$}", numfmt::optional(pick(s), 2));
        }
        lines.push(line);
    }
    lines
}

// ── Recommendations ─────────────────────────────────────────────────────────

/// The recommended store, top-N listings, best region and conclusion.
/// `records` must carry performance scores.
pub fn render_recommendations(
    records: &[StoreRecord],
    regions: &[RegionSummary],
    top_n: usize,
) -> Result<String, ReportError> {
    let best = ranking::best_overall(records)?;
    let score = best.performance_score.unwrap_or(0.0);

    let mut lines = Vec::new();
    banner(&mut lines, "RECOMMENDATION");
    lines.push(String::new());
    lines.push(format!("Recommended store: {}", best.name));
    lines.push(format!("Monthly revenue:   {}", numfmt::currency(best.revenue, 2)));
    lines.push(format!("Average rating:    {}/5.0", best.rating));
    lines.push(format!("Average shipping:  {}", numfmt::currency(best.shipping_cost, 2)));
    lines.push(format!("Units sold:        {}", best.units_sold));
    lines.push(format!("Main category:     {}", best.category));

    lines.push(String::new());
    lines.push("Why this store:".to_string());
    lines.push(format!("  • Performance score: {score:.3}"));
    lines.push(format!("  • Region: {}", best.region));

    lines.push(String::new());
    lines.push("KEY INSIGHTS".to_string());

    for metric in [Metric::Revenue, Metric::Rating, Metric::UnitsSold] {
        lines.push(String::new());
        lines.push(format!("Top {top_n} by {}:", metric.label()));
        for r in ranking::top_n(records, metric, top_n) {
            lines.push(format!("   {}: {}", r.name, metric_text(r, metric)));
        }
    }

    lines.push(String::new());
    lines.push("Regional view:".to_string());
    match ranking::best_region(regions) {
        Some(region) => {
            lines.push(format!("   Best region by revenue: {}", region.region));
            lines.push(format!(
                "   Mean revenue: {}",
                numfmt::currency(region.revenue_mean, 2)
            ));
        }
        None => lines.push("   No regions to compare".to_string()),
    }

    lines.push(String::new());
    lines.push("CONCLUSION".to_string());
    lines.push(format!("   We recommend acquiring {} for:", best.name));
    lines.push(format!("   • strong overall performance (score: {score:.3})"));
    lines.push("   • a good balance between revenue and customer satisfaction".to_string());
    lines.push(format!("   • its location in the {} region", best.region));
    lines.push(format!("   • the growth potential of the {} category", best.category));

    Ok(lines.join("\n"))
}

fn metric_text(record: &StoreRecord, metric: Metric) -> String {
    match metric {
        Metric::Revenue => numfmt::currency(record.revenue, 2),
        Metric::Rating => format!("{}/5.0", record.rating),
        Metric::UnitsSold => numfmt::thousands(record.units_sold as f64, 0),
        Metric::ShippingCost => numfmt::currency(record.shipping_cost, 2),
        Metric::Score => numfmt::optional(record.performance_score, 3),
    }
}
