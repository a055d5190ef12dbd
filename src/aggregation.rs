use log::debug;
use polars::prelude::*;

use crate::error::ReportError;
use crate::schema::{region_agg, store};

/// Per-region totals and means. Regions appear in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub store_count: usize,
    pub revenue_sum: f64,
    pub revenue_mean: f64,
    pub rating_sum: f64,
    pub rating_mean: f64,
    pub shipping_sum: f64,
    pub shipping_mean: f64,
    pub units_sum: i64,
    pub units_mean: f64,
}

/// Per-category store count and revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub store_count: usize,
    pub revenue_sum: f64,
}

/// Descriptive statistics for one numeric column.
///
/// `std` is the sample standard deviation; quartiles use linear
/// interpolation. Values are `None` when the column is empty (or, for
/// `std`, has a single row).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Pearson correlation of rating against revenue plus the least-squares fit
/// `revenue = slope * rating + intercept`. Both are `None` when rating has
/// no variance; the coefficient is also `None` when revenue has none.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Correlation {
    pub coefficient: Option<f64>,
    pub trend: Option<TrendLine>,
}

// ── Group-by aggregations ───────────────────────────────────────────────────

/// Region aggregates as a DataFrame: one row per region in first-seen order.
pub fn region_frame(stores: &DataFrame) -> Result<DataFrame, ReportError> {
    let df = stores
        .clone()
        .lazy()
        .group_by_stable([col(store::REGION)])
        .agg([
            col(store::NAME)
                .count()
                .cast(DataType::Int64)
                .alias(region_agg::STORE_COUNT),
            col(store::REVENUE).sum().alias(region_agg::REVENUE_SUM),
            col(store::REVENUE).mean().alias(region_agg::REVENUE_MEAN),
            col(store::RATING).sum().alias(region_agg::RATING_SUM),
            col(store::RATING).mean().alias(region_agg::RATING_MEAN),
            col(store::SHIPPING_COST).sum().alias(region_agg::SHIPPING_SUM),
            col(store::SHIPPING_COST).mean().alias(region_agg::SHIPPING_MEAN),
            col(store::UNITS_SOLD)
                .sum()
                .cast(DataType::Int64)
                .alias(region_agg::UNITS_SUM),
            col(store::UNITS_SOLD)
                .mean()
                .cast(DataType::Float64)
                .alias(region_agg::UNITS_MEAN),
        ])
        .collect()?;
    Ok(df)
}

pub fn region_summaries(stores: &DataFrame) -> Result<Vec<RegionSummary>, ReportError> {
    let df = region_frame(stores)?;

    let regions = df.column(store::REGION)?.str()?;
    let counts = df.column(region_agg::STORE_COUNT)?.i64()?;
    let revenue_sum = df.column(region_agg::REVENUE_SUM)?.f64()?;
    let revenue_mean = df.column(region_agg::REVENUE_MEAN)?.f64()?;
    let rating_sum = df.column(region_agg::RATING_SUM)?.f64()?;
    let rating_mean = df.column(region_agg::RATING_MEAN)?.f64()?;
    let shipping_sum = df.column(region_agg::SHIPPING_SUM)?.f64()?;
    let shipping_mean = df.column(region_agg::SHIPPING_MEAN)?.f64()?;
    let units_sum = df.column(region_agg::UNITS_SUM)?.i64()?;
    let units_mean = df.column(region_agg::UNITS_MEAN)?.f64()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        out.push(RegionSummary {
            region: regions.get(i).unwrap_or("").to_string(),
            store_count: counts.get(i).unwrap_or(0) as usize,
            revenue_sum: revenue_sum.get(i).unwrap_or(0.0),
            revenue_mean: revenue_mean.get(i).unwrap_or(0.0),
            rating_sum: rating_sum.get(i).unwrap_or(0.0),
            rating_mean: rating_mean.get(i).unwrap_or(0.0),
            shipping_sum: shipping_sum.get(i).unwrap_or(0.0),
            shipping_mean: shipping_mean.get(i).unwrap_or(0.0),
            units_sum: units_sum.get(i).unwrap_or(0),
            units_mean: units_mean.get(i).unwrap_or(0.0),
        });
    }
    debug!("Aggregated {} stores into {} regions", stores.height(), out.len());
    Ok(out)
}

pub fn category_summaries(stores: &DataFrame) -> Result<Vec<CategorySummary>, ReportError> {
    let df = stores
        .clone()
        .lazy()
        .group_by_stable([col(store::CATEGORY)])
        .agg([
            col(store::NAME)
                .count()
                .cast(DataType::Int64)
                .alias(region_agg::STORE_COUNT),
            col(store::REVENUE).sum().alias(region_agg::REVENUE_SUM),
        ])
        .collect()?;

    let categories = df.column(store::CATEGORY)?.str()?;
    let counts = df.column(region_agg::STORE_COUNT)?.i64()?;
    let revenue = df.column(region_agg::REVENUE_SUM)?.f64()?;

    Ok((0..df.height())
        .map(|i| CategorySummary {
            category: categories.get(i).unwrap_or("").to_string(),
            store_count: counts.get(i).unwrap_or(0) as usize,
            revenue_sum: revenue.get(i).unwrap_or(0.0),
        })
        .collect())
}

/// Rows per distinct value of `column`, most frequent first. Equal counts
/// keep first-seen order.
pub fn value_counts(stores: &DataFrame, column: &str) -> Result<Vec<(String, usize)>, ReportError> {
    let df = stores
        .clone()
        .lazy()
        .group_by_stable([col(column)])
        .agg([len().cast(DataType::Int64).alias("count")])
        .collect()?;

    let keys = df.column(column)?.cast(&DataType::String)?;
    let keys = keys.str()?;
    let counts = df.column("count")?.i64()?;

    let mut out: Vec<(String, usize)> = (0..df.height())
        .map(|i| {
            (
                keys.get(i).unwrap_or("").to_string(),
                counts.get(i).unwrap_or(0) as usize,
            )
        })
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(out)
}

// ── Descriptive statistics ──────────────────────────────────────────────────

pub fn describe_column(stores: &DataFrame, column: &str) -> Result<ColumnStats, ReportError> {
    let values = stores.column(column)?.cast(&DataType::Float64)?;
    let ca = values.f64()?;

    Ok(ColumnStats {
        column: column.to_string(),
        count: ca.len() - ca.null_count(),
        mean: ca.mean(),
        std: ca.std(1),
        min: ca.min(),
        q25: ca.quantile(0.25, QuantileMethod::Linear)?,
        median: ca.quantile(0.5, QuantileMethod::Linear)?,
        q75: ca.quantile(0.75, QuantileMethod::Linear)?,
        max: ca.max(),
    })
}

/// Statistics for revenue, units sold, rating and shipping cost.
pub fn describe(stores: &DataFrame) -> Result<Vec<ColumnStats>, ReportError> {
    store::DESCRIBED
        .iter()
        .map(|c| describe_column(stores, c))
        .collect()
}

// ── Correlation ─────────────────────────────────────────────────────────────

pub fn rating_revenue_correlation(stores: &DataFrame) -> Result<Correlation, ReportError> {
    let x: Vec<f64> = stores.column(store::RATING)?.f64()?.into_iter().flatten().collect();
    let y: Vec<f64> = stores.column(store::REVENUE)?.f64()?.into_iter().flatten().collect();
    Ok(pearson(&x, &y))
}

fn pearson(x: &[f64], y: &[f64]) -> Correlation {
    let n = x.len().min(y.len());
    if n < 2 {
        return Correlation::default();
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return Correlation::default();
    }
    let slope = sxy / sxx;
    let trend = TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    };
    let coefficient = (syy > 0.0).then(|| sxy / (sxx * syy).sqrt());

    Correlation {
        coefficient,
        trend: Some(trend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StoreModel;

    fn sample() -> DataFrame {
        let raw = df![
            store::NAME => ["A", "B", "C", "D", "E"],
            store::REGION => ["Sul", "Norte", "Sul", "Nordeste", "Norte"],
            store::CATEGORY => ["Moda", "Casa", "Moda", "Moda", "Casa"],
            store::REVENUE => [100.0, 200.0, 300.0, 400.0, 500.0],
            store::UNITS_SOLD => [10i64, 20, 30, 40, 50],
            store::RATING => [4.0, 4.5, 3.0, 5.0, 3.5],
            store::SHIPPING_COST => [10.0, 20.0, 30.0, 40.0, 50.0],
            store::LATITUDE => [0.0; 5],
            store::LONGITUDE => [0.0; 5],
        ]
        .unwrap();
        StoreModel::from_frames(raw, None).unwrap().stores().unwrap().clone()
    }

    #[test]
    fn test_regions_in_first_seen_order() {
        let regions = region_summaries(&sample()).unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, ["Sul", "Norte", "Nordeste"]);

        let sul = &regions[0];
        assert_eq!(sul.store_count, 2);
        assert_eq!(sul.revenue_sum, 400.0);
        assert_eq!(sul.revenue_mean, 200.0);
        assert_eq!(sul.units_sum, 40);
        assert_eq!(sul.rating_mean, 3.5);
        assert_eq!(sul.shipping_sum, 40.0);
    }

    #[test]
    fn test_region_revenue_sums_to_total() {
        let regions = region_summaries(&sample()).unwrap();
        let by_region: f64 = regions.iter().map(|r| r.revenue_sum).sum();
        assert_eq!(by_region, 1500.0);
        let stores: usize = regions.iter().map(|r| r.store_count).sum();
        assert_eq!(stores, 5);
    }

    #[test]
    fn test_category_summaries() {
        let cats = category_summaries(&sample()).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].category, "Moda");
        assert_eq!(cats[0].store_count, 3);
        assert_eq!(cats[0].revenue_sum, 800.0);
        assert_eq!(cats[1].revenue_sum, 700.0);
    }

    #[test]
    fn test_value_counts_sorted_with_stable_ties() {
        let counts = value_counts(&sample(), store::REGION).unwrap();
        assert_eq!(
            counts,
            vec![
                ("Sul".to_string(), 2),
                ("Norte".to_string(), 2),
                ("Nordeste".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_describe_revenue() {
        let stats = describe_column(&sample(), store::REVENUE).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, Some(300.0));
        assert_eq!(stats.min, Some(100.0));
        assert_eq!(stats.q25, Some(200.0));
        assert_eq!(stats.median, Some(300.0));
        assert_eq!(stats.q75, Some(400.0));
        assert_eq!(stats.max, Some(500.0));
        // sample std of 100..500 step 100
        let std = stats.std.unwrap();
        assert!((std - 158.113_883_008_418_97).abs() < 1e-9);
    }

    #[test]
    fn test_describe_integer_column() {
        let stats = describe_column(&sample(), store::UNITS_SOLD).unwrap();
        assert_eq!(stats.q25, Some(20.0));
        assert_eq!(describe(&sample()).unwrap().len(), 4);
    }

    #[test]
    fn test_perfect_correlation() {
        let c = pearson(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0]);
        assert!((c.coefficient.unwrap() - 1.0).abs() < 1e-12);
        let trend = c.trend.unwrap();
        assert!((trend.slope - 10.0).abs() < 1e-12);
        assert!(trend.intercept.abs() < 1e-9);
        assert!((trend.at(4.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_without_variance_is_none() {
        let c = pearson(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]);
        assert_eq!(c, Correlation::default());

        let c = pearson(&[1.0, 2.0], &[5.0, 5.0]);
        assert!(c.coefficient.is_none());
        assert_eq!(c.trend.unwrap().slope, 0.0);

        assert!(rating_revenue_correlation(&sample()).unwrap().coefficient.is_some());
    }
}
