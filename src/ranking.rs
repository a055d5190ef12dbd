use std::cmp::Ordering;

use crate::aggregation::RegionSummary;
use crate::error::ReportError;
use crate::model::StoreRecord;

/// Single-metric sort key for top-N listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Revenue,
    Rating,
    UnitsSold,
    ShippingCost,
    Score,
}

impl Metric {
    pub fn value(self, record: &StoreRecord) -> Option<f64> {
        match self {
            Metric::Revenue => Some(record.revenue),
            Metric::Rating => Some(record.rating),
            Metric::UnitsSold => Some(record.units_sold as f64),
            Metric::ShippingCost => Some(record.shipping_cost),
            Metric::Score => record.performance_score,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Rating => "rating",
            Metric::UnitsSold => "units sold",
            Metric::ShippingCost => "shipping cost",
            Metric::Score => "performance score",
        }
    }
}

/// Missing values sort after present ones.
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// All stores by `metric`, highest first. The sort is stable: equal values
/// keep table order.
pub fn rank_by(records: &[StoreRecord], metric: Metric) -> Vec<&StoreRecord> {
    let mut ranked: Vec<&StoreRecord> = records.iter().collect();
    ranked.sort_by(|a, b| descending(metric.value(a), metric.value(b)));
    ranked
}

pub fn rank_by_score(records: &[StoreRecord]) -> Vec<&StoreRecord> {
    rank_by(records, Metric::Score)
}

pub fn top_n(records: &[StoreRecord], metric: Metric, n: usize) -> Vec<&StoreRecord> {
    let mut ranked = rank_by(records, metric);
    ranked.truncate(n);
    ranked
}

/// The highest-scoring store; the earliest row wins a tie.
pub fn best_overall(records: &[StoreRecord]) -> Result<&StoreRecord, ReportError> {
    if records.is_empty() {
        return Err(ReportError::DegenerateInput("no stores to rank".into()));
    }
    rank_by_score(records)
        .into_iter()
        .next()
        .filter(|r| r.performance_score.is_some())
        .ok_or_else(|| ReportError::unavailable("performance scores not computed"))
}

/// Region with the highest mean revenue; the first-seen region wins a tie.
pub fn best_region(regions: &[RegionSummary]) -> Option<&RegionSummary> {
    regions.iter().fold(None, |best: Option<&RegionSummary>, r| match best {
        Some(b) if b.revenue_mean >= r.revenue_mean => Some(b),
        _ => Some(r),
    })
}
