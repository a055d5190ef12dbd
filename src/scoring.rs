//! Composite performance score.
//!
//! score = revenue / max(revenue)                     * revenue_weight
//!       + rating / rating_scale                      * rating_weight
//!       + (max(shipping) - shipping) / max(shipping) * shipping_weight

use log::{debug, warn};
use polars::prelude::*;
use serde::Deserialize;

use crate::error::ReportError;
use crate::schema::{derived, store};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Component weights of the performance score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub revenue_weight: f64,
    pub rating_weight: f64,
    pub shipping_weight: f64,
    /// Upper bound of the rating scale.
    pub rating_scale: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            revenue_weight: 0.4,
            rating_weight: 0.3,
            shipping_weight: 0.3,
            rating_scale: 5.0,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), ReportError> {
        let weights = [self.revenue_weight, self.rating_weight, self.shipping_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ReportError::InvalidConfig(format!(
                "score weights must be non-negative, got {weights:?}"
            )));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ReportError::InvalidConfig(format!(
                "score weights must sum to 1.0, got {total}"
            )));
        }
        if !(self.rating_scale.is_finite() && self.rating_scale > 0.0) {
            return Err(ReportError::InvalidConfig(format!(
                "rating scale must be positive, got {}",
                self.rating_scale
            )));
        }
        Ok(())
    }
}

/// Append (or replace) the `performance_score` column.
///
/// Fails with `DegenerateInput` when the table is empty or when max revenue
/// or max shipping cost is zero, and with `InvalidData` when any score comes
/// out NaN or infinite.
pub fn score_stores(stores: &DataFrame, weights: &ScoreWeights) -> Result<DataFrame, ReportError> {
    weights.validate()?;

    let max_revenue = nonzero_max(stores, store::REVENUE, "max revenue")?;
    let max_shipping = nonzero_max(stores, store::SHIPPING_COST, "max shipping cost")?;
    debug!("Scoring {} stores (max revenue {max_revenue}, max shipping {max_shipping})", stores.height());

    let revenue_part = col(store::REVENUE) / lit(max_revenue) * lit(weights.revenue_weight);
    let rating_part = col(store::RATING) / lit(weights.rating_scale) * lit(weights.rating_weight);
    let shipping_part = (lit(max_shipping) - col(store::SHIPPING_COST)) / lit(max_shipping)
        * lit(weights.shipping_weight);

    let scored = stores
        .clone()
        .lazy()
        .with_column((revenue_part + rating_part + shipping_part).alias(derived::PERFORMANCE_SCORE))
        .collect()?;

    let scores = scored.column(derived::PERFORMANCE_SCORE)?.f64()?;
    let non_finite = scores.into_iter().flatten().filter(|s| !s.is_finite()).count();
    if non_finite > 0 {
        return Err(ReportError::InvalidData(format!(
            "{non_finite} stores have a non-finite performance score"
        )));
    }
    let out_of_range = scores
        .into_iter()
        .flatten()
        .filter(|s| !(0.0..=1.0).contains(s))
        .count();
    if out_of_range > 0 {
        warn!("{out_of_range} stores scored outside [0, 1]; check for negative or out-of-scale inputs");
    }

    Ok(scored)
}

fn nonzero_max(df: &DataFrame, column: &str, what: &str) -> Result<f64, ReportError> {
    let max = df
        .column(column)?
        .f64()?
        .max()
        .ok_or_else(|| ReportError::DegenerateInput(format!("{what} is undefined for an empty table")))?;
    if max == 0.0 {
        return Err(ReportError::DegenerateInput(format!(
            "{what} is zero, cannot normalize '{column}'"
        )));
    }
    Ok(max)
}
