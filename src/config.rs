//! Report configuration, loaded from an optional TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReportError;
use crate::report::ReportOptions;
use crate::schema::files;
use crate::scoring::ScoreWeights;
use crate::visualization::ChartConfig;

/// Main configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub scoring: ScoreWeights,
    pub report: ReportSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub data_dir: PathBuf,
    pub stores_file: String,
    pub products_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            stores_file: files::STORES.to_string(),
            products_file: files::PRODUCTS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub chart_dir: PathBuf,
    pub charts: bool,
    pub bar_row_px: f64,
    pub revenue_per_point_area: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let charts = ChartConfig::default();
        Self {
            chart_dir: charts.output_dir,
            charts: true,
            bar_row_px: charts.bar_row_px,
            revenue_per_point_area: charts.revenue_per_point_area,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub top_n: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ReportError> {
        self.scoring.validate()?;
        if self.report.top_n == 0 {
            return Err(ReportError::InvalidConfig("top_n must be at least 1".into()));
        }
        if !(self.output.bar_row_px > 0.0 && self.output.revenue_per_point_area > 0.0) {
            return Err(ReportError::InvalidConfig(
                "bar_row_px and revenue_per_point_area must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            output_dir: self.output.chart_dir.clone(),
            bar_row_px: self.output.bar_row_px,
            revenue_per_point_area: self.output.revenue_per_point_area,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            weights: self.scoring,
            top_n: self.report.top_n,
            charts: self.output.charts.then(|| self.chart_config()),
        }
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ReportConfig, ReportError> {
    let content = fs::read_to_string(path)?;
    let config: ReportConfig = toml::from_str(&content).map_err(|e| {
        ReportError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ReportConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.data_dir, PathBuf::from("data"));
        assert_eq!(config.input.stores_file, "dados_lojas.csv");
        assert_eq!(config.input.products_file, "produtos_detalhados.csv");
        assert_eq!(config.output.chart_dir, PathBuf::from("outputs/charts"));
        assert!(config.output.charts);
        assert_eq!(config.scoring, ScoreWeights::default());
        assert_eq!(config.report.top_n, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            data_dir = "/srv/lojas"

            [output]
            charts = false

            [scoring]
            revenue_weight = 0.5
            rating_weight = 0.25
            shipping_weight = 0.25

            [report]
            top_n = 5
        "#;

        let config: ReportConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.data_dir, PathBuf::from("/srv/lojas"));
        assert_eq!(config.input.stores_file, "dados_lojas.csv");
        assert_eq!(config.scoring.revenue_weight, 0.5);
        assert_eq!(config.scoring.rating_scale, 5.0);

        let options = config.report_options();
        assert!(options.charts.is_none());
        assert_eq!(options.top_n, 5);
    }

    #[test]
    fn test_invalid_weights_rejected_on_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scoring]\nrevenue_weight = 0.9\n").unwrap();
        assert!(matches!(load_config(&path), Err(ReportError::InvalidConfig(_))));

        fs::write(&path, "[report]\ntop_n = \"three\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ReportError::InvalidConfig(_))));
    }
}
