use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use polars::prelude::*;

use crate::error::ReportError;
use crate::schema::{derived, store};
use crate::scoring::{self, ScoreWeights};

/// Holds the two input tables for one report run.
///
/// Tables are `None` until loaded. A failed load leaves the table absent and
/// every later accessor reports `DataUnavailable` for it.
pub struct StoreModel {
    base_path: PathBuf,
    stores: Option<DataFrame>,
    products: Option<DataFrame>,
}

/// Typed view over one row of the store table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRecord {
    pub name: String,
    pub region: String,
    pub category: String,
    pub revenue: f64,
    pub units_sold: i64,
    pub rating: f64,
    pub shipping_cost: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub performance_score: Option<f64>,
}

impl StoreModel {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            stores: None,
            products: None,
        }
    }

    /// Build a model from tables already in memory. The store table goes
    /// through the same column checks and casts as a file load.
    pub fn from_frames(stores: DataFrame, products: Option<DataFrame>) -> Result<Self, ReportError> {
        let stores = Self::parse_store_columns(stores)?;
        Ok(Self {
            base_path: PathBuf::new(),
            stores: Some(stores),
            products,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load both tables. Stops at the first failure; the table that failed
    /// stays unloaded.
    pub fn load_data(&mut self, stores_file: &str, products_file: &str) -> Result<(), ReportError> {
        let result = self
            .load_stores(stores_file)
            .map(|_| ())
            .and_then(|_| self.load_products(products_file).map(|_| ()));

        match &result {
            Ok(()) => info!(
                "Loaded {} stores and {} product rows",
                self.store_count(),
                self.product_count()
            ),
            Err(e) => warn!("Data load failed, continuing without tables: {e}"),
        }
        result
    }

    /// Load the store CSV.
    ///
    /// Required columns: nome_loja, regiao, categoria_principal,
    /// faturamento_mensal, produtos_vendidos, avaliacao_media, frete_medio,
    /// lat, lon. Numeric columns are cast; all other columns stay strings.
    pub fn load_stores(&mut self, filename: &str) -> Result<&DataFrame, ReportError> {
        self.stores = None;
        let raw = self.read_csv_as_strings(filename)?;
        let df = Self::parse_store_columns(raw)?;
        debug!("Store table: {} rows, {} columns", df.height(), df.width());
        Ok(&*self.stores.insert(df))
    }

    /// Load the product CSV. Only its row count feeds the report, so no
    /// column is required.
    pub fn load_products(&mut self, filename: &str) -> Result<&DataFrame, ReportError> {
        self.products = None;
        let df = self.read_csv_as_strings(filename)?;
        debug!("Product table: {} rows, {} columns", df.height(), df.width());
        Ok(&*self.products.insert(df))
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn stores(&self) -> Result<&DataFrame, ReportError> {
        self.stores
            .as_ref()
            .ok_or_else(|| ReportError::unavailable("store table not loaded"))
    }

    pub fn products(&self) -> Result<&DataFrame, ReportError> {
        self.products
            .as_ref()
            .ok_or_else(|| ReportError::unavailable("product table not loaded"))
    }

    pub fn store_count(&self) -> usize {
        self.stores.as_ref().map_or(0, |df| df.height())
    }

    pub fn product_count(&self) -> usize {
        self.products.as_ref().map_or(0, |df| df.height())
    }

    pub fn is_scored(&self) -> bool {
        self.stores
            .as_ref()
            .is_some_and(|df| df.column(derived::PERFORMANCE_SCORE).is_ok())
    }

    // ── Scoring ─────────────────────────────────────────────────────────────

    /// Compute the performance score and write it back into the store table.
    pub fn apply_scores(&mut self, weights: &ScoreWeights) -> Result<&DataFrame, ReportError> {
        let scored = scoring::score_stores(self.stores()?, weights)?;
        Ok(&*self.stores.insert(scored))
    }

    /// Typed rows of the store table, in table order.
    pub fn store_records(&self) -> Result<Vec<StoreRecord>, ReportError> {
        store_records(self.stores()?)
    }

    // ── Private helpers ─────────────────────────────────────────────────────

    /// Read a CSV file with all columns as String dtype.
    /// Trims whitespace from column names.
    fn read_csv_as_strings(&self, filename: &str) -> Result<DataFrame, ReportError> {
        let path = self.base_path.join(filename);
        if !path.is_file() {
            return Err(ReportError::unavailable(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // all columns as String
            .try_into_reader_with_file_path(Some(path.clone()))
            .and_then(|reader| reader.finish())
            .map_err(|e| {
                ReportError::unavailable(format!("cannot read {}: {e}", path.display()))
            })?;

        let trimmed: Vec<String> = df
            .get_column_names_str()
            .iter()
            .map(|c| c.trim().to_string())
            .collect();
        df.set_column_names(trimmed.as_slice())?;

        Ok(df)
    }

    fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), ReportError> {
        for &col_name in required {
            if df.column(col_name).is_err() {
                return Err(ReportError::MissingColumn(col_name.to_string()));
            }
        }
        Ok(())
    }

    /// Strip and cast the numeric store columns, then reject nulls in any
    /// required column.
    fn parse_store_columns(raw: DataFrame) -> Result<DataFrame, ReportError> {
        Self::require_columns(&raw, &store::REQUIRED)?;

        let mut exprs: Vec<Expr> = Vec::with_capacity(store::REQUIRED.len());
        for name in [store::NAME, store::REGION, store::CATEGORY] {
            exprs.push(text_column(&raw, name));
        }
        for name in store::FLOAT_COLUMNS {
            exprs.push(numeric_column(&raw, name, DataType::Float64));
        }
        for name in store::INT_COLUMNS {
            exprs.push(numeric_column(&raw, name, DataType::Int64));
        }

        let df = raw
            .lazy()
            .with_columns(exprs)
            .collect()
            .map_err(|e| ReportError::InvalidData(format!("store table has non-numeric values: {e}")))?;

        for name in store::REQUIRED {
            let nulls = df.column(name)?.null_count();
            if nulls > 0 {
                return Err(ReportError::InvalidData(format!(
                    "Column '{name}' has {nulls} empty or unparsable values"
                )));
            }
        }

        // "NaN" and "inf" cast cleanly to f64 but cannot be scored
        for name in store::FLOAT_COLUMNS {
            let non_finite = df
                .column(name)?
                .f64()?
                .into_iter()
                .flatten()
                .filter(|v| !v.is_finite())
                .count();
            if non_finite > 0 {
                return Err(ReportError::InvalidData(format!(
                    "Column '{name}' has {non_finite} non-finite values"
                )));
            }
        }

        Ok(df)
    }
}

/// String columns are stripped; anything else (frames built in memory) is
/// cast to String first.
fn text_column(df: &DataFrame, name: &str) -> Expr {
    let is_str = df
        .column(name)
        .map(|c| c.dtype() == &DataType::String)
        .unwrap_or(false);
    if is_str {
        col(name).str().strip_chars(lit(" \t\r\n"))
    } else {
        col(name).cast(DataType::String)
    }
}

fn numeric_column(df: &DataFrame, name: &str, dtype: DataType) -> Expr {
    let is_str = df
        .column(name)
        .map(|c| c.dtype() == &DataType::String)
        .unwrap_or(false);
    if is_str {
        col(name).str().strip_chars(lit(" \t\r\n")).cast(dtype)
    } else {
        col(name).cast(dtype)
    }
}

/// Extract typed rows from a parsed store table.
pub fn store_records(df: &DataFrame) -> Result<Vec<StoreRecord>, ReportError> {
    let names = df.column(store::NAME)?.str()?;
    let regions = df.column(store::REGION)?.str()?;
    let categories = df.column(store::CATEGORY)?.str()?;
    let revenue = df.column(store::REVENUE)?.f64()?;
    let units = df.column(store::UNITS_SOLD)?.i64()?;
    let rating = df.column(store::RATING)?.f64()?;
    let shipping = df.column(store::SHIPPING_COST)?.f64()?;
    let lat = df.column(store::LATITUDE)?.f64()?;
    let lon = df.column(store::LONGITUDE)?.f64()?;
    let score = match df.column(derived::PERFORMANCE_SCORE) {
        Ok(c) => Some(c.f64()?),
        Err(_) => None,
    };

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(StoreRecord {
            name: names.get(i).unwrap_or("").to_string(),
            region: regions.get(i).unwrap_or("").to_string(),
            category: categories.get(i).unwrap_or("").to_string(),
            revenue: revenue.get(i).unwrap_or(0.0),
            units_sold: units.get(i).unwrap_or(0),
            rating: rating.get(i).unwrap_or(0.0),
            shipping_cost: shipping.get(i).unwrap_or(0.0),
            latitude: lat.get(i).unwrap_or(0.0),
            longitude: lon.get(i).unwrap_or(0.0),
            performance_score: score.and_then(|s| s.get(i)),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const STORES_CSV: &str = "\
nome_loja,regiao,categoria_principal,faturamento_mensal,produtos_vendidos,avaliacao_media,frete_medio,lat,lon
Loja A,Sudeste,Eletrônicos,150000.50,1200,4.5,15.0,-23.55,-46.63
Loja B,Sul, Moda ,90000, 800 ,4.8,12.5,-30.03,-51.23
";

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_stores_casts_numeric_columns() {
        let dir = TempDir::new().unwrap();
        write(&dir, "stores.csv", STORES_CSV);

        let mut model = StoreModel::new(dir.path());
        let df = model.load_stores("stores.csv").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column(store::REVENUE).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(store::UNITS_SOLD).unwrap().dtype(), &DataType::Int64);

        let records = model.store_records().unwrap();
        assert_eq!(records[1].category, "Moda");
        assert_eq!(records[1].units_sold, 800);
        assert_eq!(records[0].revenue, 150000.50);
        assert!(records[0].performance_score.is_none());
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut model = StoreModel::new(dir.path());
        let err = model.load_stores("nope.csv").unwrap_err();
        assert!(matches!(err, ReportError::DataUnavailable { .. }));
        assert!(err.to_string().contains("data directory"));
    }

    #[test]
    fn test_failed_load_leaves_model_degraded() {
        let dir = TempDir::new().unwrap();
        write(&dir, "stores.csv", STORES_CSV);

        let mut model = StoreModel::new(dir.path());
        assert!(model.load_data("stores.csv", "products.csv").is_err());
        assert!(matches!(
            model.products(),
            Err(ReportError::DataUnavailable { .. })
        ));
        assert_eq!(model.product_count(), 0);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        write(&dir, "stores.csv", "nome_loja,regiao\nLoja A,Sul\n");

        let mut model = StoreModel::new(dir.path());
        let err = model.load_stores("stores.csv").unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "categoria_principal"));
        assert!(model.stores().is_err());
    }

    #[test]
    fn test_unparsable_number_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let bad = STORES_CSV.replace("150000.50", "lots");
        write(&dir, "stores.csv", &bad);

        let mut model = StoreModel::new(dir.path());
        let err = model.load_stores("stores.csv").unwrap_err();
        assert!(matches!(err, ReportError::InvalidData(_)));
    }

    #[test]
    fn test_non_finite_number_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        for (from, to) in [("150000.50", "NaN"), ("4.8", "inf"), ("-46.63", "-inf")] {
            write(&dir, "stores.csv", &STORES_CSV.replace(from, to));

            let mut model = StoreModel::new(dir.path());
            let err = model.load_stores("stores.csv").unwrap_err();
            assert!(
                matches!(err, ReportError::InvalidData(ref m) if m.contains("non-finite")),
                "{to} was accepted: {err}"
            );
            assert!(model.stores().is_err());
        }
    }

    #[test]
    fn test_in_memory_nan_is_rejected() {
        let raw = df![
            store::NAME => ["Loja A"],
            store::REGION => ["Sul"],
            store::CATEGORY => ["Moda"],
            store::REVENUE => [f64::NAN],
            store::UNITS_SOLD => [10i64],
            store::RATING => [4.0],
            store::SHIPPING_COST => [10.0],
            store::LATITUDE => [0.0],
            store::LONGITUDE => [0.0],
        ]
        .unwrap();
        let err = StoreModel::from_frames(raw, None).err().unwrap();
        assert!(matches!(err, ReportError::InvalidData(_)));
    }

    #[test]
    fn test_products_only_need_a_header() {
        let dir = TempDir::new().unwrap();
        write(&dir, "stores.csv", STORES_CSV);
        write(&dir, "products.csv", "sku,price\n1,9.90\n2,19.90\n3,5.00\n");

        let mut model = StoreModel::new(dir.path());
        model.load_data("stores.csv", "products.csv").unwrap();
        assert_eq!(model.store_count(), 2);
        assert_eq!(model.product_count(), 3);
    }
}
