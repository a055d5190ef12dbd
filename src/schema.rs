/// Column-name constants for the input CSV files.
/// Header names follow the data files as delivered.

// ── Store columns ───────────────────────────────────────────────────────────
pub mod store {
    pub const NAME: &str = "nome_loja";
    pub const REGION: &str = "regiao";
    pub const CATEGORY: &str = "categoria_principal";
    pub const REVENUE: &str = "faturamento_mensal";
    pub const UNITS_SOLD: &str = "produtos_vendidos";
    pub const RATING: &str = "avaliacao_media";
    pub const SHIPPING_COST: &str = "frete_medio";
    pub const LATITUDE: &str = "lat";
    pub const LONGITUDE: &str = "lon";

    pub const REQUIRED: [&str; 9] = [
        NAME,
        REGION,
        CATEGORY,
        REVENUE,
        UNITS_SOLD,
        RATING,
        SHIPPING_COST,
        LATITUDE,
        LONGITUDE,
    ];

    pub const FLOAT_COLUMNS: [&str; 5] = [REVENUE, RATING, SHIPPING_COST, LATITUDE, LONGITUDE];
    pub const INT_COLUMNS: [&str; 1] = [UNITS_SOLD];

    /// Columns summarised by the descriptive statistics table.
    pub const DESCRIBED: [&str; 4] = [REVENUE, UNITS_SOLD, RATING, SHIPPING_COST];
}

// ── Derived columns ─────────────────────────────────────────────────────────
pub mod derived {
    pub const PERFORMANCE_SCORE: &str = "performance_score";
}

// ── Aggregate output columns ────────────────────────────────────────────────
pub mod region_agg {
    pub const STORE_COUNT: &str = "store_count";
    pub const REVENUE_SUM: &str = "revenue_sum";
    pub const REVENUE_MEAN: &str = "revenue_mean";
    pub const RATING_SUM: &str = "rating_sum";
    pub const RATING_MEAN: &str = "rating_mean";
    pub const SHIPPING_SUM: &str = "shipping_sum";
    pub const SHIPPING_MEAN: &str = "shipping_mean";
    pub const UNITS_SUM: &str = "units_sum";
    pub const UNITS_MEAN: &str = "units_mean";
}

// ── Default file names ──────────────────────────────────────────────────────
pub mod files {
    pub const STORES: &str = "dados_lojas.csv";
    pub const PRODUCTS: &str = "produtos_detalhados.csv";
}
