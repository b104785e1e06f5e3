//! Well-known figure keys published by the statistics service, per domain.
//!
//! Sources may send additional keys; the engine aggregates every key it
//! receives according to the map it arrives in.

/// Trade: exports and imports by partner
pub mod trade {
    pub const EXPORTS_TOTAL: &str = "exports_total";
    pub const IMPORTS_TOTAL: &str = "imports_total";
    pub const TRADE_BALANCE: &str = "trade_balance";
    pub const EXPORTS_PCT_GDP: &str = "exports_pct_gdp";
    pub const IMPORTS_PCT_GDP: &str = "imports_pct_gdp";
    pub const EXPORTS_CHANGE_YOY_PCT: &str = "exports_change_yoy_pct";
    pub const IMPORTS_CHANGE_YOY_PCT: &str = "imports_change_yoy_pct";
    pub const EXPORT_PARTNERS: &str = "export_partners";
    pub const IMPORT_PARTNERS: &str = "import_partners";
}

/// Economy structure: output by sector
pub mod economy {
    pub const GDP_TOTAL: &str = "gdp_total";
    pub const GDP_PER_CAPITA: &str = "gdp_per_capita";
    pub const GDP_CHANGE_YOY_PCT: &str = "change_yoy_pct";
    pub const SECTORS: &str = "sectors";
}

/// Revenue sources: government income by source
pub mod revenue {
    pub const TOTAL_REVENUE: &str = "total_revenue";
    pub const TAX_REVENUE: &str = "tax_revenue";
    pub const TAX_SHARE_PCT: &str = "tax_share_pct";
    pub const REVENUE_PCT_GDP: &str = "revenue_pct_gdp";
    pub const REVENUE_CHANGE_YOY_PCT: &str = "change_yoy_pct";
    pub const SOURCES: &str = "sources";
}

/// Expenditure: spending by vote division
pub mod expenditure {
    pub const TOTAL_EXPENDITURE: &str = "total_expenditure";
    pub const DEBT_SERVICE: &str = "debt_service";
    pub const DEBT_STOCK: &str = "debt_stock";
    pub const DEBT_SERVICE_SHARE_PCT: &str = "debt_service_share_pct";
    pub const EXPENDITURE_PCT_GDP: &str = "expenditure_pct_gdp";
    pub const EXPENDITURE_CHANGE_YOY_PCT: &str = "change_yoy_pct";
    pub const VOTE_DIVISIONS: &str = "vote_divisions";
}
