use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_revenue: BigDecimal,
    pub total_cost: BigDecimal,
    pub total_profit: BigDecimal,
    pub transactions: i64,
    pub profit_margin_percent: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub revenue: BigDecimal,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfit {
    pub product_name: String,
    pub profit: BigDecimal,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub revenue: BigDecimal,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodStat {
    pub payment_method: String,
    pub transactions: i64,
    pub revenue: BigDecimal,
}

/// Derived report, assembled by the analysis service. Row vectors are kept in
/// a fixed sort order so serializing the same report twice is byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub summary: ReportSummary,
    pub revenue_per_product: Vec<ProductRevenue>,
    pub profit_per_product: Vec<ProductProfit>,
    pub best_selling_product: Option<ProductRevenue>,
    pub most_profitable_product: Option<ProductProfit>,
    pub sales_per_day: Vec<DailySales>,
    pub payment_methods: Vec<PaymentMethodStat>,
    pub mpesa_transaction_count: i64,
}

/// A report row persisted in `analysis_reports`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedReport {
    pub id: i32,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub summary: serde_json::Value,
}
