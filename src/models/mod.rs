mod report;
mod sale;

pub use report::{
    AnalysisReport, DailySales, PaymentMethodStat, ProductProfit, ProductRevenue, ReportSummary,
    SavedReport,
};
pub use sale::{NewSale, Sale};
