use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::errors::AppError;
use crate::external::store::SalesStore;
use crate::models::{
    AnalysisReport, DailySales, PaymentMethodStat, ProductProfit, ProductRevenue, ReportSummary,
    Sale,
};

/// Stored data is validated at ingestion, so hitting this means the table was
/// written around the ingest path. The whole computation fails rather than
/// producing a report that silently drops rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("invalid stored sale {id}: {reason}")]
    InvalidRecord { id: uuid::Uuid, reason: String },
}

#[derive(Debug, Default)]
pub struct SalesAggregates {
    pub revenue_by_product: BTreeMap<String, BigDecimal>,
    pub profit_by_product: BTreeMap<String, BigDecimal>,
    pub units_by_product: BTreeMap<String, i64>,
    pub revenue_by_day: BTreeMap<NaiveDate, BigDecimal>,
    pub units_by_day: BTreeMap<NaiveDate, i64>,
    pub payment_methods: BTreeMap<String, (i64, BigDecimal)>,
    pub total_revenue: BigDecimal,
    pub total_cost: BigDecimal,
    pub total_profit: BigDecimal,
    pub transactions: i64,
    pub mpesa_transaction_count: i64,
}

/// Group and sum a batch of sales. Exact decimal accumulation, no rounding.
/// Empty input yields empty aggregates.
pub fn aggregate(sales: &[Sale]) -> Result<SalesAggregates, AggregationError> {
    let mut agg = SalesAggregates::default();
    let zero = BigDecimal::from(0);

    for sale in sales {
        check_record(sale, &zero)?;

        let revenue = sale.revenue();
        let profit = sale.profit();
        let cost = BigDecimal::from(sale.quantity) * &sale.cost_price;
        let units = i64::from(sale.quantity);

        *agg.revenue_by_product
            .entry(sale.product_name.clone())
            .or_insert_with(|| zero.clone()) += &revenue;
        *agg.profit_by_product
            .entry(sale.product_name.clone())
            .or_insert_with(|| zero.clone()) += &profit;
        *agg.units_by_product
            .entry(sale.product_name.clone())
            .or_insert(0) += units;

        *agg.revenue_by_day
            .entry(sale.sale_date)
            .or_insert_with(|| zero.clone()) += &revenue;
        *agg.units_by_day.entry(sale.sale_date).or_insert(0) += units;

        let payment = agg
            .payment_methods
            .entry(sale.payment_method.clone())
            .or_insert_with(|| (0, zero.clone()));
        payment.0 += 1;
        payment.1 += &revenue;

        agg.total_revenue += &revenue;
        agg.total_cost += cost;
        agg.total_profit += profit;
        agg.transactions += 1;
        if sale.mpesa_transaction_id.is_some() {
            agg.mpesa_transaction_count += 1;
        }
    }

    Ok(agg)
}

fn check_record(sale: &Sale, zero: &BigDecimal) -> Result<(), AggregationError> {
    let reason = if sale.quantity <= 0 {
        Some(format!("quantity {} is not positive", sale.quantity))
    } else if sale.cost_price < *zero {
        Some(format!("cost_price {} is negative", sale.cost_price))
    } else if sale.selling_price < *zero {
        Some(format!("selling_price {} is negative", sale.selling_price))
    } else if sale.product_name.trim().is_empty() {
        Some("product_name is blank".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(AggregationError::InvalidRecord {
            id: sale.id,
            reason,
        }),
        None => Ok(()),
    }
}

/// Assemble the presentation report: rounded to 2 dp, rows in a fixed order
/// (value descending, name/date ascending on ties).
pub fn build_report(agg: &SalesAggregates, generated_at: DateTime<Utc>) -> AnalysisReport {
    let mut revenue_per_product: Vec<ProductRevenue> = agg
        .revenue_by_product
        .iter()
        .map(|(name, revenue)| ProductRevenue {
            product_name: name.clone(),
            revenue: round2(revenue),
            units_sold: agg.units_by_product.get(name).copied().unwrap_or(0),
        })
        .collect();
    revenue_per_product.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });

    let mut profit_per_product: Vec<ProductProfit> = agg
        .profit_by_product
        .iter()
        .map(|(name, profit)| ProductProfit {
            product_name: name.clone(),
            profit: round2(profit),
            units_sold: agg.units_by_product.get(name).copied().unwrap_or(0),
        })
        .collect();
    profit_per_product.sort_by(|a, b| {
        b.profit
            .cmp(&a.profit)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });

    let sales_per_day: Vec<DailySales> = agg
        .revenue_by_day
        .iter()
        .map(|(date, revenue)| DailySales {
            date: *date,
            revenue: round2(revenue),
            units_sold: agg.units_by_day.get(date).copied().unwrap_or(0),
        })
        .collect();

    let mut payment_methods: Vec<PaymentMethodStat> = agg
        .payment_methods
        .iter()
        .map(|(method, (transactions, revenue))| PaymentMethodStat {
            payment_method: method.clone(),
            transactions: *transactions,
            revenue: round2(revenue),
        })
        .collect();
    payment_methods.sort_by(|a, b| {
        b.transactions
            .cmp(&a.transactions)
            .then_with(|| a.payment_method.cmp(&b.payment_method))
    });

    let zero = BigDecimal::from(0);
    let profit_margin_percent = if agg.total_revenue > zero {
        round2(&(&agg.total_profit * BigDecimal::from(100) / &agg.total_revenue))
    } else {
        round2(&zero)
    };

    AnalysisReport {
        generated_at,
        summary: ReportSummary {
            total_revenue: round2(&agg.total_revenue),
            total_cost: round2(&agg.total_cost),
            total_profit: round2(&agg.total_profit),
            transactions: agg.transactions,
            profit_margin_percent,
        },
        best_selling_product: revenue_per_product.first().cloned(),
        most_profitable_product: profit_per_product.first().cloned(),
        revenue_per_product,
        profit_per_product,
        sales_per_day,
        payment_methods,
        mpesa_transaction_count: agg.mpesa_transaction_count,
    }
}

/// Fetch, aggregate and assemble in one go.
pub async fn run_analysis(
    store: &dyn SalesStore,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<AnalysisReport, AppError> {
    let sales = match range {
        Some((from, to)) => store.fetch_by_date_range(from, to).await?,
        None => store.fetch_all().await?,
    };

    let aggregates = aggregate(&sales)?;
    Ok(build_report(&aggregates, Utc::now()))
}

fn round2(value: &BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}
