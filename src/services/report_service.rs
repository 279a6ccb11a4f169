use crate::models::AnalysisReport;

/// JSON rendering of a report. Field order follows the struct declaration and
/// row vectors are pre-sorted, so identical reports serialize identically.
pub fn render_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn email_subject(report: &AnalysisReport) -> String {
    format!(
        "Sales Analysis Report - {}",
        report.generated_at.format("%Y-%m-%d")
    )
}

/// Plain-text email body: human-readable summary first, raw JSON appended for
/// anyone who wants to feed the numbers into something else.
pub fn email_body(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    let mut body = String::new();

    body.push_str("SALES ANALYSIS REPORT\n\n");
    body.push_str(&format!(
        "Generated at: {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    body.push_str("-- SUMMARY --\n");
    body.push_str(&format!("Total Revenue: {}\n", report.summary.total_revenue));
    body.push_str(&format!("Total Cost: {}\n", report.summary.total_cost));
    body.push_str(&format!("Total Profit: {}\n", report.summary.total_profit));
    body.push_str(&format!("Transactions: {}\n", report.summary.transactions));
    body.push_str(&format!(
        "Profit Margin: {}%\n\n",
        report.summary.profit_margin_percent
    ));

    body.push_str("-- REVENUE PER PRODUCT --\n");
    if report.revenue_per_product.is_empty() {
        body.push_str("(no sales recorded)\n");
    }
    for row in &report.revenue_per_product {
        body.push_str(&format!(
            "{}: {} ({} units)\n",
            row.product_name, row.revenue, row.units_sold
        ));
    }
    body.push('\n');

    body.push_str("-- PROFIT PER PRODUCT --\n");
    for row in &report.profit_per_product {
        body.push_str(&format!(
            "{}: {} ({} units)\n",
            row.product_name, row.profit, row.units_sold
        ));
    }
    body.push('\n');

    body.push_str("-- SALES PER DAY --\n");
    for day in &report.sales_per_day {
        body.push_str(&format!(
            "{}: {} ({} units)\n",
            day.date, day.revenue, day.units_sold
        ));
    }
    body.push('\n');

    body.push_str("-- PAYMENT METHODS --\n");
    for row in &report.payment_methods {
        body.push_str(&format!(
            "{}: {} transactions, {} revenue\n",
            row.payment_method, row.transactions, row.revenue
        ));
    }
    body.push('\n');

    body.push_str(&format!(
        "Mpesa transactions: {}\n\n",
        report.mpesa_transaction_count
    ));

    body.push_str("--- RAW JSON SUMMARY ---\n");
    body.push_str(&render_json(report)?);
    body.push('\n');

    Ok(body)
}
