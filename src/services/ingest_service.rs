use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use crate::models::NewSale;

/// Columns a sales CSV must carry. `mpesa_transaction_id` is optional and may
/// be absent from the header entirely.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "date",
    "product_name",
    "quantity",
    "cost_price",
    "selling_price",
    "payment_method",
];

/// Rejects one row. The whole file keeps processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("expected a number for `{field}`, got \"{value}\"")]
    TypeError { field: &'static str, value: String },
    #[error("value out of range for `{field}`: {value}")]
    RangeError { field: &'static str, value: String },
    #[error("invalid date \"{value}\", expected YYYY-MM-DD")]
    DateParseError { value: String },
}

/// Aborts the whole upload.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file is empty")]
    EmptyFile,
    #[error("CSV header is missing required columns: {}", missing.join(", "))]
    HeaderMismatch { missing: Vec<String> },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based, counting data rows only (header excluded).
    pub row: usize,
    pub reason: RowError,
}

#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub accepted: Vec<NewSale>,
    pub rejected: Vec<RejectedRow>,
    pub skipped_blank: usize,
}

/// Validate one raw row (column name -> cell) into a `NewSale`.
///
/// Field values are trimmed; an empty cell counts as missing. Column order is
/// irrelevant since the caller supplies a map.
pub fn validate_row(row: &HashMap<String, String>) -> Result<NewSale, RowError> {
    let field = |name: &str| {
        row.get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let date_raw = field("date").ok_or(RowError::MissingField("date"))?;
    let sale_date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
        RowError::DateParseError {
            value: date_raw.to_string(),
        }
    })?;

    let product_name = field("product_name").ok_or(RowError::MissingField("product_name"))?;

    let quantity_raw = field("quantity").ok_or(RowError::MissingField("quantity"))?;
    let quantity = i32::from_str(quantity_raw).map_err(|_| RowError::TypeError {
        field: "quantity",
        value: quantity_raw.to_string(),
    })?;
    if quantity <= 0 {
        return Err(RowError::RangeError {
            field: "quantity",
            value: quantity_raw.to_string(),
        });
    }

    let cost_price = parse_price(
        "cost_price",
        field("cost_price").ok_or(RowError::MissingField("cost_price"))?,
    )?;
    let selling_price = parse_price(
        "selling_price",
        field("selling_price").ok_or(RowError::MissingField("selling_price"))?,
    )?;

    let payment_method = field("payment_method").ok_or(RowError::MissingField("payment_method"))?;

    let mpesa_transaction_id = field("mpesa_transaction_id").map(str::to_string);

    Ok(NewSale {
        sale_date,
        product_name: product_name.to_string(),
        quantity,
        cost_price,
        selling_price,
        payment_method: payment_method.to_string(),
        mpesa_transaction_id,
    })
}

fn parse_price(field: &'static str, raw: &str) -> Result<BigDecimal, RowError> {
    let value = BigDecimal::from_str(raw).map_err(|_| RowError::TypeError {
        field,
        value: raw.to_string(),
    })?;
    if value < BigDecimal::from(0) {
        return Err(RowError::RangeError {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Parse a whole CSV upload. One bad row never invalidates the rest of the
/// file; a missing/short header or an empty file fails the whole call.
pub fn ingest_csv(content: &str) -> Result<IngestOutcome, IngestError> {
    // Excel exports prefix a UTF-8 BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if content.trim().is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::HeaderMismatch { missing });
    }

    let mut outcome = IngestOutcome::default();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = idx + 1;

        // Trailing blank lines and all-empty rows are artifacts, not data
        if record.iter().all(|cell| cell.trim().is_empty()) {
            outcome.skipped_blank += 1;
            continue;
        }

        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();

        match validate_row(&row) {
            Ok(sale) => outcome.accepted.push(sale),
            Err(reason) => outcome.rejected.push(RejectedRow {
                row: row_number,
                reason,
            }),
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "date,product_name,quantity,cost_price,selling_price,payment_method,mpesa_transaction_id";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_accepts_well_formed_row() {
        let content = csv_with_rows(&["2024-01-05,Sugar,10,80.0,100.0,Mpesa,QCX123"]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.rejected.len(), 0);
        assert_eq!(outcome.accepted.len(), 1);

        let sale = &outcome.accepted[0];
        assert_eq!(sale.product_name, "Sugar");
        assert_eq!(sale.quantity, 10);
        assert_eq!(sale.cost_price, BigDecimal::from_str("80.0").unwrap());
        assert_eq!(sale.selling_price, BigDecimal::from_str("100.0").unwrap());
        assert_eq!(sale.mpesa_transaction_id.as_deref(), Some("QCX123"));
    }

    #[test]
    fn test_tolerates_column_order_and_whitespace() {
        let content = "product_name , selling_price,date,quantity,cost_price,payment_method\n\
                       Bread , 55.0 ,2024-02-01, 3 ,40.0,Cash";
        let outcome = ingest_csv(content).unwrap();

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].product_name, "Bread");
        assert_eq!(outcome.accepted[0].quantity, 3);
        assert_eq!(outcome.accepted[0].mpesa_transaction_id, None);
    }

    #[test]
    fn test_strips_utf8_bom() {
        let content = format!("\u{feff}{}", csv_with_rows(&["2024-01-05,Sugar,1,1,2,Cash,"]));
        let outcome = ingest_csv(&content).unwrap();
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn test_negative_quantity_is_range_error() {
        let content = csv_with_rows(&["2024-01-05,Sugar,-3,80.0,100.0,Cash,"]);
        let outcome = ingest_csv(&content).unwrap();

        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].row, 1);
        assert!(matches!(
            outcome.rejected[0].reason,
            RowError::RangeError {
                field: "quantity",
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_cost_price_is_type_error() {
        let content = csv_with_rows(&["2024-01-05,Sugar,10,abc,100.0,Cash,"]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert!(matches!(
            outcome.rejected[0].reason,
            RowError::TypeError {
                field: "cost_price",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_date_is_date_parse_error() {
        let content = csv_with_rows(&["05/01/2024,Sugar,10,80.0,100.0,Cash,"]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert!(matches!(
            outcome.rejected[0].reason,
            RowError::DateParseError { .. }
        ));
    }

    #[test]
    fn test_missing_product_name_is_missing_field() {
        let content = csv_with_rows(&["2024-01-05,,10,80.0,100.0,Cash,"]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(
            outcome.rejected[0].reason,
            RowError::MissingField("product_name")
        );
    }

    #[test]
    fn test_interleaved_rows_preserve_order() {
        let content = csv_with_rows(&[
            "2024-01-05,Sugar,10,80.0,100.0,Mpesa,QCX123",
            "2024-01-05,Salt,-1,10.0,12.0,Cash,",
            "2024-01-06,Bread,2,40.0,55.0,Cash,",
            "2024-01-06,Milk,1,x,60.0,Cash,",
            "2024-01-07,Sugar,5,80.0,100.0,Mpesa,QCX124",
        ]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.accepted.len(), 3);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(
            outcome
                .accepted
                .iter()
                .map(|s| s.product_name.as_str())
                .collect::<Vec<_>>(),
            vec!["Sugar", "Bread", "Sugar"]
        );
        assert_eq!(
            outcome.rejected.iter().map(|r| r.row).collect::<Vec<_>>(),
            vec![2, 4]
        );
    }

    #[test]
    fn test_missing_date_column_fails_file_level() {
        let content = "product_name,quantity,cost_price,selling_price,payment_method\n\
                       Sugar,10,80.0,100.0,Cash";
        let err = ingest_csv(content).unwrap_err();

        match err {
            IngestError::HeaderMismatch { missing } => {
                assert_eq!(missing, vec!["date".to_string()]);
            }
            other => panic!("expected HeaderMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_fails_file_level() {
        assert!(matches!(ingest_csv("").unwrap_err(), IngestError::EmptyFile));
        assert!(matches!(
            ingest_csv("  \n ").unwrap_err(),
            IngestError::EmptyFile
        ));
    }

    #[test]
    fn test_blank_rows_are_skipped_not_rejected() {
        let content = csv_with_rows(&[
            "2024-01-05,Sugar,10,80.0,100.0,Cash,",
            ",,,,,,",
            "2024-01-06,Bread,2,40.0,55.0,Cash,",
        ]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.rejected.len(), 0);
        assert_eq!(outcome.skipped_blank, 1);
    }

    #[test]
    fn test_extra_columns_are_tolerated() {
        let content = "date,product_name,quantity,cost_price,selling_price,payment_method,notes\n\
                       2024-01-05,Sugar,10,80.0,100.0,Cash,restocked";
        let outcome = ingest_csv(content).unwrap();
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn test_short_row_rejected_for_missing_trailing_field() {
        // flexible parsing: a short record simply lacks its trailing columns
        let content = csv_with_rows(&["2024-01-05,Sugar,10,80.0"]);
        let outcome = ingest_csv(&content).unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(
            outcome.rejected[0].reason,
            RowError::MissingField("selling_price")
        );
    }

    #[test]
    fn test_validate_row_round_trips_semantic_types() {
        let mut row = HashMap::new();
        row.insert("date".to_string(), " 2024-03-10 ".to_string());
        row.insert("product_name".to_string(), "Unga".to_string());
        row.insert("quantity".to_string(), "4".to_string());
        row.insert("cost_price".to_string(), "120".to_string());
        row.insert("selling_price".to_string(), "150".to_string());
        row.insert("payment_method".to_string(), "Mpesa".to_string());
        row.insert("mpesa_transaction_id".to_string(), "".to_string());

        let sale = validate_row(&row).unwrap();
        assert_eq!(
            sale.sale_date,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(sale.quantity, 4);
        // empty optional cell maps to None
        assert_eq!(sale.mpesa_transaction_id, None);
    }
}
