use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{NewSale, Sale};

const SALE_COLUMNS: &str = "id, sale_date, product_name, quantity, cost_price, selling_price, \
                            payment_method, mpesa_transaction_id, created_at";

/// Insert a validated batch inside one transaction: either every row lands or
/// none do.
pub async fn insert_batch(pool: &PgPool, sales: Vec<NewSale>) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for data in sales {
        let sale = Sale::new(data);
        sqlx::query(
            "INSERT INTO sales (id, sale_date, product_name, quantity, cost_price, selling_price, \
             payment_method, mpesa_transaction_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(sale.id)
        .bind(sale.sale_date)
        .bind(&sale.product_name)
        .bind(sale.quantity)
        .bind(&sale.cost_price)
        .bind(&sale.selling_price)
        .bind(&sale.payment_method)
        .bind(&sale.mpesa_transaction_id)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;
        inserted += 1;
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Sale>, sqlx::Error> {
    sqlx::query_as::<_, Sale>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC, created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_by_date_range(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Sale>, sqlx::Error> {
    sqlx::query_as::<_, Sale>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales
         WHERE sale_date BETWEEN $1 AND $2
         ORDER BY sale_date DESC, created_at DESC"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
