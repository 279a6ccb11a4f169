use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::sale_queries;
use crate::models::{NewSale, Sale};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence gateway for sales. The core only ever asks for a batch insert
/// and reads; updates and deletes are out of scope.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Insert a batch atomically. Partial failure surfaces as one error for
    /// the whole batch.
    async fn insert_batch(&self, sales: Vec<NewSale>) -> Result<u64, StoreError>;

    async fn fetch_all(&self) -> Result<Vec<Sale>, StoreError>;

    async fn fetch_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Sale>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

pub struct PgSalesStore {
    pool: PgPool,
}

impl PgSalesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for PgSalesStore {
    async fn insert_batch(&self, sales: Vec<NewSale>) -> Result<u64, StoreError> {
        Ok(sale_queries::insert_batch(&self.pool, sales).await?)
    }

    async fn fetch_all(&self) -> Result<Vec<Sale>, StoreError> {
        Ok(sale_queries::fetch_all(&self.pool).await?)
    }

    async fn fetch_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Sale>, StoreError> {
        Ok(sale_queries::fetch_by_date_range(&self.pool, from, to).await?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(sale_queries::count(&self.pool).await?)
    }
}

/// In-memory store for exercising the ingest/analysis pipeline in tests.
#[cfg(test)]
pub struct InMemorySalesStore {
    sales: std::sync::Mutex<Vec<Sale>>,
}

#[cfg(test)]
impl InMemorySalesStore {
    pub fn new() -> Self {
        Self {
            sales: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SalesStore for InMemorySalesStore {
    async fn insert_batch(&self, sales: Vec<NewSale>) -> Result<u64, StoreError> {
        let mut guard = self.sales.lock().unwrap();
        let inserted = sales.len() as u64;
        guard.extend(sales.into_iter().map(Sale::new));
        Ok(inserted)
    }

    async fn fetch_all(&self) -> Result<Vec<Sale>, StoreError> {
        Ok(self.sales.lock().unwrap().clone())
    }

    async fn fetch_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Sale>, StoreError> {
        Ok(self
            .sales
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.sale_date >= from && s.sale_date <= to)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.sales.lock().unwrap().len() as i64)
    }
}
