use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: uuid::Uuid,
    pub sale_date: NaiveDate,
    pub product_name: String,
    pub quantity: i32,
    pub cost_price: BigDecimal,
    pub selling_price: BigDecimal,
    pub payment_method: String,
    pub mpesa_transaction_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A validated sale as produced by ingestion, before it has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub sale_date: NaiveDate,
    pub product_name: String,
    pub quantity: i32,
    pub cost_price: BigDecimal,
    pub selling_price: BigDecimal,
    pub payment_method: String,
    pub mpesa_transaction_id: Option<String>,
}

impl Sale {
    pub fn new(data: NewSale) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            sale_date: data.sale_date,
            product_name: data.product_name,
            quantity: data.quantity,
            cost_price: data.cost_price,
            selling_price: data.selling_price,
            payment_method: data.payment_method,
            mpesa_transaction_id: data.mpesa_transaction_id,
            created_at: chrono::Utc::now(),
        }
    }

    /// quantity * selling_price
    pub fn revenue(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.selling_price
    }

    /// quantity * (selling_price - cost_price)
    pub fn profit(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * (&self.selling_price - &self.cost_price)
    }
}
