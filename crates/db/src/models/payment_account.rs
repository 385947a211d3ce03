//! Payment account entity models and DTOs.

use preorder_core::pricing::PaymentMethod;
use preorder_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `payment_accounts` table.
///
/// Customers are offered only active accounts matching their chosen
/// payment method; orders reference accounts indirectly through the
/// method, never by foreign key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentAccount {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    /// Display label ("BCA", "QRIS", ...).
    pub bank_name: String,
    /// Bank transfers only.
    pub account_number: Option<String>,
    /// Bank transfers only.
    pub account_name: Option<String>,
    /// Object-storage path of the QRIS/transfer barcode image.
    pub barcode_path: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a payment account.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentAccount {
    pub method: PaymentMethod,
    pub bank_name: String,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// DTO for updating a payment account. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentAccount {
    pub method: Option<PaymentMethod>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub is_active: Option<bool>,
}
