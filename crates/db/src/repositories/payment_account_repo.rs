//! Repository for the `payment_accounts` table.

use preorder_core::pricing::PaymentMethod;
use preorder_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment_account::{
    CreatePaymentAccount, PaymentAccount, UpdatePaymentAccount,
};

/// Column list shared across queries.
const COLUMNS: &str = "id, method, bank_name, account_number, account_name, \
    barcode_path, is_active, created_at, updated_at";

/// Provides CRUD operations for payment accounts.
pub struct PaymentAccountRepo;

impl PaymentAccountRepo {
    /// Insert a new payment account.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePaymentAccount,
    ) -> Result<PaymentAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_accounts
                (method, bank_name, account_number, account_name, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentAccount>(&query)
            .bind(input.method.as_str())
            .bind(&input.bank_name)
            .bind(&input.account_number)
            .bind(&input.account_name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a payment account by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PaymentAccount>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_accounts WHERE id = $1");
        sqlx::query_as::<_, PaymentAccount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every payment account (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PaymentAccount>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_accounts ORDER BY id");
        sqlx::query_as::<_, PaymentAccount>(&query)
            .fetch_all(pool)
            .await
    }

    /// List active accounts only (customer-facing).
    pub async fn list_active(pool: &PgPool) -> Result<Vec<PaymentAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_accounts WHERE is_active ORDER BY id"
        );
        sqlx::query_as::<_, PaymentAccount>(&query)
            .fetch_all(pool)
            .await
    }

    /// List active accounts eligible for the chosen payment method.
    pub async fn list_active_by_method(
        pool: &PgPool,
        method: PaymentMethod,
    ) -> Result<Vec<PaymentAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_accounts \
             WHERE is_active AND method = $1 ORDER BY id"
        );
        sqlx::query_as::<_, PaymentAccount>(&query)
            .bind(method.as_str())
            .fetch_all(pool)
            .await
    }

    /// Update a payment account. Only non-`None` fields in `input` are
    /// applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePaymentAccount,
    ) -> Result<Option<PaymentAccount>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_accounts SET
                method = COALESCE($2, method),
                bank_name = COALESCE($3, bank_name),
                account_number = COALESCE($4, account_number),
                account_name = COALESCE($5, account_name),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentAccount>(&query)
            .bind(id)
            .bind(input.method.map(|m| m.as_str()))
            .bind(&input.bank_name)
            .bind(&input.account_number)
            .bind(&input.account_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Attach an uploaded barcode image path.
    pub async fn set_barcode_path(
        pool: &PgPool,
        id: DbId,
        path: &str,
    ) -> Result<Option<PaymentAccount>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_accounts SET barcode_path = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentAccount>(&query)
            .bind(id)
            .bind(path)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a payment account. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payment_accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
