//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Enum-valued columns are stored as TEXT and decoded through
//! `#[sqlx(try_from = "String")]`, so an unknown value fails the read
//! instead of leaking an untyped string into the application.

pub mod order;
pub mod order_event;
pub mod payment_account;
pub mod product;
