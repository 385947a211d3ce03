//! Product catalog value types: garment sizes and product lifecycle status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Garment size offered by a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

/// All recognized sizes, smallest first.
pub const ALL_SIZES: &[Size] = &[Size::Xs, Size::S, Size::M, Size::L, Size::Xl, Size::Xxl];

impl Size {
    pub fn as_str(self) -> &'static str {
        match self {
            Size::Xs => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XS" => Ok(Size::Xs),
            "S" => Ok(Size::S),
            "M" => Ok(Size::M),
            "L" => Ok(Size::L),
            "XL" => Ok(Size::Xl),
            "XXL" => Ok(Size::Xxl),
            other => Err(CoreError::Validation(format!("Unknown size '{other}'"))),
        }
    }
}

impl TryFrom<String> for Size {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Ordered set of sizes a product is offered in.
///
/// Wraps the raw TEXT[] column so unknown size strings are rejected when a
/// row is read, not when a customer tries to order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeSet(pub Vec<Size>);

impl SizeSet {
    pub fn contains(&self, size: Size) -> bool {
        self.0.contains(&size)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The database/wire representation.
    pub fn as_wire(&self) -> Vec<String> {
        self.0.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl TryFrom<Vec<String>> for SizeSet {
    type Error = CoreError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        value
            .into_iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<Size>, _>>()
            .map(SizeSet)
    }
}

/// Product lifecycle status.
///
/// `draft` products are invisible to the storefront, `active` products
/// accept orders, `closed` products stop accepting new orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Closed,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "closed" => Ok(ProductStatus::Closed),
            other => Err(CoreError::Validation(format!(
                "Unknown product status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for ProductStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validate the invariants an `active` product must satisfy: a positive
/// price and at least one declared size.
pub fn validate_active_product(price: i64, available_sizes: &SizeSet) -> Result<(), CoreError> {
    if price <= 0 {
        return Err(CoreError::Validation(
            "An active product must have a positive price".to_string(),
        ));
    }
    if available_sizes.is_empty() {
        return Err(CoreError::Validation(
            "An active product must declare at least one size".to_string(),
        ));
    }
    Ok(())
}
