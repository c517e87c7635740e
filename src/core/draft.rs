//! # Product Drafts
//!
//! Raw create/update input and the pre-submit validation gate. A draft only
//! becomes a [`ProductInput`] once every field passes; otherwise the caller
//! gets a [`FieldErrors`] map keyed the same way the backend keys its own
//! validation errors.

use crate::api::{FieldErrors, Product, ProductInput};
use crate::core::messages;

/// Backend field names, shared by client and server validation errors.
pub mod field {
    pub const NAME: &str = "nombre";
    pub const DESCRIPTION: &str = "descripcion";
    pub const PRICE: &str = "precio";
    pub const STOCK_QUANTITY: &str = "cantidadStock";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock_quantity: String,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
        stock_quantity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price: price.into(),
            stock_quantity: stock_quantity.into(),
        }
    }

    /// Prefills a draft from an existing product, for editing.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            stock_quantity: product.stock_quantity.to_string(),
        }
    }

    /// Validates every field and, if all pass, produces the request body.
    ///
    /// The name is trimmed and a blank description becomes `None`.
    pub fn validate(&self) -> Result<ProductInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(field::NAME, messages::REQUIRED_NAME);
        }

        let price = match parse_price(&self.price) {
            Ok(price) => Some(price),
            Err(message) => {
                errors.insert(field::PRICE, message);
                None
            }
        };

        let stock_quantity = match parse_stock(&self.stock_quantity) {
            Ok(stock) => Some(stock),
            Err(message) => {
                errors.insert(field::STOCK_QUANTITY, message);
                None
            }
        };

        match (price, stock_quantity) {
            (Some(price), Some(stock_quantity)) if errors.is_empty() => {
                let description = self.description.trim();
                Ok(ProductInput {
                    name: name.to_string(),
                    description: (!description.is_empty()).then(|| description.to_string()),
                    price,
                    stock_quantity,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(messages::REQUIRED_PRICE);
    }
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(messages::INVALID_PRICE),
    }
}

fn parse_stock(raw: &str) -> Result<i32, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(messages::REQUIRED_STOCK);
    }
    match raw.parse::<i32>() {
        Ok(stock) if stock >= 0 => Ok(stock),
        _ => Err(messages::INVALID_STOCK),
    }
}
