use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned product identifier.
pub type ProductId = i64;

/// A product as returned by the catalog backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "cantidadStock")]
    pub stock_quantity: i32,
}

impl Product {
    /// Price times units in stock.
    pub fn inventory_value(&self) -> f64 {
        self.price * f64::from(self.stock_quantity)
    }
}

/// Validated create/update body. Built from a `ProductDraft` once it passes
/// client-side validation.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProductInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "cantidadStock")]
    pub stock_quantity: i32,
}

/// Aggregate inventory figures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "SummaryBody")]
pub struct InventorySummary {
    pub total_inventory_value: f64,
    pub highest_value_product: Option<Product>,
}

/// The backend reports a `null` total when the table is empty.
#[derive(Deserialize)]
struct SummaryBody {
    #[serde(rename = "valorTotalInventario", default)]
    total: Option<f64>,
    #[serde(rename = "productoMayorValor", default)]
    highest: Option<Product>,
}

impl From<SummaryBody> for InventorySummary {
    fn from(body: SummaryBody) -> Self {
        Self {
            total_inventory_value: body.total.unwrap_or(0.0),
            highest_value_product: body.highest,
        }
    }
}

impl InventorySummary {
    /// Computes the summary locally from a product list.
    ///
    /// On equal values the first product in input order wins.
    pub fn from_products(products: &[Product]) -> Self {
        // Fold from +0.0; f64 `Sum` starts at -0.0.
        let total_inventory_value = products
            .iter()
            .map(Product::inventory_value)
            .fold(0.0, |acc, value| acc + value);
        let highest_value_product = products
            .iter()
            .fold(None::<&Product>, |best, p| match best {
                Some(b) if b.inventory_value() >= p.inventory_value() => Some(b),
                _ => Some(p),
            })
            .cloned();

        Self {
            total_inventory_value,
            highest_value_product,
        }
    }
}

/// One product combination whose price sum fits a budget.
///
/// On the wire each combination is a JSON array: product names followed by
/// the price sum as the last element, e.g. `["Mouse", "Pad", 35000]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Value>")]
pub struct Combination {
    pub products: Vec<String>,
    pub total: f64,
}

impl TryFrom<Vec<Value>> for Combination {
    type Error = String;

    fn try_from(mut row: Vec<Value>) -> Result<Self, Self::Error> {
        let last = row
            .pop()
            .ok_or_else(|| "empty combination row".to_string())?;
        let total = match &last {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| format!("combination sum is not numeric: {last}"))?;

        let products = row
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => Err(format!("combination product name is not a string: {other}")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { products, total })
    }
}

/// Error body returned by the backend on a failed request.
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, String>>,
}
