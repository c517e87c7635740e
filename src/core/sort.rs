//! # Sort Engine
//!
//! Generic, stable ordering of any collection whose element type registers a
//! table of sortable fields. Each entry names a key, says whether it compares
//! numerically or as text, and provides a typed accessor:
//!
//! ```text
//! "price"  Numeric  |p| FieldValue::Number(p.price)
//! "name"   Text     |p| FieldValue::Text(&p.name)
//! ```
//!
//! Numeric fields coerce missing or non-numeric values to 0. Text fields
//! compare case-insensitively, with missing values as the empty string.
//! Sorting never touches its input and an unknown key leaves the order as is.

use std::cmp::Ordering;

use crate::api::{Combination, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Column-header arrow for this direction.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Text,
}

/// A field value as read by an accessor, before coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

pub struct SortField<T> {
    pub key: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> FieldValue<'_>,
}

/// Element types that can be ordered by the engine.
pub trait Sortable: Sized + 'static {
    fn sort_fields() -> &'static [SortField<Self>];
}

pub const DEFAULT_SORT_KEY: &str = "id";

/// Active sort key and direction. Direction only changes through
/// [`toggle`](SortState::toggle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_KEY)
    }
}

impl SortState {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Same key flips direction; a new key starts ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key.to_string();
            self.direction = SortDirection::Ascending;
        }
    }

    /// Direction marker for `key`, or `None` when it is not the active key.
    pub fn indicator(&self, key: &str) -> Option<SortDirection> {
        (self.key == key).then_some(self.direction)
    }
}

/// Sort key after coercion.
enum Coerced {
    Number(f64),
    Text(String),
}

impl Coerced {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Coerced::Number(a), Coerced::Number(b)) => a.total_cmp(b),
            (Coerced::Text(a), Coerced::Text(b)) => a.cmp(b),
            // One field always coerces to one kind.
            _ => Ordering::Equal,
        }
    }
}

fn coerce(kind: FieldKind, value: FieldValue<'_>) -> Coerced {
    match kind {
        FieldKind::Numeric => {
            let n = match value {
                FieldValue::Number(n) if n.is_finite() => n,
                FieldValue::Text(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .unwrap_or(0.0),
                _ => 0.0,
            };
            // -0.0 + 0.0 is +0.0, so both zeros tie under total_cmp.
            Coerced::Number(n + 0.0)
        }
        FieldKind::Text => Coerced::Text(match value {
            FieldValue::Text(s) => s.to_lowercase(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Missing => String::new(),
        }),
    }
}

/// Returns a new, stably ordered copy of `items`.
pub fn sorted<T: Sortable + Clone>(items: &[T], state: &SortState) -> Vec<T> {
    let Some(field) = T::sort_fields().iter().find(|f| f.key == state.key) else {
        return items.to_vec();
    };

    // Decorate once so each element is read and coerced a single time.
    let mut keyed: Vec<(Coerced, T)> = items
        .iter()
        .map(|item| (coerce(field.kind, (field.get)(item)), item.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match state.direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Keys registered for `T`, in table order.
pub fn sort_keys<T: Sortable>() -> impl Iterator<Item = &'static str> {
    T::sort_fields().iter().map(|f| f.key)
}

// ── Products ────────────────────────────────────────────────────────────────

fn product_id(p: &Product) -> FieldValue<'_> {
    FieldValue::Number(p.id as f64)
}

fn product_name(p: &Product) -> FieldValue<'_> {
    FieldValue::Text(&p.name)
}

fn product_description(p: &Product) -> FieldValue<'_> {
    p.description
        .as_deref()
        .map_or(FieldValue::Missing, FieldValue::Text)
}

fn product_price(p: &Product) -> FieldValue<'_> {
    FieldValue::Number(p.price)
}

fn product_stock(p: &Product) -> FieldValue<'_> {
    FieldValue::Number(f64::from(p.stock_quantity))
}

fn product_value(p: &Product) -> FieldValue<'_> {
    FieldValue::Number(p.inventory_value())
}

const PRODUCT_FIELDS: &[SortField<Product>] = &[
    SortField { key: "id", kind: FieldKind::Numeric, get: product_id },
    SortField { key: "name", kind: FieldKind::Text, get: product_name },
    SortField { key: "description", kind: FieldKind::Text, get: product_description },
    SortField { key: "price", kind: FieldKind::Numeric, get: product_price },
    SortField { key: "stock_quantity", kind: FieldKind::Numeric, get: product_stock },
    SortField { key: "inventory_value", kind: FieldKind::Numeric, get: product_value },
];

impl Sortable for Product {
    fn sort_fields() -> &'static [SortField<Self>] {
        PRODUCT_FIELDS
    }
}

// ── Combinations ────────────────────────────────────────────────────────────

fn combination_first(c: &Combination) -> FieldValue<'_> {
    c.products
        .first()
        .map_or(FieldValue::Missing, |name| FieldValue::Text(name))
}

fn combination_size(c: &Combination) -> FieldValue<'_> {
    FieldValue::Number(c.products.len() as f64)
}

fn combination_total(c: &Combination) -> FieldValue<'_> {
    FieldValue::Number(c.total)
}

const COMBINATION_FIELDS: &[SortField<Combination>] = &[
    SortField { key: "products", kind: FieldKind::Text, get: combination_first },
    SortField { key: "size", kind: FieldKind::Numeric, get: combination_size },
    SortField { key: "total", kind: FieldKind::Numeric, get: combination_total },
];

impl Sortable for Combination {
    fn sort_fields() -> &'static [SortField<Self>] {
        COMBINATION_FIELDS
    }
}
