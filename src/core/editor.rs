//! Form state for creating or editing one product.
//!
//! Client-side and server-side field errors land on the same surface: a
//! server response overwrites entries for the fields it names and leaves the
//! rest alone. Editing a field clears that field's error.

use log::debug;

use crate::api::{FieldErrors, Product, ProductId};
use crate::core::draft::{ProductDraft, field};
use crate::core::list::ListController;
use crate::core::messages;
use crate::core::outcome::OperationOutcome;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductEditor {
    pub draft: ProductDraft,
    editing: Option<ProductId>,
    errors: FieldErrors,
    submit_error: Option<String>,
}

impl ProductEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to editing `product`, prefilled from its current values.
    pub fn edit(&mut self, product: &Product) {
        self.draft = ProductDraft::from_product(product);
        self.editing = Some(product.id);
        self.errors.clear();
        self.submit_error = None;
    }

    /// Back to an empty create form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn editing(&self) -> Option<ProductId> {
        self.editing
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.draft.name = value.into();
        self.errors.remove(field::NAME);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
        self.errors.remove(field::DESCRIPTION);
    }

    pub fn set_price(&mut self, value: impl Into<String>) {
        self.draft.price = value.into();
        self.errors.remove(field::PRICE);
    }

    pub fn set_stock_quantity(&mut self, value: impl Into<String>) {
        self.draft.stock_quantity = value.into();
        self.errors.remove(field::STOCK_QUANTITY);
    }

    /// Validates and sends the draft through `list`. On success the form is
    /// reset; on failure the draft is kept and errors are shown.
    pub async fn submit(&mut self, list: &ListController) -> OperationOutcome<Product> {
        self.submit_error = None;

        if let Err(errors) = self.draft.validate() {
            debug!("Product form has {} invalid fields", errors.len());
            self.errors = errors.clone();
            return OperationOutcome::invalid(messages::INVALID_INPUT, errors);
        }

        let outcome = match self.editing {
            Some(id) => list.update(id, &self.draft).await,
            None => list.create(&self.draft).await,
        };

        match &outcome {
            OperationOutcome::Success(_) => self.reset(),
            OperationOutcome::Failure {
                message,
                field_errors,
            } => {
                if field_errors.is_empty() {
                    self.submit_error = Some(message.clone());
                } else {
                    self.errors.merge(field_errors);
                }
            }
        }
        outcome
    }
}
