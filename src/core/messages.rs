//! User-facing messages. Controllers surface these instead of transport
//! detail so the wording stays stable whatever the underlying failure.

pub const LOAD_PRODUCTS: &str = "Failed to load products";
pub const DELETE_PRODUCT: &str = "Failed to delete product";
pub const SAVE_PRODUCT: &str = "Failed to save product";
pub const LOAD_INVENTORY: &str = "Failed to load inventory summary";
pub const LOAD_COMBINATIONS: &str = "Failed to search combinations";
pub const INVALID_INPUT: &str = "Please correct the highlighted fields";

pub const REQUIRED_NAME: &str = "Name is required";
pub const REQUIRED_PRICE: &str = "Price is required";
pub const INVALID_PRICE: &str = "Price must be a number greater than 0";
pub const REQUIRED_STOCK: &str = "Stock quantity is required";
pub const INVALID_STOCK: &str = "Stock quantity must be a non-negative whole number";
pub const INVALID_BUDGET: &str = "Enter a value greater than 0";
