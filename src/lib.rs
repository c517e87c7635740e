//! Catalog library exports for the CLI and for testing

pub mod api;
pub mod cli;
pub mod core;

#[cfg(test)]
pub mod test_support;
