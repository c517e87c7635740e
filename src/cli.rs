//! # Command Line Front End
//!
//! One command per invocation. Each command drives the controllers in
//! [`crate::core`] and prints the resulting state; nothing here talks to the
//! network directly except `show`, which is a plain store lookup.

use std::io::{self, Write};

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::warn;

use crate::api::{Combination, InventorySummary, Product, ProductId, StoreError};
use crate::core::App;
use crate::core::editor::ProductEditor;
use crate::core::messages;
use crate::core::outcome::OperationOutcome;
use crate::core::resource::Resource;
use crate::core::search::SearchState;
use crate::core::sort::{SortState, Sortable, sort_keys, sorted};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Product catalog client")]
pub struct Args {
    /// Catalog API base URL (overrides the config file and CATALOG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all products
    List {
        /// Sort key; repeating the same key flips the direction
        #[arg(short, long = "sort", value_name = "KEY")]
        sort: Vec<String>,
    },
    /// Show one product
    Show { id: ProductId },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Update a product; omitted fields keep their current value
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete a product
    Delete {
        id: ProductId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show the inventory summary
    Summary,
    /// Find 2-3 product combinations whose price sum fits a budget
    Search {
        #[arg(allow_hyphen_values = true)]
        budget: String,
        /// Sort key for the results (products, size, total)
        #[arg(short, long = "sort", value_name = "KEY")]
        sort: Vec<String>,
    },
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct DraftArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
}

impl DraftArgs {
    fn apply(self, editor: &mut ProductEditor) {
        if let Some(name) = self.name {
            editor.set_name(name);
        }
        if let Some(description) = self.description {
            editor.set_description(description);
        }
        if let Some(price) = self.price {
            editor.set_price(price);
        }
        if let Some(stock) = self.stock {
            editor.set_stock_quantity(stock);
        }
    }
}

const PRODUCT_COLUMNS: [(&str, &str); 5] = [
    ("id", "ID"),
    ("name", "Name"),
    ("description", "Description"),
    ("price", "Price"),
    ("stock_quantity", "Stock"),
];

/// Runs one command. Returns `Ok(false)` when the command itself failed
/// (the reason has already been printed).
pub async fn run<W: Write>(app: &mut App, command: Command, out: &mut W) -> io::Result<bool> {
    match command {
        Command::List { sort } => {
            apply_sort_keys::<Product>(&mut app.sort, &sort);
            app.list.refresh().await;
            match app.list.state() {
                Resource::Ready(products) => {
                    print_products(out, &sorted(&products, &app.sort), &app.sort)?;
                    Ok(true)
                }
                state => print_unready(out, &state),
            }
        }
        Command::Show { id } => match app.store.get_product(id).await {
            Ok(product) => {
                print_product(out, &product)?;
                Ok(true)
            }
            Err(StoreError::NotFound) => {
                writeln!(out, "Product {id} not found")?;
                Ok(false)
            }
            Err(e) => {
                warn!("Error fetching product {id}: {e}");
                writeln!(out, "{}", messages::LOAD_PRODUCTS)?;
                Ok(false)
            }
        },
        Command::Create { fields } => {
            let mut editor = ProductEditor::new();
            fields.apply(&mut editor);
            let outcome = editor.submit(&app.list).await;
            report_save(out, &outcome, &editor, "Created")
        }
        Command::Update { id, fields } => {
            let current = match app.store.get_product(id).await {
                Ok(product) => product,
                Err(StoreError::NotFound) => {
                    writeln!(out, "Product {id} not found")?;
                    return Ok(false);
                }
                Err(e) => {
                    warn!("Error fetching product {id} for update: {e}");
                    writeln!(out, "{}", messages::SAVE_PRODUCT)?;
                    return Ok(false);
                }
            };
            let mut editor = ProductEditor::new();
            editor.edit(&current);
            fields.apply(&mut editor);
            let outcome = editor.submit(&app.list).await;
            report_save(out, &outcome, &editor, "Updated")
        }
        Command::Delete { id, yes } => {
            if !yes {
                writeln!(out, "Refusing to delete product {id} without --yes")?;
                return Ok(false);
            }
            match app.delete(id).await {
                OperationOutcome::Success(()) => {
                    writeln!(out, "Deleted product {id}")?;
                    Ok(true)
                }
                failure => print_failure(out, &failure),
            }
        }
        Command::Summary => {
            app.summary.refresh().await;
            match app.summary.state() {
                Resource::Ready(summary) => {
                    print_summary(out, &summary)?;
                    Ok(true)
                }
                state => print_unready(out, &state),
            }
        }
        Command::Search { budget, sort } => match app.search.search(&budget).await {
            SearchState::Found {
                budget,
                combinations,
            } => {
                if combinations.is_empty() {
                    writeln!(out, "No combinations found for a budget of {budget:.2}")?;
                    return Ok(true);
                }
                let mut order = SortState::new("");
                apply_sort_keys::<Combination>(&mut order, &sort);
                writeln!(out, "Combinations found ({})", combinations.len())?;
                for (i, combo) in sorted(&combinations, &order).iter().enumerate() {
                    writeln!(
                        out,
                        "{:>3}. {}  = {:.2}",
                        i + 1,
                        combo.products.join(" + "),
                        combo.total
                    )?;
                }
                Ok(true)
            }
            SearchState::Failed(message) => {
                writeln!(out, "{message}")?;
                Ok(false)
            }
            state => {
                writeln!(out, "Search did not complete: {state:?}")?;
                Ok(false)
            }
        },
    }
}

fn apply_sort_keys<T: Sortable>(state: &mut SortState, keys: &[String]) {
    for key in keys {
        if !sort_keys::<T>().any(|known| known == key) {
            warn!("Unknown sort key {key:?}, order left unchanged");
        }
        state.toggle(key);
    }
}

fn header(state: &SortState) -> String {
    PRODUCT_COLUMNS
        .iter()
        .map(|(key, label)| match state.indicator(key) {
            Some(direction) => format!("{label} {}", direction.arrow()),
            None => (*label).to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn print_products<W: Write>(out: &mut W, products: &[Product], sort: &SortState) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products registered");
    }
    writeln!(out, "{}", header(sort))?;
    for p in products {
        writeln!(
            out,
            "{} | {} | {} | {:.2} | {}",
            p.id,
            p.name,
            p.description.as_deref().unwrap_or("-"),
            p.price,
            p.stock_quantity
        )?;
    }
    let summary = InventorySummary::from_products(products);
    writeln!(
        out,
        "{} products, total inventory value {:.2}",
        products.len(),
        summary.total_inventory_value
    )
}

fn print_product<W: Write>(out: &mut W, p: &Product) -> io::Result<()> {
    writeln!(out, "ID:          {}", p.id)?;
    writeln!(out, "Name:        {}", p.name)?;
    writeln!(out, "Description: {}", p.description.as_deref().unwrap_or("-"))?;
    writeln!(out, "Price:       {:.2}", p.price)?;
    writeln!(out, "Stock:       {}", p.stock_quantity)?;
    writeln!(out, "Value:       {:.2}", p.inventory_value())
}

fn print_summary<W: Write>(out: &mut W, summary: &InventorySummary) -> io::Result<()> {
    writeln!(out, "Total inventory value: {:.2}", summary.total_inventory_value)?;
    match &summary.highest_value_product {
        Some(p) => writeln!(
            out,
            "Highest value product: {} ({:.2} = {:.2} x {} units)",
            p.name,
            p.inventory_value(),
            p.price,
            p.stock_quantity
        ),
        None => writeln!(out, "Highest value product: -"),
    }
}

fn print_unready<W: Write, T>(out: &mut W, state: &Resource<T>) -> io::Result<bool> {
    match state {
        Resource::Failed(message) => writeln!(out, "{message}")?,
        _ => writeln!(out, "Data is not available yet")?,
    }
    Ok(false)
}

fn print_failure<W: Write, T>(out: &mut W, outcome: &OperationOutcome<T>) -> io::Result<bool> {
    if let Some(message) = outcome.error_message() {
        writeln!(out, "{message}")?;
    }
    if let Some(errors) = outcome.field_errors() {
        for (field, message) in errors.iter() {
            writeln!(out, "  {field}: {message}")?;
        }
    }
    Ok(false)
}

fn report_save<W: Write>(
    out: &mut W,
    outcome: &OperationOutcome<Product>,
    editor: &ProductEditor,
    verb: &str,
) -> io::Result<bool> {
    match outcome {
        OperationOutcome::Success(product) => {
            writeln!(out, "{verb} product {} ({})", product.id, product.name)?;
            Ok(true)
        }
        OperationOutcome::Failure { message, .. } => {
            writeln!(out, "{}", editor.submit_error().unwrap_or(message.as_str()))?;
            for (field, message) in editor.errors().iter() {
                writeln!(out, "  {field}: {message}")?;
            }
            Ok(false)
        }
    }
}
