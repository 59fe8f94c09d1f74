use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;
use crate::form::{EditForm, ProductForm};

/// Inventory dashboard for a PocketBase `products` collection.
#[derive(Parser, Debug)]
#[command(name = "inventory-dashboard", version)]
#[command(about = "Lists, adds, edits and deletes products and flags low stock")]
pub struct Args {
    /// TOML config file
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the record service
    #[arg(long, value_name = "URL", global = true)]
    pub url: Option<String>,

    /// Collection holding the products
    #[arg(long, value_name = "NAME", global = true)]
    pub collection: Option<String>,

    /// Use an in-memory sample inventory instead of the record service
    #[arg(long, global = true)]
    pub demo: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            base_url: self.url.clone(),
            collection: self.collection.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the full inventory table
    List,
    /// Show only products at or below their threshold
    LowStock,
    /// Add a product
    Add(AddArgs),
    /// Edit a product's name, price or stock
    Edit(EditArgs),
    /// Delete a product
    Delete {
        /// Record id
        id: String,
    },
    /// Interactive session that keeps the inventory in memory
    Shell,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,
    #[arg(long, allow_hyphen_values = true)]
    pub stock: String,
    /// Low-stock threshold (defaults to the configured default)
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<String>,
    #[arg(long, default_value = "")]
    pub category: String,
}

impl AddArgs {
    pub fn form(&self) -> ProductForm {
        ProductForm {
            name: self.name.clone(),
            price: self.price.clone(),
            stock: self.stock.clone(),
            low_stock_threshold: self.threshold.clone().unwrap_or_default(),
            category: self.category.clone(),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct EditArgs {
    /// Record id
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub stock: Option<String>,
}

impl EditArgs {
    pub fn form(&self) -> EditForm {
        EditForm {
            name: self.name.clone(),
            price: self.price.clone(),
            stock: self.stock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parses_add_with_global_flags() {
        let args = Args::try_parse_from([
            "inventory-dashboard",
            "add",
            "--name",
            "Lamp",
            "--price",
            "12.5",
            "--stock",
            "3",
            "--demo",
        ])
        .unwrap();
        assert!(args.demo);
        let Some(Command::Add(add)) = args.command else {
            panic!("expected add");
        };
        let form = add.form();
        assert_eq!(form.name, "Lamp");
        assert_eq!(form.low_stock_threshold, "");
    }

    #[test]
    fn test_parses_edit_and_defaults_to_no_command() {
        let args = Args::try_parse_from([
            "inventory-dashboard",
            "--url",
            "http://pb.local",
            "edit",
            "r00000000000001",
            "--stock",
            "-4",
        ])
        .unwrap();
        assert_eq!(args.overrides().base_url.as_deref(), Some("http://pb.local"));
        let Some(Command::Edit(edit)) = args.command else {
            panic!("expected edit");
        };
        assert_eq!(edit.id, "r00000000000001");
        assert_eq!(edit.form().stock.as_deref(), Some("-4"));

        let args = Args::try_parse_from(["inventory-dashboard"]).unwrap();
        assert!(args.command.is_none());
    }
}
