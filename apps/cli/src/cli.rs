//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nethra_core::{BillId, Money, ProductId};

use crate::commands::bill::LineSpec;
use crate::commands::history::LineEdit;

/// Nethra Billing command line client.
#[derive(Parser, Debug)]
#[command(name = "nethra", version, about = "Billing and invoicing for Nethra Food Products")]
pub struct Cli {
    /// Path to config file (default: platform config dir/config.toml).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Billing server root, overrides config and NETHRA_API_URL.
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Item master: the product catalog.
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },

    /// Create a bill.
    Bill {
        #[command(subcommand)]
        action: BillAction,
    },

    /// Bill history: list, view and edit stored bills.
    Bills {
        #[command(subcommand)]
        action: BillsAction,
    },

    /// Generate a bill's PDF and download, open, share or print it.
    Pdf(PdfArgs),

    /// Show or write the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemsAction {
    /// List every product.
    List,

    /// Products whose English or Tamil name contains QUERY.
    Search { query: String },

    /// Add a product.
    Add {
        /// Tamil name.
        #[arg(long)]
        name: String,
        /// English name.
        #[arg(long)]
        english: String,
        /// Pack size (default 500g).
        #[arg(long, default_value = "")]
        weight: String,
        /// Unit price in rupees, e.g. 50 or 49.50.
        #[arg(long)]
        price: Money,
    },

    /// Change fields of a product. Unset fields are kept.
    Update {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        english: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        price: Option<Money>,
    },

    /// Delete a product.
    Delete {
        id: ProductId,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BillAction {
    /// Create and save a new bill.
    Create(CreateBillArgs),
}

#[derive(Args, Debug)]
pub struct CreateBillArgs {
    /// Customer name.
    #[arg(long = "buyer")]
    pub buyer: String,

    /// 10-digit phone number.
    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// KEY:QTY[:PRICE], KEY being a product id or name. Repeatable.
    #[arg(long = "item", value_name = "KEY:QTY[:PRICE]")]
    pub items: Vec<LineSpec>,

    /// Invoice number (default: next number from the server).
    #[arg(long = "invoice-no")]
    pub invoice_number: Option<String>,

    /// Invoice date as DD/MM/YYYY (default: today).
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum BillsAction {
    /// List stored bills.
    List,

    /// Show one bill with its items.
    Show { id: BillId },

    /// Edit a stored bill. Item numbers are those shown by `bills show`.
    Edit(EditBillArgs),
}

#[derive(Args, Debug)]
pub struct EditBillArgs {
    pub id: BillId,

    #[arg(long = "buyer")]
    pub buyer: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long = "invoice-no")]
    pub invoice_number: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    /// Set a quantity: ITEM=QTY. Repeatable.
    #[arg(long = "qty", value_name = "ITEM=QTY")]
    pub quantities: Vec<LineEdit<i64>>,

    /// Set a unit price: ITEM=PRICE. Repeatable.
    #[arg(long = "price", value_name = "ITEM=PRICE")]
    pub prices: Vec<LineEdit<Money>>,

    /// Remove an item by number. Repeatable.
    #[arg(long = "remove", value_name = "ITEM")]
    pub remove: Vec<usize>,

    /// Add a product: KEY:QTY[:PRICE]. Repeatable.
    #[arg(long = "add", value_name = "KEY:QTY[:PRICE]")]
    pub add: Vec<LineSpec>,
}

#[derive(Args, Debug)]
pub struct PdfArgs {
    pub id: BillId,

    /// Save to the download directory.
    #[arg(long)]
    pub download: bool,

    /// Download and open in the platform viewer.
    #[arg(long)]
    pub open: bool,

    /// Hand to the share command (or print the path if none).
    #[arg(long)]
    pub share: bool,

    /// Send to the printer.
    #[arg(long)]
    pub print: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,

    /// Print the config file location.
    Path,

    /// Write the effective configuration to the config file.
    Init,
}
