//! # Command Line
//!
//! clap derive definitions for the `storefront` binary.
//!
//! ```text
//! storefront [--config PATH] [--ephemeral] [--json] [-y] [-v] <COMMAND>
//!
//!   products      browse the catalog (search, category, sort, page)
//!   login         sign in
//!   register      create an account and sign in
//!   logout        clear identity and cart
//!   whoami        show the signed-in identity
//!   cart          add | show
//!   admin         stats | products | orders | users | export
//!   config        show | init | path
//!   shell         interactive loop over the commands above
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storefront_core::table::{OrderColumn, ProductColumn, UserColumn};
use storefront_core::{OrderStatus, Role, SortKey, UserStatus};

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront shop and admin console")]
pub struct Cli {
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Confirm destructive actions
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Print responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse the product catalog
    Products(BrowseArgs),

    /// Sign in
    Login {
        #[arg(short, long, default_value = "")]
        email: String,

        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(short = 'c', long)]
        confirm_password: String,
    },

    /// Sign out and empty the cart
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Admin dashboard (admin role required)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Inspect or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Interactive shell; catalog and dashboard state persist between lines
    Shell,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct BrowseArgs {
    /// Search name, description and brand
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category slug, or "all"
    #[arg(short, long)]
    pub category: Option<String>,

    /// featured | price-low | price-high | rating | newest | title
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// One of 4, 8, 12, 16, 20
    #[arg(long)]
    pub page_size: Option<usize>,

    /// 1-based page number
    #[arg(short, long)]
    pub page: Option<usize>,

    /// List the category slugs instead of products
    #[arg(long)]
    pub categories: bool,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Add a catalog product by id
    Add { id: u64 },

    /// Show the cart and its total
    Show,
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum AdminAction {
    /// Dashboard totals
    Stats,

    Products {
        #[command(subcommand)]
        action: AdminProductAction,
    },

    Orders {
        #[command(subcommand)]
        action: AdminOrderAction,
    },

    Users {
        #[command(subcommand)]
        action: AdminUserAction,
    },

    /// Write the filtered table as CSV
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminProductAction {
    List(ProductTableArgs),

    /// Create a product
    Add(ProductFormArgs),

    /// Edit a product; unspecified fields keep their current value
    Edit {
        id: u64,

        #[command(flatten)]
        form: ProductFormArgs,
    },

    /// Delete a product (needs --yes)
    Delete { id: u64 },
}

#[derive(Debug, Subcommand)]
pub enum AdminOrderAction {
    List(OrderTableArgs),

    /// Change an order's status
    Status { id: u64, status: OrderStatus },

    /// Delete an order (needs --yes)
    Delete { id: u64 },
}

#[derive(Debug, Subcommand)]
pub enum AdminUserAction {
    List(UserTableArgs),

    /// Mark the selected users active
    Activate(UserSelection),

    /// Mark the selected users inactive (needs --yes)
    Deactivate(UserSelection),

    /// Delete the selected users (needs --yes)
    Delete(UserSelection),
}

#[derive(Debug, Subcommand)]
pub enum ExportTarget {
    Users {
        #[command(flatten)]
        table: UserTableArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    Products {
        #[command(flatten)]
        table: ProductTableArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    Orders {
        #[command(flatten)]
        table: OrderTableArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// File or directory; a directory gets a dated file name. Stdout if omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

// -----------------------------------------------------------------------------
// Table arguments
// -----------------------------------------------------------------------------

/// Repeating `--sort` on the same column flips its direction.
#[derive(Debug, Clone, Default, Args)]
pub struct UserTableArgs {
    /// Search name, email and phone
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long)]
    pub role: Option<Role>,

    #[arg(long)]
    pub status: Option<UserStatus>,

    #[arg(long, value_name = "COLUMN")]
    pub sort: Vec<UserColumn>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProductTableArgs {
    /// Search name, description and SKU
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long, value_name = "COLUMN")]
    pub sort: Vec<ProductColumn>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct OrderTableArgs {
    /// Search customer and email
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long)]
    pub status: Option<OrderStatus>,

    #[arg(long, value_name = "COLUMN")]
    pub sort: Vec<OrderColumn>,
}

/// Rows to act on: explicit ids (each toggles), or every visible row.
#[derive(Debug, Clone, Default, Args)]
pub struct UserSelection {
    pub ids: Vec<u64>,

    /// Select every row passing the filters
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub table: UserTableArgs,
}

// -----------------------------------------------------------------------------
// Product form
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Args)]
pub struct ProductFormArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Decimal amount, e.g. 49.99
    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub stock: Option<String>,

    /// Picking a category clears the brand
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    /// Image URL
    #[arg(long, conflicts_with = "image_file")]
    pub image: Option<String>,

    /// Image file, stored inline as a data: URL
    #[arg(long, value_name = "PATH")]
    pub image_file: Option<PathBuf>,

    #[arg(long)]
    pub featured: Option<bool>,

    #[arg(long)]
    pub sku: Option<String>,

    /// Specification entry, e.g. --spec color=black
    #[arg(long = "spec", value_name = "KEY=VALUE", value_parser = parse_spec)]
    pub specs: Vec<(String, String)>,
}

fn parse_spec(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_lowercase(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{}`", raw)),
    }
}

// =============================================================================
// Config
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}
