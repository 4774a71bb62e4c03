//! CLI argument parsing and command definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use stockroom_domain::MovementType;

/// Stockroom - command line client for the inventory backend
#[derive(Parser, Debug)]
#[command(name = "stockroom", version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// Backend base URL; overrides the config file
    #[arg(long, env = "STOCKROOM_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Configuration file path (default: ./stockroom.toml if present)
    #[arg(short, long, env = "STOCKROOM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "warn",
        env = "STOCKROOM_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, default_value = "text", env = "STOCKROOM_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),

    /// End the session and tell the backend
    Logout,

    /// Show the signed-in user, profile and permissions
    Whoami,

    /// Products
    #[command(subcommand)]
    Products(ProductCommands),

    /// Inventory movements
    #[command(subcommand)]
    Movements(MovementCommands),

    /// Suppliers
    #[command(subcommand)]
    Suppliers(SupplierCommands),

    /// Purchase orders
    #[command(subcommand)]
    Orders(OrderCommands),

    /// Locations
    #[command(subcommand)]
    Locations(LocationCommands),

    /// Inventory report
    Report(ReportArgs),
}

/// Arguments for `login`.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Password; read from stdin when omitted
    #[arg(short, long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// `products` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProductCommands {
    /// List products
    List(ProductListArgs),
    /// Show one product
    Get {
        /// Product id
        id: i64,
    },
    /// Search-as-you-type suggestions
    Suggest {
        /// Partial name or SKU, at least two characters
        query: String,
    },
}

/// Arguments for `products list`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProductListArgs {
    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only active (true) or inactive (false) products
    #[arg(long)]
    pub active: Option<bool>,

    /// Only products running low
    #[arg(long)]
    pub low_stock: bool,

    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

/// `movements` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MovementCommands {
    /// List movements
    List(MovementListArgs),
}

/// Arguments for `movements list`.
#[derive(Args, Debug, Clone, Default)]
pub struct MovementListArgs {
    /// Only this product
    #[arg(long)]
    pub product: Option<i64>,

    /// Only this direction
    #[arg(long = "type", value_enum)]
    pub movement_type: Option<MovementKind>,

    /// Earliest date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only this location
    #[arg(long)]
    pub location: Option<i64>,

    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

/// `suppliers` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SupplierCommands {
    /// List suppliers
    List {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// `orders` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OrderCommands {
    /// List purchase orders
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Receive an approved order into stock
    Receive {
        /// Order id
        id: i64,
    },
}

/// `locations` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum LocationCommands {
    /// List all locations
    List,
}

/// Arguments for `report`.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Only show stock levels at or below this quantity
    #[arg(long)]
    pub low_stock: Option<i64>,
}

/// Movement direction as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MovementKind {
    /// Goods received
    In,
    /// Goods shipped or sold
    Out,
    /// Stock count correction
    Adj,
}

impl From<MovementKind> for MovementType {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::In => Self::In,
            MovementKind::Out => Self::Out,
            MovementKind::Adj => Self::Adjustment,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}
