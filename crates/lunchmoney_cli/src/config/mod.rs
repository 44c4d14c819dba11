use clap::{Args, Parser, Subcommand};
use lunchmoney::{
    http::DEFAULT_BASE_URL,
    types::{TransactionFilters, UpdateTransaction},
};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/lunchmoney.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub token: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lunchmoney")]
#[command(about = "Read and update Lunch Money data from the terminal")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Log level for the client (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
    /// Print raw JSON instead of one line per record.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List crypto assets.
    Crypto,
    /// List tags.
    Tags,
    /// List categories.
    Categories,
    /// List transactions.
    Transactions(TransactionArgs),
    /// Show one transaction.
    Transaction {
        id: i64,
    },
    /// Update fields of one transaction.
    UpdateTransaction(UpdateArgs),
}

#[derive(Debug, Default, Args)]
pub struct TransactionArgs {
    /// First day, YYYY-MM-DD.
    #[arg(long)]
    pub start_date: Option<String>,
    /// Last day, YYYY-MM-DD.
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub category_id: Option<i64>,
    #[arg(long)]
    pub tag_id: Option<i64>,
    #[arg(long)]
    pub asset_id: Option<i64>,
    #[arg(long)]
    pub limit: Option<i64>,
    #[arg(long)]
    pub offset: Option<i64>,
    /// Show debits as negative amounts. Without the flag nothing is sent and
    /// the server default applies; an explicit `false` cannot be requested.
    #[arg(long)]
    pub debit_as_negative: bool,
}

impl TransactionArgs {
    pub fn filters(&self) -> TransactionFilters {
        TransactionFilters {
            tag_id: self.tag_id,
            category_id: self.category_id,
            asset_id: self.asset_id,
            offset: self.offset,
            limit: self.limit,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            debit_as_negative: self.debit_as_negative.then_some(true),
            ..Default::default()
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,
    /// New date, YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub payee: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub category_id: Option<i64>,
    /// cleared or uncleared.
    #[arg(long)]
    pub status: Option<String>,
}

impl UpdateArgs {
    pub fn update(&self) -> UpdateTransaction {
        UpdateTransaction {
            date: self.date.clone(),
            payee: self.payee.clone(),
            notes: self.notes.clone(),
            category_id: self.category_id,
            status: self.status.clone(),
            ..Default::default()
        }
    }
}

/// Merges the config file, `LUNCHMONEY_*` environment variables and CLI
/// overrides, in increasing priority.
pub fn load(cli: &Cli) -> Result<AppConfig> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LUNCHMONEY"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(level) = &cli.level {
        settings.level = level.clone();
    }
    if settings.token.trim().is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(settings)
}
