use clap::Parser;
use lunchmoney::{Client, ParsedAmount};
use serde::Serialize;

use crate::{
    config::{AppConfig, Cli, Command},
    error::Result,
};

mod config;
mod error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "lunchmoney={level},lunchmoney_cli={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    run(&settings, cli).await
}

async fn run(settings: &AppConfig, cli: Cli) -> Result<()> {
    let client = Client::builder()
        .token(&settings.token)
        .base_url(&settings.base_url)
        .build()?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    match cli.command {
        Command::Crypto => {
            let assets = client.list_crypto().await?;
            if print_json(cli.json, &assets)? {
                return Ok(());
            }
            println!("Found {} crypto assets:", assets.len());
            for asset in assets {
                let balance = match asset.parsed_amount() {
                    Ok(amount) => amount.to_string(),
                    Err(err) => {
                        tracing::debug!("{}: {err}", asset.name);
                        format!("{} {}", asset.balance, asset.currency)
                    }
                };
                println!(
                    "  - {}: {balance} (source: {}, status: {})",
                    asset.name, asset.source, asset.status
                );
                if let Some(institution) = &asset.institution_name {
                    println!("    institution: {institution}");
                }
                if let Some(display_name) = &asset.display_name {
                    println!("    display name: {display_name}");
                }
                if let Some(to_base) = asset.to_base {
                    println!("    value in base currency: {to_base:.2}");
                }
            }
        }
        Command::Tags => {
            let tags = client.list_tags().await?;
            if print_json(cli.json, &tags)? {
                return Ok(());
            }
            for tag in tags {
                let archived = if tag.archived { " (archived)" } else { "" };
                println!("{:>8}  {}{archived}", tag.id, tag.name);
            }
        }
        Command::Categories => {
            let categories = client.list_categories().await?;
            if print_json(cli.json, &categories)? {
                return Ok(());
            }
            for category in categories {
                let kind = match (category.is_group, category.is_income) {
                    (true, _) => "group",
                    (false, true) => "income",
                    (false, false) => "expense",
                };
                println!("{:>8}  {:<8} {}", category.id, kind, category.name);
            }
        }
        Command::Transactions(args) => {
            let transactions = client.list_transactions(Some(&args.filters())).await?;
            if print_json(cli.json, &transactions)? {
                return Ok(());
            }
            for tx in &transactions {
                print_transaction(tx);
            }
        }
        Command::Transaction { id } => {
            let tx = client.get_transaction(id, None).await?;
            if !print_json(cli.json, &tx)? {
                print_transaction(&tx);
            }
        }
        Command::UpdateTransaction(args) => {
            let result = client.update_transaction(args.id, &args.update()).await?;
            if print_json(cli.json, &result)? {
                return Ok(());
            }
            println!("updated: {}", result.updated);
            if !result.split.is_empty() {
                let ids: Vec<String> = result.split.iter().map(i64::to_string).collect();
                println!("split into: {}", ids.join(", "));
            }
        }
    }

    Ok(())
}

fn print_transaction(tx: &lunchmoney::types::Transaction) {
    let amount = tx
        .parsed_amount()
        .map(|amount| amount.to_string())
        .unwrap_or_else(|_| format!("{} {}", tx.amount, tx.currency));
    println!(
        "{:>10}  {}  {:>20}  {:<9} {}",
        tx.id, tx.date, amount, tx.status, tx.payee
    );
}

fn print_json<T: Serialize>(enabled: bool, value: &T) -> Result<bool> {
    if enabled {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(enabled)
}
