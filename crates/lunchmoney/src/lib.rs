//! Typed client for the Lunch Money personal-finance API.
//!
//! ```rust,no_run
//! use lunchmoney::{Client, money::ParsedAmount};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("token")?;
//! for asset in client.list_crypto().await? {
//!     println!("{}: {}", asset.name, asset.parsed_amount()?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod money;
pub mod query;
pub mod validation;

pub use client::{Client, ClientBuilder};
pub use error::{ClientError, Result};
pub use money::{Currency, CurrencyError, MonetaryAmount, ParsedAmount, parse_amount};
pub use validation::{Validate, ValidationError};

pub mod types {
    pub use api_types::{
        category::{CategoriesResponse, Category},
        crypto::{Crypto, CryptoResponse, UpdateCrypto},
        tag::{Tag, TagsResponse},
        transaction::{
            ExternalId, Transaction, TransactionFilters, TransactionsResponse,
            UpdateTransaction, UpdateTransactionResult,
        },
    };
}
