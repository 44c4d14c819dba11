use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod transaction {
    use super::*;

    /// Response body of `GET /v1/transactions`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<Transaction>,
    }

    /// A single transaction as returned by the server.
    ///
    /// Related records (category, recurring rule, asset, parent, group) are
    /// referenced by id only.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i64,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: String,
        pub payee: String,
        /// Signed decimal amount, e.g. `"-12.5000"`.
        pub amount: String,
        /// Lowercase or uppercase currency code as sent by the server.
        pub currency: String,
        #[serde(default)]
        pub notes: Option<String>,
        #[serde(default)]
        pub category_id: Option<i64>,
        #[serde(default)]
        pub recurring_id: Option<i64>,
        #[serde(default)]
        pub asset_id: Option<i64>,
        #[serde(default)]
        pub plaid_account_id: Option<i64>,
        pub status: String,
        #[serde(default)]
        pub is_group: bool,
        /// Set when this transaction belongs to a transaction group.
        #[serde(default)]
        pub group_id: Option<i64>,
        /// Set when this transaction was split off another one.
        #[serde(default)]
        pub parent_id: Option<i64>,
        #[serde(default)]
        pub external_id: Option<ExternalId>,
    }

    /// User-defined external id. Older records carry it as a number, newer
    /// ones as a string.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum ExternalId {
        Number(i64),
        Text(String),
    }

    impl std::fmt::Display for ExternalId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ExternalId::Number(id) => write!(f, "{id}"),
                ExternalId::Text(id) => f.write_str(id),
            }
        }
    }

    impl Transaction {
        /// The `date` field as a calendar date, if it is well formed.
        pub fn parsed_date(&self) -> Option<NaiveDate> {
            NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
        }
    }

    /// Query options for listing or fetching transactions.
    ///
    /// Every field is optional; absent fields are not sent.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionFilters {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tag_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recurring_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub plaid_account_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub asset_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub offset: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub limit: Option<i64>,
        /// `YYYY-MM-DD`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<String>,
        /// `YYYY-MM-DD`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub debit_as_negative: Option<bool>,
    }

    /// Partial update of an existing transaction. Only `Some` fields are sent.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UpdateTransaction {
        /// `YYYY-MM-DD`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub payee: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub asset_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recurring_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
        /// Either `cleared` or `uncleared`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub external_id: Option<String>,
    }

    /// Request body of `PUT /v1/transactions/{id}`.
    #[derive(Debug, Serialize)]
    pub struct UpdateTransactionRequest<'a> {
        pub transaction: &'a UpdateTransaction,
    }

    /// Response body of `PUT /v1/transactions/{id}`.
    ///
    /// `split` lists the ids of the transactions created when the update
    /// caused the server to split the original one.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UpdateTransactionResult {
        pub updated: bool,
        #[serde(default)]
        pub split: Vec<i64>,
    }
}

pub mod crypto {
    use super::*;

    /// Response body of `GET /v1/crypto`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CryptoResponse {
        pub crypto: Vec<Crypto>,
    }

    /// A crypto asset.
    ///
    /// Manual assets carry `id`, synced assets carry `zabo_account_id`; never both.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Crypto {
        #[serde(default)]
        pub id: Option<i64>,
        #[serde(default)]
        pub zabo_account_id: Option<i64>,
        /// `synced` or `manual`.
        pub source: String,
        pub name: String,
        #[serde(default)]
        pub display_name: Option<String>,
        pub balance: String,
        pub balance_as_of: DateTime<Utc>,
        pub currency: String,
        /// `active` or `error`.
        pub status: String,
        #[serde(default)]
        pub institution_name: Option<String>,
        pub created_at: DateTime<Utc>,
        /// Balance converted to the user's primary currency.
        #[serde(default)]
        pub to_base: Option<f64>,
    }

    /// Partial update of a manual crypto asset. Only `Some` fields are sent.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UpdateCrypto {
        /// Official or full name of the account, at most 45 characters.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        /// At most 25 characters.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub display_name: Option<String>,
        /// At most 50 characters.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub institution_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub balance: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
    }
}

pub mod category {
    use super::*;

    /// Response body of `GET /v1/categories`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        #[serde(default)]
        pub categories: Vec<Category>,
        /// Set by the server instead of `categories` on some failures.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub error: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub is_income: bool,
        #[serde(default)]
        pub exclude_from_budget: bool,
        #[serde(default)]
        pub exclude_from_totals: bool,
        #[serde(default)]
        pub updated_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub is_group: bool,
        #[serde(default)]
        pub group_id: Option<i64>,
    }
}

pub mod tag {
    use super::*;

    /// Response body of `GET /v1/tags`.
    ///
    /// The endpoint has been seen both wrapped and as a bare array.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum TagsResponse {
        Wrapped { tags: Vec<Tag> },
        Bare(Vec<Tag>),
    }

    impl TagsResponse {
        pub fn into_tags(self) -> Vec<Tag> {
            match self {
                Self::Wrapped { tags } | Self::Bare(tags) => tags,
            }
        }

        pub fn tags(&self) -> &[Tag] {
            match self {
                Self::Wrapped { tags } | Self::Bare(tags) => tags,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Tag {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub archived: bool,
    }
}
