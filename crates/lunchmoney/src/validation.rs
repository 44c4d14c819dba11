//! Declarative field checks for payloads sent to and received from the server.
//!
//! Every validated type lists its constraints in [`Validate::rules`]; the
//! rules are evaluated in order and the first violation is returned.

use api_types::{
    category::{CategoriesResponse, Category},
    crypto::{Crypto, CryptoResponse, UpdateCrypto},
    tag::{Tag, TagsResponse},
    transaction::{
        Transaction, TransactionFilters, TransactionsResponse, UpdateTransaction,
        UpdateTransactionResult,
    },
};
use thiserror::Error;

use crate::money::split_decimal;

pub const TRANSACTION_STATUSES: &[&str] = &["cleared", "uncleared"];
pub const CRYPTO_SOURCES: &[&str] = &["synced", "manual"];
pub const CRYPTO_STATUSES: &[&str] = &["active", "error"];

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefixes the field path, e.g. `date` -> `transactions[3].date`.
    fn nested(mut self, parent: &str) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self
    }
}

/// One constraint on one field (or on a group of fields).
///
/// Rules that look at an optional value pass when the value is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule<'a> {
    /// `YYYY-MM-DD` naming a real calendar day. Empty strings count as absent.
    Date {
        field: &'static str,
        value: Option<&'a str>,
    },
    /// Must be one of `allowed`.
    OneOf {
        field: &'static str,
        value: Option<&'a str>,
        allowed: &'static [&'static str],
    },
    /// At most `max` characters.
    MaxLen {
        field: &'static str,
        value: Option<&'a str>,
        max: usize,
    },
    /// Plain decimal numeral, see [`crate::money::parse_amount`].
    Decimal {
        field: &'static str,
        value: Option<&'a str>,
    },
    /// At least one of `fields` is set.
    AnyPresent {
        fields: &'static [&'static str],
        present: bool,
    },
    /// `field` is set exactly when `condition` holds.
    PresentIff {
        field: &'static str,
        present: bool,
        condition: bool,
        when: &'static str,
    },
}

impl Rule<'_> {
    pub fn check(&self) -> Result<(), ValidationError> {
        match *self {
            Rule::Date {
                field,
                value: Some(value),
            } if !value.is_empty() && !is_calendar_date(value) => Err(ValidationError::new(
                field,
                format!("{value:?} is not a YYYY-MM-DD date"),
            )),
            Rule::OneOf {
                field,
                value: Some(value),
                allowed,
            } if !allowed.iter().any(|candidate| *candidate == value) => Err(ValidationError::new(
                field,
                format!("{value:?} must be one of {}", allowed.join(", ")),
            )),
            Rule::MaxLen {
                field,
                value: Some(value),
                max,
            } if value.chars().count() > max => Err(ValidationError::new(
                field,
                format!("longer than {max} characters"),
            )),
            Rule::Decimal {
                field,
                value: Some(value),
            } if split_decimal(value).is_none() => Err(ValidationError::new(
                field,
                format!("{value:?} is not a decimal number"),
            )),
            Rule::AnyPresent {
                fields,
                present: false,
            } => Err(ValidationError::new(
                fields.join("|"),
                "at least one field must be set",
            )),
            Rule::PresentIff {
                field,
                present,
                condition,
                when,
            } if present != condition => {
                let reason = if condition {
                    format!("required when {when}")
                } else {
                    format!("must be absent unless {when}")
                };
                Err(ValidationError::new(field, reason))
            }
            _ => Ok(()),
        }
    }
}

fn is_calendar_date(value: &str) -> bool {
    value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
        && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Types with a declared rule table.
pub trait Validate {
    fn rules(&self) -> Vec<Rule<'_>>;

    /// Evaluates [`Validate::rules`] and stops at the first violation.
    fn validate(&self) -> Result<(), ValidationError> {
        self.rules().iter().try_for_each(Rule::check)
    }
}

/// Validates every element of a response list, tagging errors with the index.
fn validate_each<T: Validate>(parent: &str, items: &[T]) -> Result<(), ValidationError> {
    items.iter().enumerate().try_for_each(|(index, item)| {
        item.validate()
            .map_err(|err| err.nested(&format!("{parent}[{index}]")))
    })
}

impl Validate for Transaction {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![Rule::Date {
            field: "date",
            value: Some(&self.date),
        }]
    }
}

impl Validate for TransactionsResponse {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_each("transactions", &self.transactions)
    }
}

impl Validate for TransactionFilters {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            Rule::Date {
                field: "start_date",
                value: self.start_date.as_deref(),
            },
            Rule::Date {
                field: "end_date",
                value: self.end_date.as_deref(),
            },
        ]
    }
}

impl Validate for UpdateTransaction {
    fn rules(&self) -> Vec<Rule<'_>> {
        let present = self.date.is_some()
            || self.category_id.is_some()
            || self.payee.is_some()
            || self.currency.is_some()
            || self.asset_id.is_some()
            || self.recurring_id.is_some()
            || self.notes.is_some()
            || self.status.is_some()
            || self.external_id.is_some();

        vec![
            Rule::AnyPresent {
                fields: &[
                    "date",
                    "category_id",
                    "payee",
                    "currency",
                    "asset_id",
                    "recurring_id",
                    "notes",
                    "status",
                    "external_id",
                ],
                present,
            },
            Rule::Date {
                field: "date",
                value: self.date.as_deref(),
            },
            Rule::OneOf {
                field: "status",
                value: self.status.as_deref(),
                allowed: TRANSACTION_STATUSES,
            },
        ]
    }
}

impl Validate for UpdateTransactionResult {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }
}

impl Validate for Crypto {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            Rule::OneOf {
                field: "source",
                value: Some(&self.source),
                allowed: CRYPTO_SOURCES,
            },
            Rule::OneOf {
                field: "status",
                value: Some(&self.status),
                allowed: CRYPTO_STATUSES,
            },
            Rule::PresentIff {
                field: "id",
                present: self.id.is_some(),
                condition: self.source == "manual",
                when: "source is manual",
            },
            Rule::PresentIff {
                field: "zabo_account_id",
                present: self.zabo_account_id.is_some(),
                condition: self.source == "synced",
                when: "source is synced",
            },
            Rule::Decimal {
                field: "balance",
                value: Some(&self.balance),
            },
        ]
    }
}

impl Validate for CryptoResponse {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_each("crypto", &self.crypto)
    }
}

impl Validate for UpdateCrypto {
    fn rules(&self) -> Vec<Rule<'_>> {
        let present = self.name.is_some()
            || self.display_name.is_some()
            || self.institution_name.is_some()
            || self.balance.is_some()
            || self.currency.is_some();

        vec![
            Rule::AnyPresent {
                fields: &[
                    "name",
                    "display_name",
                    "institution_name",
                    "balance",
                    "currency",
                ],
                present,
            },
            Rule::MaxLen {
                field: "name",
                value: self.name.as_deref(),
                max: 45,
            },
            Rule::MaxLen {
                field: "display_name",
                value: self.display_name.as_deref(),
                max: 25,
            },
            Rule::MaxLen {
                field: "institution_name",
                value: self.institution_name.as_deref(),
                max: 50,
            },
            Rule::Decimal {
                field: "balance",
                value: self.balance.as_deref(),
            },
        ]
    }
}

impl Validate for Category {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }
}

impl Validate for CategoriesResponse {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_each("categories", &self.categories)
    }
}

impl Validate for Tag {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }
}

impl Validate for TagsResponse {
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_each("tags", self.tags())
    }
}
