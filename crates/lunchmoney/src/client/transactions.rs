use api_types::transaction::{
    Transaction, TransactionFilters, TransactionsResponse, UpdateTransaction,
    UpdateTransactionRequest, UpdateTransactionResult,
};

use super::Client;
use crate::error::Result;

impl Client {
    /// Lists transactions matching `filters` (all of them when `None`).
    pub async fn list_transactions(
        &self,
        filters: Option<&TransactionFilters>,
    ) -> Result<Vec<Transaction>> {
        let op = "get transactions";
        let query = Self::query(op, filters)?;
        let resp: TransactionsResponse = self.get(op, "/v1/transactions", &query).await?;
        Ok(resp.transactions)
    }

    /// Fetches one transaction. `filters` only affects rendering options such
    /// as `debit_as_negative`.
    pub async fn get_transaction(
        &self,
        id: i64,
        filters: Option<&TransactionFilters>,
    ) -> Result<Transaction> {
        let op = format!("get transaction {id}");
        let query = Self::query(&op, filters)?;
        self.get(&op, &format!("/v1/transactions/{id}"), &query)
            .await
    }

    /// Applies a partial update.
    ///
    /// The server may split the transaction as a side effect; the ids of the
    /// resulting transactions are in [`UpdateTransactionResult::split`].
    pub async fn update_transaction(
        &self,
        id: i64,
        update: &UpdateTransaction,
    ) -> Result<UpdateTransactionResult> {
        let op = format!("update transaction {id}");
        Self::check_input(&op, update)?;
        self.put(
            &op,
            &format!("/v1/transactions/{id}"),
            &UpdateTransactionRequest {
                transaction: update,
            },
        )
        .await
    }
}
