use api_types::crypto::{Crypto, CryptoResponse, UpdateCrypto};

use super::Client;
use crate::error::Result;

impl Client {
    /// Lists synced and manual crypto assets.
    pub async fn list_crypto(&self) -> Result<Vec<Crypto>> {
        let op = "get crypto";
        let resp: CryptoResponse = self.get(op, "/v1/crypto", &Default::default()).await?;
        Ok(resp.crypto)
    }

    /// Updates a manually-managed crypto asset and returns its new state.
    ///
    /// Synced assets cannot be updated; the server answers with an error.
    pub async fn update_manual_crypto(&self, id: i64, update: &UpdateCrypto) -> Result<Crypto> {
        let op = format!("put crypto {id}");
        Self::check_input(&op, update)?;
        self.put(&op, &format!("/v1/crypto/manual/{id}"), update)
            .await
    }
}
