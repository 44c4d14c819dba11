use api_types::category::{CategoriesResponse, Category};

use super::Client;
use crate::error::{ClientError, Result};

impl Client {
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let op = "get categories";
        let resp: CategoriesResponse = self
            .get(op, "/v1/categories", &Default::default())
            .await?;

        if let Some(message) = resp.error
            && !message.is_empty()
        {
            return Err(ClientError::Api {
                op: op.to_string(),
                message,
            });
        }

        Ok(resp.categories)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category> {
        let op = format!("get category {id}");
        self.get(&op, &format!("/v1/categories/{id}"), &Default::default())
            .await
    }
}
