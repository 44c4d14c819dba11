use api_types::tag::{Tag, TagsResponse};

use super::Client;
use crate::error::Result;

impl Client {
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let resp: TagsResponse = self.get("get tags", "/v1/tags", &Default::default()).await?;
        Ok(resp.into_tags())
    }
}
