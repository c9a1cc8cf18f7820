//! Tag endpoints and wire types.

use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::posts::Slug;
use super::response::Page;
use super::ApiClient;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub usage_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TagCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl ApiClient {
    /// `GET /tags` — paged listing.
    pub async fn list_tags(&self, page: u32, page_size: u32) -> ApiResult<Page<Tag>> {
        self.execute(
            self.get("/tags")
                .query(&[("page", page), ("page_size", page_size)]),
        )
        .await?
        .into_page(page, page_size)
    }

    /// `GET /tags/{id}`
    pub async fn get_tag(&self, id: &str) -> ApiResult<Tag> {
        self.execute(self.get(&format!("/tags/{id}")))
            .await?
            .into_data()
    }

    /// `POST /tags`
    pub async fn create_tag(&self, req: &TagCreateRequest) -> ApiResult<Tag> {
        self.execute(self.post("/tags").json(req)).await?.into_data()
    }

    /// `PUT /tags/{id}`
    pub async fn update_tag(&self, id: &str, req: &TagCreateRequest) -> ApiResult<Tag> {
        self.execute(self.put(&format!("/tags/{id}")).json(req))
            .await?
            .into_data()
    }

    /// `DELETE /tags/{id}`
    pub async fn delete_tag(&self, id: &str) -> ApiResult<()> {
        self.execute::<serde_json::Value>(self.delete(&format!("/tags/{id}")))
            .await?
            .into_unit()
    }
}
