//! Category endpoints and wire types.
//!
//! Categories form a tree: every node carries its `children`, and the
//! listing endpoint returns the roots.

use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::ApiClient;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub path: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub children: Vec<Category>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Flattens a category tree depth-first, pairing each node with its depth.
///
/// Children are dropped from the flattened copies; the depth is what a
/// caller needs to indent a listing.
pub fn flatten_tree(roots: &[Category]) -> Vec<(usize, Category)> {
    fn walk(nodes: &[Category], depth: usize, out: &mut Vec<(usize, Category)>) {
        for node in nodes {
            let mut flat = node.clone();
            let children = std::mem::take(&mut flat.children);
            out.push((depth, flat));
            walk(&children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(roots, 0, &mut out);
    out
}

impl ApiClient {
    /// `GET /categories` — returns the category tree roots.
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.execute(self.get("/categories")).await?.into_data()
    }

    /// `GET /categories/{id}`
    pub async fn get_category(&self, id: &str) -> ApiResult<Category> {
        self.execute(self.get(&format!("/categories/{id}")))
            .await?
            .into_data()
    }

    /// `POST /categories`
    pub async fn create_category(&self, req: &CategoryCreateRequest) -> ApiResult<Category> {
        self.execute(self.post("/categories").json(req))
            .await?
            .into_data()
    }

    /// `PUT /categories/{id}`
    pub async fn update_category(
        &self,
        id: &str,
        req: &CategoryCreateRequest,
    ) -> ApiResult<Category> {
        self.execute(self.put(&format!("/categories/{id}")).json(req))
            .await?
            .into_data()
    }

    /// `DELETE /categories/{id}`
    pub async fn delete_category(&self, id: &str) -> ApiResult<()> {
        self.execute::<serde_json::Value>(self.delete(&format!("/categories/{id}")))
            .await?
            .into_unit()
    }
}
