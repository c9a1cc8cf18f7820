//! Post endpoints and wire types.

use serde::{Deserialize, Serialize};

use super::categories::Category;
use super::error::ApiResult;
use super::response::Page;
use super::ApiClient;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn all() -> &'static [PostStatus] {
        &[PostStatus::Draft, PostStatus::Published, PostStatus::Archived]
    }

    pub fn id(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Published => "Published",
            PostStatus::Archived => "Archived",
        }
    }
}

/// Slug as delivered by the server: either a bare string or an object
/// wrapping the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slug {
    Plain(String),
    Wrapped { value: String },
}

impl Slug {
    pub fn as_str(&self) -> &str {
        match self {
            Slug::Plain(value) | Slug::Wrapped { value } => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    pub status: PostStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub likes_count: u64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub content: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl ApiClient {
    /// `GET /posts` — paged listing, optionally filtered by status.
    pub async fn list_posts(
        &self,
        page: u32,
        page_size: u32,
        status: Option<PostStatus>,
    ) -> ApiResult<Page<Post>> {
        let mut builder = self.get("/posts").query(&[("page", page), ("page_size", page_size)]);
        if let Some(status) = status {
            builder = builder.query(&[("status", status.id())]);
        }
        self.execute(builder).await?.into_page(page, page_size)
    }

    /// `GET /posts/{id}`
    pub async fn get_post(&self, id: &str) -> ApiResult<Post> {
        self.execute(self.get(&format!("/posts/{id}")))
            .await?
            .into_data()
    }

    /// `POST /posts`
    pub async fn create_post(&self, req: &PostCreateRequest) -> ApiResult<Post> {
        self.execute(self.post("/posts").json(req))
            .await?
            .into_data()
    }

    /// `PUT /posts/{id}`
    pub async fn update_post(&self, id: &str, req: &PostCreateRequest) -> ApiResult<Post> {
        self.execute(self.put(&format!("/posts/{id}")).json(req))
            .await?
            .into_data()
    }

    /// `DELETE /posts/{id}`
    pub async fn delete_post(&self, id: &str) -> ApiResult<()> {
        self.execute::<serde_json::Value>(self.delete(&format!("/posts/{id}")))
            .await?
            .into_unit()
    }

    /// `POST /posts/{id}/publish`
    pub async fn publish_post(&self, id: &str) -> ApiResult<Post> {
        self.execute(self.post(&format!("/posts/{id}/publish")))
            .await?
            .into_data()
    }

    /// `POST /posts/{id}/unpublish`
    pub async fn unpublish_post(&self, id: &str) -> ApiResult<Post> {
        self.execute(self.post(&format!("/posts/{id}/unpublish")))
            .await?
            .into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_both_wire_shapes() {
        let plain: Slug = serde_json::from_str(r#""hello-world""#).unwrap();
        assert_eq!(plain.as_str(), "hello-world");

        let wrapped: Slug = serde_json::from_str(r#"{"value": "hello-world"}"#).unwrap();
        assert_eq!(wrapped.as_str(), "hello-world");
    }

    #[test]
    fn post_deserializes_minimal_wire_shape() {
        let json = r#"{
            "_id": "p-1",
            "title": "First",
            "slug": "first",
            "content": "Body",
            "status": "draft",
            "tags": ["rust"],
            "views_count": 0,
            "likes_count": 0,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.category.is_none());
        assert!(post.published_at.is_none());
    }

    #[test]
    fn create_request_skips_absent_fields() {
        let req = PostCreateRequest {
            title: "First".to_string(),
            content: "Body".to_string(),
            slug: "first".to_string(),
            ..PostCreateRequest::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("excerpt"));
        assert!(!json.contains("category_id"));
    }
}
