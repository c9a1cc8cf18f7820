//! User administration endpoints (admin-only server-side).

use serde::Serialize;

use super::error::ApiResult;
use super::response::Page;
use super::ApiClient;
use crate::session::{Role, UserProfile};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLockRequest {
    pub locked: bool,
}

impl ApiClient {
    /// `GET /users` — paged listing.
    pub async fn list_users(&self, page: u32, page_size: u32) -> ApiResult<Page<UserProfile>> {
        self.execute(
            self.get("/users")
                .query(&[("page", page), ("page_size", page_size)]),
        )
        .await?
        .into_page(page, page_size)
    }

    /// `POST /users/register`
    pub async fn register_user(&self, req: &RegisterRequest) -> ApiResult<UserProfile> {
        self.execute(self.post("/users/register").json(req))
            .await?
            .into_data()
    }

    /// `PATCH /users/{id}/lock`
    pub async fn lock_user(&self, id: &str, locked: bool) -> ApiResult<UserProfile> {
        self.execute(
            self.patch(&format!("/users/{id}/lock"))
                .json(&UserLockRequest { locked }),
        )
        .await?
        .into_data()
    }
}
