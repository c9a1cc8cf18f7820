//! Authentication endpoints.

use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::ApiClient;
use crate::session::UserProfile;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ApiClient {
    /// `POST /auth/login` — exchanges credentials for a bearer token.
    ///
    /// Does not touch the session store; the caller decides whether to keep
    /// the token.
    pub async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        self.execute(self.post("/auth/login").json(req))
            .await?
            .into_data()
    }

    /// `GET /users/profile` — fetches the signed-in user's profile.
    pub async fn get_profile(&self) -> ApiResult<UserProfile> {
        self.execute(self.get("/users/profile")).await?.into_data()
    }

    /// `POST /users/change-password`
    pub async fn change_password(&self, req: &ChangePasswordRequest) -> ApiResult<()> {
        self.execute::<serde_json::Value>(self.post("/users/change-password").json(req))
            .await?
            .into_unit()
    }
}
