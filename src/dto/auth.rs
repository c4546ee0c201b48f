use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::SessionUser;

#[derive(Deserialize, Debug, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: SessionUser,
    /// Where the storefront sends this role after signing in.
    pub redirect: String,
}
