use axum::extract::FromRequestParts;

use crate::{
    error::AppError,
    models::{Role, SessionUser},
    state::AppState,
};

/// The signed-in identity, read from the profile's session record.
///
/// Role checks here are advisory: the session record is whatever the
/// profile holds, so this gates UI flows, not access.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
    pub vendor_brand: Option<String>,
}

impl From<SessionUser> for AuthUser {
    fn from(session: SessionUser) -> Self {
        Self {
            user_id: session.id,
            role: session.role,
            vendor_brand: session.vendor_brand,
        }
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

pub fn ensure_vendor(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Vendor)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state
            .accounts
            .current_session()?
            .ok_or(AppError::Unauthorized)?;
        Ok(session.into())
    }
}
