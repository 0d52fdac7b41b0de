//! Admin bearer-token authentication extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use database::session::AuthenticatedUser;
use database::Role;

use crate::error::AdminError;
use crate::state::AppState;

/// The authenticated admin caller. Resolution happens per request against
/// the `user_roles` row, so demoting an admin locks them out immediately.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl AdminUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AdminError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AdminError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AdminError::Unauthorized)?;

        let auth = database::session::resolve_token(state.db.pool(), token)
            .await
            .map_err(|_| AdminError::Unauthorized)?;

        if auth.role != Role::Admin {
            return Err(AdminError::Forbidden);
        }

        Ok(AdminUser(auth))
    }
}
