//! # User Service
//!
//! Sign-up and the checks that guard every user and admin request.
//!
//! ```text
//!   authenticate(header)                 authorize_admin(header)
//!     │                                    │
//!     ├── no bearer token ──► 401          ├── authenticate ──► User
//!     ├── verify fails ─────► 401          ├── no admin row ──► 403
//!     ├── unknown user ─────► 403          │
//!     └── User                             └── (User, Admin)
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use pasar_core::{Admin, NewUser, User};
use pasar_db::UserGateway;

use crate::auth::{extract_bearer_token, AuthError, TokenVerifier};
use crate::error::{ApiError, ApiResult};

/// User use cases over any [`UserGateway`].
pub struct UserService<G> {
    gateway: G,
    verifier: Arc<dyn TokenVerifier>,
}

impl<G: UserGateway> UserService<G> {
    pub fn new(gateway: G, verifier: Arc<dyn TokenVerifier>) -> Self {
        UserService { gateway, verifier }
    }

    /// Registers a shopper together with an empty cart.
    ///
    /// ## Errors
    /// `Conflict` when the email is already registered.
    pub async fn sign_up(&self, new_user: &NewUser) -> ApiResult<User> {
        if self.gateway.get_user_by_email(&new_user.email).await?.is_some() {
            return Err(ApiError::conflict("user already exist"));
        }

        let user = self.gateway.create_user(new_user, false).await?;
        info!(uid = %user.uid, "User signed up");
        Ok(user)
    }

    pub async fn get_user_by_uid(&self, uid: &str) -> ApiResult<Option<User>> {
        Ok(self.gateway.get_user_by_uid(uid).await?)
    }

    pub async fn get_user_by_auth_uid(&self, auth_uid: &str) -> ApiResult<Option<User>> {
        Ok(self.gateway.get_user_by_auth_uid(auth_uid).await?)
    }

    pub async fn get_admin_by_user_id(&self, user_id: i64) -> ApiResult<Option<Admin>> {
        Ok(self.gateway.get_admin_by_user_id(user_id).await?)
    }

    /// Resolves an `Authorization` header value to a registered user.
    pub async fn authenticate(&self, authorization: &str) -> ApiResult<User> {
        let token = extract_bearer_token(authorization).ok_or(AuthError::MissingToken)?;
        let identity = self.verifier.verify(token).map_err(|e| {
            warn!(error = %e, "Rejected access token");
            e
        })?;

        match self.gateway.get_user_by_uid(&identity.user_uid).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_uid = %identity.user_uid, "Token for unknown user");
                Err(ApiError::forbidden())
            }
        }
    }

    /// Like [`authenticate`](Self::authenticate), but only for admins.
    pub async fn authorize_admin(&self, authorization: &str) -> ApiResult<(User, Admin)> {
        let user = self.authenticate(authorization).await?;

        match self.gateway.get_admin_by_user_id(user.id).await? {
            Some(admin) => Ok((user, admin)),
            None => {
                warn!(uid = %user.uid, "Admin access denied");
                Err(ApiError::forbidden())
            }
        }
    }
}
