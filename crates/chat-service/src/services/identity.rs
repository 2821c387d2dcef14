//! Identity service
//!
//! Turns a verified token subject into a known caller.

use chat_core::{Snowflake, User};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Identity service
pub struct IdentityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Look up the caller's user row.
    ///
    /// A token for a user that does not exist resolves to no identity.
    #[instrument(skip(self))]
    pub async fn resolve_caller(&self, user_id: Snowflake) -> ServiceResult<User> {
        match self.ctx.user_repo().find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                debug!(user_id = %user_id, "Token subject has no user row");
                Err(ServiceError::Unauthenticated)
            }
        }
    }
}
