//! Authorization layer: role permissions and ownership checks.
//!
//! Handlers run these before touching the store so a denied request never
//! reaches a write.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::types::Role;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const DEFAULT_DENIED: &str = "You do not have permission to perform this action.";

pub trait Permission {
    fn has_permission(&self, user: Option<&AuthUser>) -> bool;

    /// Message returned with the 403
    fn denied_message(&self) -> &'static str {
        DEFAULT_DENIED
    }

    /// 401 when nobody is logged in, 403 when the logged-in user lacks the permission
    fn check(&self, user: Option<&AuthUser>) -> Result<(), ApiError> {
        match user {
            None => Err(ApiError::unauthorized(NOT_AUTHENTICATED)),
            Some(u) if !self.has_permission(Some(u)) => {
                tracing::warn!("Permission denied for user {} ({})", u.id, u.role);
                Err(ApiError::forbidden(self.denied_message()))
            }
            Some(_) => Ok(()),
        }
    }
}

pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
    fn has_permission(&self, user: Option<&AuthUser>) -> bool {
        user.is_some()
    }
}

/// Authenticated and role == participant
pub struct IsParticipant;

impl Permission for IsParticipant {
    fn has_permission(&self, user: Option<&AuthUser>) -> bool {
        user.map_or(false, |u| u.role == Role::Participant)
    }
}

/// Authenticated and role == visitor
pub struct IsVisitor;

impl Permission for IsVisitor {
    fn has_permission(&self, user: Option<&AuthUser>) -> bool {
        user.map_or(false, |u| u.role == Role::Visitor)
    }
}

/// Same checks as `P` with a resource-specific 403 message
pub struct WithMessage<P> {
    pub inner: P,
    pub message: &'static str,
}

impl<P: Permission> Permission for WithMessage<P> {
    fn has_permission(&self, user: Option<&AuthUser>) -> bool {
        self.inner.has_permission(user)
    }

    fn denied_message(&self) -> &'static str {
        self.message
    }
}

/// Ownership check: only the stored owner/author may mutate
pub fn ensure_owner(user: &AuthUser, owner_id: i64, message: &'static str) -> Result<(), ApiError> {
    if user.id == owner_id {
        Ok(())
    } else {
        tracing::warn!("User {} tried to modify a resource owned by {}", user.id, owner_id);
        Err(ApiError::forbidden(message))
    }
}
