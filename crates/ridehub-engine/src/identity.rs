//! # Identity
//!
//! The engine does not authenticate anyone. It asks an [`IdentityProvider`]
//! who is signed in and refuses writes made on behalf of someone else.

use ridehub_core::ValidationError;

/// Source of the signed-in user's id.
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in.
    fn current_user_id(&self) -> Option<String>;
}

/// A fixed identity, for tests and tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        StaticIdentity {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        StaticIdentity { user_id: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}

/// Fails unless the signed-in user is `expected`.
pub fn require_user(
    identity: &dyn IdentityProvider,
    expected: &str,
    action: &str,
) -> Result<(), ValidationError> {
    match identity.current_user_id() {
        Some(id) if id == expected => Ok(()),
        _ => Err(ValidationError::Unauthenticated {
            action: action.to_string(),
        }),
    }
}
