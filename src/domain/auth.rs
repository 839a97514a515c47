//! Identity of the caller as asserted by the verified access token.

use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};

/// Claims carried by the identity provider's access token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Token subject; every row is owned by this id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
}

impl AuthenticatedUser {
    /// Owner id used to scope all repository calls.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        UserId::new(self.sub.as_str())
    }
}
