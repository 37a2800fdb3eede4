//! Auth domain models.

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

pub type UserId = TypedId<UserIdentity>;

/// The signed-in user as reported by `/auth/me` and `/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserIdentity {
    /// Name to greet the user with: their profile name when present,
    /// otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
