//! Identity of the caller as resolved by the authentication layer.

use serde::{Deserialize, Serialize};

use crate::domain::types::{OrgId, TypeConstraintError};

/// Claims carried by the bearer token of an authenticated agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Organization every read and write of this user is scoped to.
    pub org_id: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Parses the organization claim.
    pub fn org_id(&self) -> Result<OrgId, TypeConstraintError> {
        self.org_id.parse()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
