use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate;
use crate::db::contribution::ContributionStatus;
use crate::error::{LedgerError, LedgerResult};

/// Role carried by the identity claim. Any role the ledger does not know
/// about (the member layer also issues `executive`) gets member rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Member,
    Admin,
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Role::Admin,
            _ => Role::Member,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Member => "member".to_string(),
            Role::Admin => "admin".to_string(),
        }
    }
}

/// The trusted caller identity decoded from the auth layer's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Which contributions a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionScope {
    All,
    Only(ContributionStatus),
}

impl ContributionScope {
    pub fn status_filter(self) -> Option<ContributionStatus> {
        match self {
            ContributionScope::All => None,
            ContributionScope::Only(status) => Some(status),
        }
    }
}

pub fn require_admin(identity: &Identity, action: &str) -> LedgerResult<()> {
    if identity.is_admin() {
        return Ok(());
    }
    tracing::warn!(user_id = %identity.id, action, "admin action refused");
    Err(LedgerError::forbidden(format!("Only admins can {action}")))
}

/// Approved contributions are visible to every member; anything else is for
/// admins only. An empty filter counts as no filter.
pub fn contribution_scope(
    identity: &Identity,
    status_filter: Option<&str>,
) -> LedgerResult<ContributionScope> {
    let filter = status_filter.filter(|s| !s.is_empty());

    match filter {
        None if identity.is_admin() => Ok(ContributionScope::All),
        None => Ok(ContributionScope::Only(ContributionStatus::Approved)),
        Some(raw) => {
            if !identity.is_admin() && raw != ContributionStatus::Approved.as_str() {
                tracing::warn!(user_id = %identity.id, status = raw, "non-admin status filter refused");
                return Err(LedgerError::forbidden(
                    "Only admins can view non-approved contributions",
                ));
            }
            validate::parse_status_filter(raw).map(ContributionScope::Only)
        }
    }
}
