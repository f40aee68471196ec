//! Role-based access control for request handlers.
//!
//! An [`AccessPolicy`] is an ordered list of guard steps evaluated against
//! the caller's [`Identity`]. Every policy starts with the authentication
//! step; the only way to add a role step is [`AccessPolicy::roles`], which
//! prepends it. A role check that skips authentication therefore cannot be
//! constructed.
//!
//! Roles are opaque tags compared by exact string match. There is no
//! hierarchy and no wildcard.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::{Error, UserId, Username};
use super::validation::{ValidationError, ValidationReason};

/// Role tag granted to administrators.
pub const ADMIN_ROLE: &str = "admin";
/// Role tag granted to regular clinic staff.
pub const USER_ROLE: &str = "user";

/// An opaque, case-sensitive role tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Validate a role tag. Surrounding whitespace is not stripped.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::new("role", ValidationReason::Empty));
        }
        if value.trim() != value {
            return Err(ValidationError::new("role", ValidationReason::Malformed));
        }
        Ok(Self(value))
    }

    /// The administrator role.
    #[must_use]
    pub fn admin() -> Self {
        Self(ADMIN_ROLE.to_owned())
    }

    /// The regular staff role.
    #[must_use]
    pub fn user() -> Self {
        Self(USER_ROLE.to_owned())
    }

    /// Role tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allow-list of roles for a guarded operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Roles permitted to manage accounts.
    #[must_use]
    pub fn admin_only() -> Self {
        Self::from_iter([Role::admin()])
    }

    /// Roles permitted to work with clinical records.
    #[must_use]
    pub fn staff() -> Self {
        Self::from_iter([Role::admin(), Role::user()])
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The authenticated caller, threaded explicitly into guard checks.
///
/// Login establishes all three fields together; there is no partial
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
    username: Username,
}

impl Identity {
    /// Assemble an identity from its three parts.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, username: Username) -> Self {
        Self {
            user_id,
            role,
            username,
        }
    }

    /// Account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Granted role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Outcome of a failed guard check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No authenticated identity is present.
    #[error("login required")]
    NotAuthenticated,
    /// The identity's role is not in the allow-list.
    #[error("role '{role}' may not perform this action")]
    Forbidden { role: Role },
    /// The caller attempted to delete their own account.
    #[error("Cannot delete your own account")]
    SelfDeletion,
}

impl From<AccessError> for Error {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::NotAuthenticated => Self::unauthorized(value.to_string()),
            AccessError::Forbidden { .. } | AccessError::SelfDeletion => {
                Self::forbidden(value.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GuardStep {
    Authenticated,
    RoleIn(RoleSet),
}

impl GuardStep {
    fn check<'a>(&self, identity: Option<&'a Identity>) -> Result<&'a Identity, AccessError> {
        let identity = identity.ok_or(AccessError::NotAuthenticated)?;
        match self {
            Self::Authenticated => Ok(identity),
            Self::RoleIn(allowed) if allowed.contains(identity.role()) => Ok(identity),
            Self::RoleIn(_) => Err(AccessError::Forbidden {
                role: identity.role().clone(),
            }),
        }
    }
}

/// Ordered guard chain evaluated before a handler body runs.
///
/// # Examples
/// ```
/// use clinic::domain::access::{AccessError, AccessPolicy, Identity, Role, RoleSet};
/// use clinic::domain::{UserId, Username};
///
/// let policy = AccessPolicy::roles(RoleSet::admin_only());
/// assert_eq!(policy.evaluate(None), Err(AccessError::NotAuthenticated));
///
/// let admin = Identity::new(
///     UserId::new(1).unwrap(),
///     Role::admin(),
///     Username::new("root").unwrap(),
/// );
/// assert!(policy.evaluate(Some(&admin)).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    steps: Vec<GuardStep>,
}

impl AccessPolicy {
    /// Require an authenticated identity.
    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            steps: vec![GuardStep::Authenticated],
        }
    }

    /// Require authentication, then membership of `allowed`.
    #[must_use]
    pub fn roles(allowed: RoleSet) -> Self {
        Self {
            steps: vec![GuardStep::Authenticated, GuardStep::RoleIn(allowed)],
        }
    }

    /// Run every step in order and stop at the first failure.
    pub fn evaluate<'a>(&self, identity: Option<&'a Identity>) -> Result<&'a Identity, AccessError> {
        let mut admitted = None;
        for step in &self.steps {
            admitted = Some(step.check(identity)?);
        }
        admitted.ok_or(AccessError::NotAuthenticated)
    }
}

/// Succeed only when an identity is present.
pub fn require_authenticated(identity: Option<&Identity>) -> Result<&Identity, AccessError> {
    AccessPolicy::authenticated().evaluate(identity)
}

/// Authenticate, then require the identity's role to be in `allowed`.
pub fn require_role<'a>(
    identity: Option<&'a Identity>,
    allowed: &RoleSet,
) -> Result<&'a Identity, AccessError> {
    AccessPolicy::roles(allowed.clone()).evaluate(identity)
}

/// Reject account deletion aimed at the caller's own account.
pub fn ensure_not_self(identity: &Identity, target: UserId) -> Result<(), AccessError> {
    if identity.user_id() == target {
        return Err(AccessError::SelfDeletion);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
