//! Guard chain ordering and self-protection coverage.

use super::*;
use crate::domain::ErrorCode;
use rstest::{fixture, rstest};

fn identity(id: i64, role: &str) -> Identity {
    Identity::new(
        UserId::new(id).expect("positive id"),
        Role::new(role).expect("valid role"),
        Username::new("staff.member").expect("valid username"),
    )
}

#[fixture]
fn admin() -> Identity {
    identity(7, ADMIN_ROLE)
}

#[rstest]
#[case(None, Err(AccessError::NotAuthenticated))]
#[case(Some(USER_ROLE), Err(AccessError::Forbidden { role: Role::user() }))]
#[case(Some(ADMIN_ROLE), Ok(()))]
fn admin_only_gate(#[case] role: Option<&str>, #[case] expected: Result<(), AccessError>) {
    let caller = role.map(|role| identity(3, role));
    let outcome = require_role(caller.as_ref(), &RoleSet::admin_only()).map(|_| ());
    assert_eq!(outcome, expected);
}

#[rstest]
#[case(ADMIN_ROLE, true)]
#[case(USER_ROLE, true)]
#[case("Admin", false)]
#[case("admin ", false)]
#[case("auditor", false)]
fn staff_roles_match_exactly(#[case] role: &str, #[case] allowed: bool) {
    let caller = Identity::new(
        UserId::new(3).expect("positive id"),
        Role(role.to_owned()),
        Username::new("staff.member").expect("valid username"),
    );
    let outcome = AccessPolicy::roles(RoleSet::staff()).evaluate(Some(&caller));
    assert_eq!(outcome.is_ok(), allowed);
}

#[rstest]
fn authenticated_policy_ignores_role() {
    let caller = identity(4, "auditor");
    let admitted = require_authenticated(Some(&caller)).expect("authenticated");
    assert_eq!(admitted, &caller);
    assert_eq!(
        require_authenticated(None),
        Err(AccessError::NotAuthenticated)
    );
}

#[rstest]
fn role_policy_always_checks_authentication_first() {
    let policy = AccessPolicy::roles(RoleSet::default());
    assert_eq!(
        policy.steps.first(),
        Some(&GuardStep::Authenticated),
        "authentication must lead the chain"
    );
    assert_eq!(policy.evaluate(None), Err(AccessError::NotAuthenticated));
}

#[rstest]
fn empty_allow_list_forbids_everyone(admin: Identity) {
    let policy = AccessPolicy::roles(RoleSet::default());
    assert!(matches!(
        policy.evaluate(Some(&admin)),
        Err(AccessError::Forbidden { .. })
    ));
}

#[rstest]
fn self_deletion_is_rejected_even_for_admins(admin: Identity) {
    let target = UserId::new(7).expect("positive id");
    assert!(require_role(Some(&admin), &RoleSet::admin_only()).is_ok());
    assert_eq!(
        ensure_not_self(&admin, target),
        Err(AccessError::SelfDeletion)
    );
}

#[rstest]
fn deleting_another_account_is_allowed(admin: Identity) {
    let target = UserId::new(8).expect("positive id");
    assert_eq!(ensure_not_self(&admin, target), Ok(()));
}

#[rstest]
#[case(AccessError::NotAuthenticated, ErrorCode::Unauthorized)]
#[case(AccessError::Forbidden { role: Role::user() }, ErrorCode::Forbidden)]
#[case(AccessError::SelfDeletion, ErrorCode::Forbidden)]
fn maps_to_domain_error_codes(#[case] error: AccessError, #[case] expected: ErrorCode) {
    assert_eq!(Error::from(error).code(), expected);
}

#[rstest]
fn self_deletion_message_is_user_facing() {
    let error = Error::from(AccessError::SelfDeletion);
    assert_eq!(error.message(), "Cannot delete your own account");
}

#[rstest]
#[case("", ValidationReason::Empty)]
#[case("   ", ValidationReason::Empty)]
#[case(" admin", ValidationReason::Malformed)]
fn role_rejects_blank_or_padded_tags(#[case] raw: &str, #[case] reason: ValidationReason) {
    let err = Role::new(raw).expect_err("invalid role");
    assert_eq!(err.reason(), reason);
}
