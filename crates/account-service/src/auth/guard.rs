//! Two-tier authorization policy.
//!
//! Admins may act on any account. Everyone else may act only on the account
//! whose number matches their own.

use crate::errors::AccountError;
use crate::models::Account;
use crate::observability::metrics::record_authorization_decision;

/// Allow `caller` to act on resources owned by `target_owner_id`.
///
/// # Errors
///
/// Returns `AccountError::AuthorizationDenied` if the caller is neither an
/// admin nor the owner.
pub fn authorize(caller: &Account, target_owner_id: i32) -> Result<(), AccountError> {
    let basis = if caller.is_admin() {
        "admin"
    } else if caller.account_number == target_owner_id {
        "owner"
    } else {
        "none"
    };

    let allowed = basis != "none";
    tracing::debug!(
        target: "acct.auth.guard",
        caller = caller.account_number,
        target_owner = target_owner_id,
        basis = basis,
        allowed = allowed,
        "Authorization decision"
    );
    record_authorization_decision(if allowed { "allow" } else { "deny" }, basis);

    if allowed {
        Ok(())
    } else {
        Err(AccountError::AuthorizationDenied)
    }
}

/// Allow only admin callers.
///
/// # Errors
///
/// Returns `AccountError::AuthorizationDenied` for non-admin callers.
pub fn require_admin(caller: &Account) -> Result<(), AccountError> {
    let allowed = caller.is_admin();
    tracing::debug!(
        target: "acct.auth.guard",
        caller = caller.account_number,
        allowed = allowed,
        "Admin check"
    );

    if allowed {
        record_authorization_decision("allow", "admin");
        Ok(())
    } else {
        record_authorization_decision("deny", "none");
        Err(AccountError::AuthorizationDenied)
    }
}
