//! Role and permission predicates over the signed-in user

use crate::session::UserProfile;

/// Role and permission that satisfy every check.
pub const ADMIN: &str = "admin";

pub fn has_role(user: Option<&UserProfile>, role: &str) -> bool {
    match user {
        Some(user) if !user.role.is_empty() => user.role == role || user.role == ADMIN,
        _ => false,
    }
}

pub fn has_permission(user: Option<&UserProfile>, permission: &str) -> bool {
    match user {
        Some(user) => user
            .permissions
            .iter()
            .any(|p| p == permission || p == ADMIN),
        None => false,
    }
}

pub fn has_any_role(user: Option<&UserProfile>, roles: &[&str]) -> bool {
    roles.iter().any(|role| has_role(user, role))
}

/// An empty role list is vacuously satisfied, signed in or not.
pub fn has_all_roles(user: Option<&UserProfile>, roles: &[&str]) -> bool {
    roles.iter().all(|role| has_role(user, role))
}
