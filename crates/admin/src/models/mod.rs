//! Session-stored types for the admin panel.

use serde::{Deserialize, Serialize};

use aims_core::{Email, Role, UserId};

/// Session-stored admin identity.
///
/// Holding a staff role here only unlocks the panel's screens; the backend
/// authorizes every mutation from the bearer token independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub roles: Vec<Role>,
}

impl CurrentAdmin {
    /// Whether this admin may manage products.
    #[must_use]
    pub fn can_manage_products(&self) -> bool {
        self.roles.contains(&Role::Admin) || self.roles.contains(&Role::ProductManager)
    }

    /// Whether this admin may manage users.
    #[must_use]
    pub fn can_manage_users(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// Session keys.
pub mod session_keys {
    /// Bearer token for backend calls.
    pub const TOKEN: &str = "token";

    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin(roles: Vec<Role>) -> CurrentAdmin {
        CurrentAdmin {
            id: UserId::new(1),
            name: "Staff".to_owned(),
            email: Email::parse("staff@aims.example").unwrap(),
            roles,
        }
    }

    #[test]
    fn test_product_manager_cannot_manage_users() {
        let pm = admin(vec![Role::ProductManager]);
        assert!(pm.can_manage_products());
        assert!(!pm.can_manage_users());
    }

    #[test]
    fn test_admin_can_do_both() {
        let a = admin(vec![Role::Admin]);
        assert!(a.can_manage_products());
        assert!(a.can_manage_users());
    }
}
