//! Users and roles.
//!
//! Role checks on the client are advisory - they shape what a screen shows.
//! The backend authorizes every request from the bearer token it carries.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// A user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    ProductManager,
    Customer,
}

impl Role {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::ProductManager => "Product Manager",
            Self::Customer => "Customer",
        }
    }
}

/// A user account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub roles: Vec<Role>,
}

impl User {
    /// Whether the user holds a given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the user may use the admin panel at all.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.has_role(Role::Admin) || self.has_role(Role::ProductManager)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(roles: Vec<Role>) -> User {
        User {
            id: UserId::new(1),
            name: "Test".to_owned(),
            email: Email::parse("t@example.com").unwrap(),
            phone: None,
            roles,
        }
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&Role::ProductManager).unwrap(),
            "\"PRODUCT_MANAGER\""
        );
    }

    #[test]
    fn test_staff_check() {
        assert!(user(vec![Role::Admin]).is_staff());
        assert!(user(vec![Role::ProductManager]).is_staff());
        assert!(!user(vec![Role::Customer]).is_staff());
        assert!(user(vec![Role::Customer, Role::Admin]).is_staff());
    }
}
