//! User roles.
//!
//! The string constants must match the `CHECK` constraint on `users.role` in
//! `20240301000001_create_users.sql`. [`Role`] orders them by privilege so
//! access checks read as "at least technician".

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_VIEWER: &str = "viewer";

/// Privilege level, ordered `Viewer < Technician < Manager < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Read-only access to assets and reports.
    Viewer,
    /// May record actions, failures and documents.
    Technician,
    /// May create, edit and delete assets.
    Manager,
    /// May delete assets and manage users.
    Admin,
}

impl Role {
    /// Parse a stored role name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_MANAGER => Some(Self::Manager),
            ROLE_TECHNICIAN => Some(Self::Technician),
            ROLE_VIEWER => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Manager => ROLE_MANAGER,
            Self::Technician => ROLE_TECHNICIAN,
            Self::Viewer => ROLE_VIEWER,
        }
    }

    /// Capitalized name used in permission messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Technician => "Technician",
            Self::Viewer => "Viewer",
        }
    }
}

/// Whether `role` meets `required`. Unknown role names meet nothing.
pub fn has_at_least(role: &str, required: Role) -> bool {
    Role::parse(role).is_some_and(|r| r >= required)
}
