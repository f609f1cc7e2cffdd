//! Admin users and CRUD permissions.
//!
//! Authentication itself happens in the hosting application. The engine only
//! needs to know who is asking (for field authorization and edit tracking)
//! and which CRUD operations they may perform.

use serde::{Deserialize, Serialize};

/// An authenticated admin user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// The user's primary key.
    pub id: u64,
    /// The display name.
    pub name: String,
    /// Role names, used by field authorization predicates.
    pub roles: Vec<String>,
}

impl AdminUser {
    /// Creates a user without roles.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roles: Vec::new(),
        }
    }

    /// Adds a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Returns `true` if the user has `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// The CRUD operations a user may perform on one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CrudPermissions {
    /// May create records.
    pub create: bool,
    /// May view records.
    pub read: bool,
    /// May update records.
    pub update: bool,
    /// May delete records.
    pub delete: bool,
}

impl Default for CrudPermissions {
    fn default() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }
}

impl CrudPermissions {
    /// Permissions allowing only reads.
    pub const fn read_only() -> Self {
        Self {
            create: false,
            read: true,
            update: false,
            delete: false,
        }
    }
}
