//! # Roles and Capabilities
//!
//! One role enum with an explicit capability table. A privileged ledger
//! operation asks `role.allows(capability)`; nothing matches on role names.

use serde::{Deserialize, Serialize};

/// Privileged ledger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Create new supply.
    Mint,
    /// Destroy own supply.
    Burn,
    /// Grant and revoke roles.
    ManageRoles,
}

/// Role held by an account. Accounts without a role have no capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Full control, including role management.
    Owner,
    /// Supply management.
    Admin,
    /// May burn.
    Operator,
}

impl Role {
    /// Capabilities granted by this role.
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Owner => &[Capability::Mint, Capability::Burn, Capability::ManageRoles],
            Role::Admin => &[Capability::Mint, Capability::Burn],
            Role::Operator => &[Capability::Burn],
        }
    }

    /// Whether this role grants `capability`.
    pub fn allows(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}
