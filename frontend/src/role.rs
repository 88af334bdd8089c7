//! Roles handed out by the backend and the sets routes/menu entries require.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    /// Canonical (upper case) spelling, the one written to storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Role::User => 0b01,
            Role::Admin => 0b10,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; a Spring style `ROLE_` prefix is tolerated.
impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match name {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                                  RoleSet                                   */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);
    pub const ADMIN: RoleSet = RoleSet::of(&[Role::Admin]);
    pub const ANY: RoleSet = RoleSet::of(&[Role::User, Role::Admin]);

    pub const fn of(roles: &[Role]) -> RoleSet {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// A missing role is never admitted.
    pub fn admits(self, role: Option<Role>) -> bool {
        role.is_some_and(|r| self.contains(r))
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_casing() {
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert_eq!(" User ".parse(), Ok(Role::User));
        assert_eq!("ROLE_ADMIN".parse(), Ok(Role::Admin));
        assert_eq!(
            "manager".parse::<Role>(),
            Err(UnknownRole("manager".into()))
        );
    }

    #[test]
    fn displays_canonical_form() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::User.as_str(), "USER");
    }

    #[test]
    fn set_membership() {
        assert!(RoleSet::ADMIN.contains(Role::Admin));
        assert!(!RoleSet::ADMIN.contains(Role::User));
        assert!(RoleSet::ANY.contains(Role::User));
        assert!(!RoleSet::ANY.admits(None));
        assert!(!RoleSet::EMPTY.admits(Some(Role::Admin)));
        assert_eq!(RoleSet::ANY.iter().collect::<Vec<_>>(), vec![Role::User, Role::Admin]);
    }
}
