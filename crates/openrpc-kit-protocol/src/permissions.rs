use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque label naming who may invoke a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Every caller holds this role implicitly.
    pub const ANYONE: &'static str = "anyone";
    /// Any authenticated caller.
    pub const AUTHENTICATED: &'static str = "authenticated";
    /// Administrators.
    pub const ADMIN: &'static str = "admin";
    /// The caller acting on their own resources.
    pub const SELF: &'static str = "self";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn anyone() -> Self {
        Self::new(Self::ANYONE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anyone(&self) -> bool {
        self.0 == Self::ANYONE
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Ordered set of roles allowed to invoke a method.
///
/// Holding any one of the listed roles is enough. An empty set allows no
/// caller at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct Permissions {
    roles: Vec<Role>,
}

impl Permissions {
    /// Build a set, dropping duplicates but keeping first-seen order.
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let mut out: Vec<Role> = Vec::new();
        for role in roles {
            let role = role.into();
            if !out.contains(&role) {
                out.push(role);
            }
        }
        Self { roles: out }
    }

    /// The default: `{anyone}`.
    pub fn anyone() -> Self {
        Self {
            roles: vec![Role::anyone()],
        }
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }

    /// True if a caller holding `held` may invoke the method.
    pub fn allows(&self, held: &[Role]) -> bool {
        self.roles
            .iter()
            .any(|required| required.is_anyone() || held.contains(required))
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::anyone()
    }
}

impl From<Vec<Role>> for Permissions {
    fn from(roles: Vec<Role>) -> Self {
        Self::new(roles)
    }
}

impl From<Permissions> for Vec<Role> {
    fn from(permissions: Permissions) -> Self {
        permissions.roles
    }
}
