use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Something an authenticated caller is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Implies every other capability.
    Admin,
    DeleteUsers,
    UpdateUserAuth,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Admin => "admin",
            Capability::DeleteUsers => "delete-users",
            Capability::UpdateUserAuth => "update-user-auth",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Capability::Admin),
            "delete-users" => Some(Capability::DeleteUsers),
            "update-user-auth" => Some(Capability::UpdateUserAuth),
            _ => None,
        }
    }
}

/// The authenticated caller of a callable operation.
///
/// Built from a verified identity token. The capability set is derived from
/// the token's custom claims:
/// - `admin: true` or `isAdmin: true` grants [`Capability::Admin`]
/// - `capabilities: ["delete-users", ...]` grants the listed capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    uid: String,
    email: Option<String>,
    claims: Map<String, Value>,
    capabilities: BTreeSet<Capability>,
}

impl AuthContext {
    pub fn new(uid: impl Into<String>, email: Option<String>, claims: Map<String, Value>) -> Self {
        let capabilities = capabilities_from_claims(&claims);
        Self {
            uid: uid.into(),
            email,
            claims,
            capabilities,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&Capability::Admin) || self.capabilities.contains(&capability)
    }
}

fn capabilities_from_claims(claims: &Map<String, Value>) -> BTreeSet<Capability> {
    let mut capabilities = BTreeSet::new();

    let is_admin = ["admin", "isAdmin"]
        .iter()
        .any(|key| claims.get(*key).and_then(Value::as_bool).unwrap_or(false));
    if is_admin {
        capabilities.insert(Capability::Admin);
    }

    if let Some(Value::Array(listed)) = claims.get("capabilities") {
        capabilities.extend(
            listed
                .iter()
                .filter_map(Value::as_str)
                .filter_map(Capability::parse),
        );
    }

    capabilities
}
