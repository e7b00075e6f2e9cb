//! Controller actions and the roles guarding them

use crate::error::{Result, ScaffoldError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the CRUD operations a generated controller can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetById,
    GetAll,
    Post,
    Put,
    Patch,
    Delete,
}

impl Action {
    /// The fixed universe, in generation order
    pub const ALL: [Action; 6] = [
        Action::GetById,
        Action::GetAll,
        Action::Post,
        Action::Put,
        Action::Patch,
        Action::Delete,
    ];

    /// Name used inside the skeleton templates
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetById => "getById",
            Action::GetAll => "getAll",
            Action::Post => "post",
            Action::Put => "put",
            Action::Patch => "patch",
            Action::Delete => "delete",
        }
    }

    /// Kebab-case spelling accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            Action::GetById => "get-by-id",
            Action::GetAll => "get-all",
            Action::Post => "post",
            Action::Put => "put",
            Action::Patch => "patch",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Action {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted) || a.cli_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let supported: Vec<&str> = Action::ALL.iter().map(|a| a.name()).collect();
                ScaffoldError::config(format!(
                    "Action \"{}\" is not supported, only {} are supported.",
                    wanted,
                    supported.join(",")
                ))
            })
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Parse action names, skipping blanks
pub fn parse_exclusions<S: AsRef<str>>(names: &[S]) -> Result<Vec<Action>> {
    names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| !n.trim().is_empty())
        .map(Action::from_str)
        .collect()
}

/// Nested endpoints generated once per parent entity
pub const PARENT_ACTIONS: [&str; 2] = ["getAllByParent", "postByParent"];

/// The actions to scaffold for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionSet(Vec<Action>);

impl ActionSet {
    /// The full universe minus `excluded`, keeping universe order
    pub fn excluding(excluded: &[Action]) -> Self {
        Self(
            Action::ALL
                .into_iter()
                .filter(|a| !excluded.contains(a))
                .collect(),
        )
    }

    /// Parse exclusion names (`delete`, `get-by-id`, `getAll`, ...) and build the set
    pub fn from_exclusions<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Ok(Self::excluding(&parse_exclusions(names)?))
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(Action::name).collect()
    }

    /// Nested actions that make sense for this set: listing by parent needs
    /// `getAll`, creating under a parent needs `post`
    pub fn parent_actions(&self) -> Vec<&'static str> {
        let mut actions = Vec::new();
        if self.contains(Action::GetAll) {
            actions.push(PARENT_ACTIONS[0]);
        }
        if self.contains(Action::Post) {
            actions.push(PARENT_ACTIONS[1]);
        }
        actions
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::excluding(&[])
    }
}

/// Permission kinds a role is derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    All,
    Create,
    Read,
    Update,
    Delete,
}

impl RoleKind {
    pub const ALL: [RoleKind; 5] = [
        RoleKind::All,
        RoleKind::Create,
        RoleKind::Read,
        RoleKind::Update,
        RoleKind::Delete,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RoleKind::All => "all",
            RoleKind::Create => "create",
            RoleKind::Read => "read",
            RoleKind::Update => "update",
            RoleKind::Delete => "delete",
        }
    }
}

/// `ROLE_<ENTITY>_<KIND>` tokens for every permission kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSet {
    pub all: String,
    pub create: String,
    pub read: String,
    pub update: String,
    pub delete: String,
}

impl RoleSet {
    pub fn for_entity(simple_name: &str) -> Self {
        let role = |kind: RoleKind| {
            format!(
                "ROLE_{}_{}",
                simple_name.to_uppercase(),
                kind.key().to_uppercase()
            )
        };
        Self {
            all: role(RoleKind::All),
            create: role(RoleKind::Create),
            read: role(RoleKind::Read),
            update: role(RoleKind::Update),
            delete: role(RoleKind::Delete),
        }
    }

    pub fn get(&self, kind: RoleKind) -> &str {
        match kind {
            RoleKind::All => &self.all,
            RoleKind::Create => &self.create,
            RoleKind::Read => &self.read,
            RoleKind::Update => &self.update,
            RoleKind::Delete => &self.delete,
        }
    }
}
