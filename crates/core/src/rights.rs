//! Rights and rule states

use serde::{Deserialize, Serialize};
use std::fmt;

/// A right that can be granted or denied on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Right {
    View,
    Edit,
    Comment,
    Delete,
    Admin,
    Register,
    Programming,
    Login,
    Script,
}

impl Right {
    pub const ALL: [Right; 9] = [
        Right::View,
        Right::Edit,
        Right::Comment,
        Right::Delete,
        Right::Admin,
        Right::Register,
        Right::Programming,
        Right::Login,
        Right::Script,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Right::View => "view",
            Right::Edit => "edit",
            Right::Comment => "comment",
            Right::Delete => "delete",
            Right::Admin => "admin",
            Right::Register => "register",
            Right::Programming => "programming",
            Right::Login => "login",
            Right::Script => "script",
        };
        f.write_str(name)
    }
}

/// Outcome of a rule or a settled decision for one right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleState {
    Allow,
    Deny,
    Undetermined,
}

/// Compact set of rights
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RightSet(u16);

impl RightSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn all() -> Self {
        Right::ALL.into_iter().collect()
    }

    #[must_use]
    pub const fn contains(self, right: Right) -> bool {
        self.0 & right.bit() != 0
    }

    pub fn insert(&mut self, right: Right) {
        self.0 |= right.bit();
    }

    pub fn remove(&mut self, right: Right) {
        self.0 &= !right.bit();
    }

    #[must_use]
    pub const fn with(self, right: Right) -> Self {
        Self(self.0 | right.bit())
    }

    #[must_use]
    pub const fn union(self, other: RightSet) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Right> {
        Right::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Right> for RightSet {
    fn from_iter<I: IntoIterator<Item = Right>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RightSet::empty(), |set, right| set.with(right))
    }
}

impl fmt::Debug for RightSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
