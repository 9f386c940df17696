//! Security reference tree
//!
//! A [`SecurityReference`] identifies one node of the fixed security
//! hierarchy: the farm root, wikis, (nested) spaces, documents, objects,
//! and the user and group documents living in spaces. References are
//! immutable and cheap to clone; the whole parent chain is shared.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Kind of a node in the security hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Farm,
    Wiki,
    Space,
    Document,
    Object,
    User,
    Group,
}

impl ReferenceKind {
    /// Whether a node of this kind may hang below a node of `parent` kind
    #[must_use]
    pub const fn accepts_parent(self, parent: ReferenceKind) -> bool {
        matches!(
            (self, parent),
            (ReferenceKind::Wiki, ReferenceKind::Farm)
                | (ReferenceKind::Space, ReferenceKind::Wiki | ReferenceKind::Space)
                | (
                    ReferenceKind::Document | ReferenceKind::User | ReferenceKind::Group,
                    ReferenceKind::Space
                )
                | (
                    ReferenceKind::Object,
                    ReferenceKind::Document | ReferenceKind::User | ReferenceKind::Group
                )
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Farm => "farm",
            ReferenceKind::Wiki => "wiki",
            ReferenceKind::Space => "space",
            ReferenceKind::Document => "document",
            ReferenceKind::Object => "object",
            ReferenceKind::User => "user",
            ReferenceKind::Group => "group",
        }
    }

    const fn tag(self) -> char {
        match self {
            ReferenceKind::Farm => 'f',
            ReferenceKind::Wiki => 'w',
            ReferenceKind::Space => 's',
            ReferenceKind::Document => 'd',
            ReferenceKind::Object => 'o',
            ReferenceKind::User => 'u',
            ReferenceKind::Group => 'g',
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable node identifier in the security hierarchy
///
/// Equality, hashing and ordering are defined by [`SecurityReference::key`],
/// which encodes the kind and the full identity chain of the node.
#[derive(Clone)]
pub struct SecurityReference {
    inner: Arc<ReferenceInner>,
}

struct ReferenceInner {
    kind: ReferenceKind,
    name: String,
    parent: Option<SecurityReference>,
    key: String,
    depth: usize,
}

impl SecurityReference {
    /// The farm root
    #[must_use]
    pub fn farm() -> Self {
        Self {
            inner: Arc::new(ReferenceInner {
                kind: ReferenceKind::Farm,
                name: String::new(),
                parent: None,
                key: ReferenceKind::Farm.tag().to_string(),
                depth: 0,
            }),
        }
    }

    /// A wiki directly below the farm root
    pub fn new_wiki(name: impl Into<String>) -> Result<Self> {
        Self::farm().child(ReferenceKind::Wiki, name)
    }

    /// Build a child reference of the given kind
    pub fn child(&self, kind: ReferenceKind, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_reference(
                self.to_string(),
                format!("{kind} name must not be empty"),
            ));
        }
        if !kind.accepts_parent(self.kind()) {
            return Err(Error::invalid_reference(
                format!("{self}/{name}"),
                format!("a {kind} cannot be placed below a {}", self.kind()),
            ));
        }

        let mut key = String::with_capacity(self.inner.key.len() + name.len() + 3);
        key.push_str(&self.inner.key);
        key.push('/');
        key.push(kind.tag());
        key.push(':');
        escape_into(&name, &mut key);

        Ok(Self {
            inner: Arc::new(ReferenceInner {
                kind,
                name,
                parent: Some(self.clone()),
                key,
                depth: self.inner.depth + 1,
            }),
        })
    }

    pub fn space(&self, name: impl Into<String>) -> Result<Self> {
        self.child(ReferenceKind::Space, name)
    }

    pub fn document(&self, name: impl Into<String>) -> Result<Self> {
        self.child(ReferenceKind::Document, name)
    }

    pub fn object(&self, name: impl Into<String>) -> Result<Self> {
        self.child(ReferenceKind::Object, name)
    }

    pub fn user(&self, name: impl Into<String>) -> Result<Self> {
        self.child(ReferenceKind::User, name)
    }

    pub fn group(&self, name: impl Into<String>) -> Result<Self> {
        self.child(ReferenceKind::Group, name)
    }

    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        self.inner.kind
    }

    /// Entity name of this node (empty for the farm root)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&SecurityReference> {
        self.inner.parent.as_ref()
    }

    /// Stable textual identity: kind tags and escaped names from the root down
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Distance from the farm root
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.kind() == ReferenceKind::User
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind() == ReferenceKind::Group
    }

    /// Nearest wiki among this node and its ancestors, `None` for the farm
    #[must_use]
    pub fn wiki(&self) -> Option<&SecurityReference> {
        let mut current = Some(self);
        while let Some(reference) = current {
            if reference.kind() == ReferenceKind::Wiki {
                return Some(reference);
            }
            current = reference.parent();
        }
        None
    }

    /// The chain from the farm root down to and including this node
    #[must_use]
    pub fn ancestors(&self) -> Vec<SecurityReference> {
        let mut chain = Vec::with_capacity(self.depth() + 1);
        let mut current = Some(self);
        while let Some(reference) = current {
            chain.push(reference.clone());
            current = reference.parent();
        }
        chain.reverse();
        chain
    }

    /// Whether `self` is a strict ancestor of `other`
    #[must_use]
    pub fn is_ancestor_of(&self, other: &SecurityReference) -> bool {
        let mut current = other.parent();
        while let Some(reference) = current {
            if reference.depth() < self.depth() {
                return false;
            }
            if reference == self {
                return true;
            }
            current = reference.parent();
        }
        false
    }
}

fn escape_into(name: &str, out: &mut String) {
    for c in name.chars() {
        if c == '\\' || c == '/' {
            out.push('\\');
        }
        out.push(c);
    }
}

impl PartialEq for SecurityReference {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.key == other.inner.key
    }
}

impl Eq for SecurityReference {}

impl Hash for SecurityReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl PartialOrd for SecurityReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SecurityReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.key.cmp(&other.inner.key)
    }
}

impl fmt::Display for SecurityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(parent) = self.parent() else {
            return f.write_str("farm");
        };
        let separator = match (parent.kind(), self.kind()) {
            (ReferenceKind::Farm, _) => None,
            (ReferenceKind::Wiki, _) => Some(':'),
            (ReferenceKind::Space, _) => Some('.'),
            _ => Some('^'),
        };
        if let Some(separator) = separator {
            write!(f, "{parent}{separator}")?;
        }
        f.write_str(self.name())
    }
}

impl fmt::Debug for SecurityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", self.kind())
    }
}
