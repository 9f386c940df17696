//! Unit tests for the security cache

mod concurrent;

use super::SecurityCache;
use warden_core::{
    Right, RightSet, SecurityAccess, SecurityAccessEntry, SecurityReference, SecurityRuleEntry,
};

/// References of a small two-wiki farm
pub(super) struct Farm {
    pub farm: SecurityReference,
    pub wiki: SecurityReference,
    pub space: SecurityReference,
    pub doc: SecurityReference,
    pub users: SecurityReference,
    pub alice: SecurityReference,
    pub admins: SecurityReference,
    pub other_wiki: SecurityReference,
    pub other_doc: SecurityReference,
    pub other_editors: SecurityReference,
}

impl Farm {
    pub fn new() -> Self {
        let farm = SecurityReference::farm();
        let wiki = SecurityReference::new_wiki("xwiki").unwrap();
        let space = wiki.space("Main").unwrap();
        let doc = space.document("WebHome").unwrap();
        let users = wiki.space("XWiki").unwrap();
        let alice = users.user("Alice").unwrap();
        let admins = users.group("Admins").unwrap();
        let other_wiki = SecurityReference::new_wiki("sub").unwrap();
        let other_space = other_wiki.space("Main").unwrap();
        let other_doc = other_space.document("WebHome").unwrap();
        let other_editors = other_wiki.space("XWiki").unwrap().group("Editors").unwrap();

        Self {
            farm,
            wiki,
            space,
            doc,
            users,
            alice,
            admins,
            other_wiki,
            other_doc,
            other_editors,
        }
    }
}

pub(super) fn rules(reference: &SecurityReference) -> SecurityRuleEntry {
    SecurityRuleEntry::empty(reference.clone())
}

pub(super) fn access(user: &SecurityReference, entity: &SecurityReference) -> SecurityAccessEntry {
    SecurityAccessEntry::new(
        user.clone(),
        entity.clone(),
        SecurityAccess::new(RightSet::empty().with(Right::View), RightSet::empty()),
    )
}

/// Cache every ancestor of `reference` and the reference itself
pub(super) fn add_chain(cache: &SecurityCache, reference: &SecurityReference) {
    for link in reference.ancestors() {
        cache.add(rules(&link)).unwrap();
    }
}

/// Cache `doc` and `alice` (member of `admins`) plus their access entry
pub(super) fn populate(cache: &SecurityCache, farm: &Farm) {
    add_chain(cache, &farm.doc);
    add_chain(cache, &farm.users);
    cache.add_user(rules(&farm.admins), vec![]).unwrap();
    cache
        .add_user(rules(&farm.alice), vec![farm.admins.clone()])
        .unwrap();
    cache.add_access(access(&farm.alice, &farm.doc)).unwrap();
}
