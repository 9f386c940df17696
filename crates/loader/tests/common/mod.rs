//! Common test doubles for the loader integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden_cache::{
    BackingStore, BoundedStore, CacheKey, CacheNode, EvictionPolicyKind, SecurityCache,
    StoreListener,
};
use warden_core::{
    Right, RightSet, RuleState, SecurityAccess, SecurityAccessEntry, SecurityReference,
    SecurityRule, SecurityRuleEntry,
};
use warden_loader::{GroupResolver, RuleReader, SecurityCacheLoader, SettlementEngine};

/// Ordered record of collaborator calls shared by the doubles
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// References of a farm with two wikis
pub struct Farm {
    pub wiki: SecurityReference,
    pub space: SecurityReference,
    pub doc: SecurityReference,
    pub users: SecurityReference,
    pub alice: SecurityReference,
    pub bob: SecurityReference,
    pub admins: SecurityReference,
    pub other_wiki: SecurityReference,
    pub other_doc: SecurityReference,
    pub other_editors: SecurityReference,
}

impl Farm {
    pub fn new() -> Self {
        let wiki = SecurityReference::new_wiki("xwiki").unwrap();
        let space = wiki.space("Main").unwrap();
        let doc = space.document("WebHome").unwrap();
        let users = wiki.space("XWiki").unwrap();
        let alice = users.user("Alice").unwrap();
        let bob = users.user("Bob").unwrap();
        let admins = users.group("Admins").unwrap();
        let other_wiki = SecurityReference::new_wiki("sub").unwrap();
        let other_doc = other_wiki.space("Main").unwrap().document("WebHome").unwrap();
        let other_editors = other_wiki.space("XWiki").unwrap().group("Editors").unwrap();

        Self {
            wiki,
            space,
            doc,
            users,
            alice,
            bob,
            admins,
            other_wiki,
            other_doc,
            other_editors,
        }
    }
}

/// Rule reader over a fixed set of entries; unknown references have no rules
pub struct InMemoryRules {
    log: Arc<CallLog>,
    rules: HashMap<SecurityReference, Vec<SecurityRule>>,
    failing: HashSet<SecurityReference>,
    misdirect: HashMap<SecurityReference, SecurityReference>,
    pub reads: AtomicUsize,
}

impl InMemoryRules {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            rules: HashMap::new(),
            failing: HashSet::new(),
            misdirect: HashMap::new(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn with_rule(mut self, reference: &SecurityReference, rule: SecurityRule) -> Self {
        self.rules.entry(reference.clone()).or_default().push(rule);
        self
    }

    /// Reading `reference` fails
    pub fn failing_on(mut self, reference: &SecurityReference) -> Self {
        self.failing.insert(reference.clone());
        self
    }

    /// Reading `reference` returns the entry of `other`
    pub fn misdirecting(mut self, reference: &SecurityReference, other: &SecurityReference) -> Self {
        self.misdirect.insert(reference.clone(), other.clone());
        self
    }
}

#[async_trait]
impl RuleReader for InMemoryRules {
    async fn read_rules(&self, reference: &SecurityReference) -> anyhow::Result<SecurityRuleEntry> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.log.record(format!("read {reference}"));
        if self.failing.contains(reference) {
            anyhow::bail!("rule store unavailable");
        }
        let target = self.misdirect.get(reference).unwrap_or(reference);
        let rules = self.rules.get(target).cloned().unwrap_or_default();
        Ok(SecurityRuleEntry::new(target.clone(), rules))
    }
}

/// Group resolver over a fixed membership table
pub struct StaticGroups {
    log: Arc<CallLog>,
    memberships: HashMap<(SecurityReference, SecurityReference), Vec<SecurityReference>>,
}

impl StaticGroups {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            memberships: HashMap::new(),
        }
    }

    pub fn with_groups(
        mut self,
        user: &SecurityReference,
        wiki: &SecurityReference,
        groups: &[&SecurityReference],
    ) -> Self {
        self.memberships.insert(
            (user.clone(), wiki.clone()),
            groups.iter().map(|g| (*g).clone()).collect(),
        );
        self
    }
}

#[async_trait]
impl GroupResolver for StaticGroups {
    async fn groups_of(
        &self,
        user: &SecurityReference,
        wiki: &SecurityReference,
    ) -> anyhow::Result<Vec<SecurityReference>> {
        self.log.record(format!("groups {user} in {wiki}"));
        Ok(self
            .memberships
            .get(&(user.clone(), wiki.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Applies every matching rule from the farm down; later rules win,
/// deny wins within one level
pub struct LayeredSettlement {
    log: Arc<CallLog>,
}

impl LayeredSettlement {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self { log }
    }
}

pub fn settle_rules(
    user: &SecurityReference,
    groups: &[SecurityReference],
    entries: &[Arc<SecurityRuleEntry>],
) -> SecurityAccess {
    let mut access = SecurityAccess::default();
    for entry in entries {
        let mut allowed = RightSet::empty();
        let mut denied = RightSet::empty();
        for rule in entry.rules().iter().filter(|r| r.applies_to(user, groups)) {
            match rule.state() {
                RuleState::Allow => allowed = allowed.union(rule.rights()),
                RuleState::Deny => denied = denied.union(rule.rights()),
                RuleState::Undetermined => {}
            }
        }
        for right in allowed.iter() {
            access.allow(right);
        }
        for right in denied.iter() {
            access.deny(right);
        }
    }
    access
}

#[async_trait]
impl SettlementEngine for LayeredSettlement {
    async fn settle(
        &self,
        user: &SecurityReference,
        groups: &[SecurityReference],
        entries: &[Arc<SecurityRuleEntry>],
    ) -> anyhow::Result<SecurityAccessEntry> {
        let entity = entries
            .last()
            .map(|entry| entry.reference().clone())
            .ok_or_else(|| anyhow::anyhow!("no entries to settle"))?;
        let names: Vec<String> = groups.iter().map(ToString::to_string).collect();
        self.log
            .record(format!("settle {user} on {entity} as [{}]", names.join(", ")));
        Ok(SecurityAccessEntry::new(
            user.clone(),
            entity,
            settle_rules(user, groups, entries),
        ))
    }
}

/// Backing store that drops `victim` after every successful insertion,
/// as a concurrent invalidation would
pub struct EvictingStore {
    inner: BoundedStore<CacheKey, Arc<CacheNode>>,
    victim: CacheKey,
}

impl EvictingStore {
    pub fn new(victim: CacheKey) -> Self {
        Self {
            inner: BoundedStore::new(1000, EvictionPolicyKind::Lru),
            victim,
        }
    }
}

impl BackingStore<CacheKey, Arc<CacheNode>> for EvictingStore {
    fn get(&self, key: &CacheKey) -> Option<Arc<CacheNode>> {
        self.inner.get(key)
    }

    fn peek(&self, key: &CacheKey) -> Option<Arc<CacheNode>> {
        self.inner.peek(key)
    }

    fn insert_if_absent(&self, key: CacheKey, value: Arc<CacheNode>) -> Result<(), Arc<CacheNode>> {
        self.inner.insert_if_absent(key, value)?;
        self.inner.remove(&self.victim);
        Ok(())
    }

    fn insert(&self, key: CacheKey, value: Arc<CacheNode>) -> Option<Arc<CacheNode>> {
        self.inner.insert(key, value)
    }

    fn remove(&self, key: &CacheKey) -> Option<Arc<CacheNode>> {
        self.inner.remove(key)
    }

    fn remove_if(
        &self,
        key: &CacheKey,
        predicate: &dyn Fn(&Arc<CacheNode>) -> bool,
    ) -> Option<Arc<CacheNode>> {
        self.inner.remove_if(key, predicate)
    }

    fn drain(&self) -> Vec<(CacheKey, Arc<CacheNode>)> {
        self.inner.drain()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn subscribe(&self, listener: Arc<dyn StoreListener<CacheKey, Arc<CacheNode>>>) {
        self.inner.subscribe(listener);
    }
}

/// Collaborator doubles wired to one call log
pub struct Doubles {
    pub log: Arc<CallLog>,
    pub rules: Arc<InMemoryRules>,
    pub groups: Arc<StaticGroups>,
    pub settlement: Arc<LayeredSettlement>,
}

impl Doubles {
    /// Alice is an admin of the main wiki and an editor of the other one;
    /// admins may edit the main wiki, Bob is denied viewing its documents
    pub fn standard(farm: &Farm) -> Self {
        let log = Arc::new(CallLog::default());
        let rules = InMemoryRules::new(log.clone())
            .with_rule(
                &farm.wiki,
                SecurityRule::allow(RightSet::empty().with(Right::View).with(Right::Edit))
                    .with_group(farm.admins.clone()),
            )
            .with_rule(
                &farm.space,
                SecurityRule::deny(RightSet::empty().with(Right::View)).with_user(farm.bob.clone()),
            )
            .with_rule(
                &farm.other_wiki,
                SecurityRule::allow(RightSet::empty().with(Right::Comment))
                    .with_group(farm.other_editors.clone()),
            );
        let groups = StaticGroups::new(log.clone())
            .with_groups(&farm.alice, &farm.wiki, &[&farm.admins])
            .with_groups(&farm.alice, &farm.other_wiki, &[&farm.other_editors]);
        Self::with(log, rules, groups)
    }

    pub fn with(log: Arc<CallLog>, rules: InMemoryRules, groups: StaticGroups) -> Self {
        Self {
            settlement: Arc::new(LayeredSettlement::new(log.clone())),
            log,
            rules: Arc::new(rules),
            groups: Arc::new(groups),
        }
    }

    pub fn loader(&self, cache: SecurityCache) -> SecurityCacheLoader {
        SecurityCacheLoader::new(
            cache,
            self.rules.clone(),
            self.groups.clone(),
            self.settlement.clone(),
        )
    }
}
