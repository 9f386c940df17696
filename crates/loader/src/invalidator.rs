//! Maps rule and membership changes onto cache removals

use warden_cache::SecurityCache;
use warden_core::SecurityReference;

/// Change in the underlying rule store that invalidates cached entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChangeEvent {
    /// Rules defined on `reference` were edited
    RulesChanged { reference: SecurityReference },
    /// Members joined or left `group`
    GroupMembershipChanged {
        group: SecurityReference,
        members: Vec<SecurityReference>,
    },
    EntityDeleted { reference: SecurityReference },
    WikiDeleted { wiki: SecurityReference },
}

/// Applies [`RuleChangeEvent`]s to a security cache
#[derive(Debug, Clone)]
pub struct Invalidator {
    cache: SecurityCache,
}

impl Invalidator {
    pub fn new(cache: SecurityCache) -> Self {
        Self { cache }
    }

    /// Drop every entry the event makes stale, returning how many were dropped
    pub fn handle(&self, event: &RuleChangeEvent) -> usize {
        let dropped = match event {
            RuleChangeEvent::RulesChanged { reference }
            | RuleChangeEvent::EntityDeleted { reference } => self.cache.remove(reference),
            RuleChangeEvent::GroupMembershipChanged { group, members } => {
                // Former members hang below the group; new ones only know
                // their own stale group list
                self.cache.remove(group)
                    + members
                        .iter()
                        .map(|member| self.cache.remove(member))
                        .sum::<usize>()
            }
            RuleChangeEvent::WikiDeleted { wiki } => self.cache.remove(wiki),
        };

        tracing::info!(event = ?event, dropped, "Invalidated security cache entries");
        dropped
    }
}
