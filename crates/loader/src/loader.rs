//! Security cache loader
//!
//! Resolves the access of a user on an entity, filling the cache parent
//! before child from the collaborators. The cache reports races with
//! concurrent removals as errors; the loader retries the whole load a
//! bounded number of times.

use crate::collaborators::{GroupResolver, RuleReader, SettlementEngine};
use crate::config::LoaderConfig;
use crate::errors::{AuthorizationError, Collaborator, Result};
use std::sync::Arc;
use warden_cache::SecurityCache;
use warden_core::{Right, SecurityAccessEntry, SecurityReference, SecurityRuleEntry};

/// Fills the security cache on demand
pub struct SecurityCacheLoader {
    cache: SecurityCache,
    reader: Arc<dyn RuleReader>,
    resolver: Arc<dyn GroupResolver>,
    settlement: Arc<dyn SettlementEngine>,
    config: LoaderConfig,
}

impl SecurityCacheLoader {
    pub fn new(
        cache: SecurityCache,
        reader: Arc<dyn RuleReader>,
        resolver: Arc<dyn GroupResolver>,
        settlement: Arc<dyn SettlementEngine>,
    ) -> Self {
        Self {
            cache,
            reader,
            resolver,
            settlement,
            config: LoaderConfig::default(),
        }
    }

    /// Replace the retry configuration
    pub fn with_config(mut self, config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    #[must_use]
    pub fn cache(&self) -> &SecurityCache {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Settled access of `user` on `entity`, loading whatever is missing
    ///
    /// Fails with [`AuthorizationError::CacheLoadExhausted`] when every
    /// attempt raced with a removal of an entry it depended on.
    #[tracing::instrument(level = "debug", skip_all, fields(user = %user, entity = %entity))]
    pub async fn resolve_access(
        &self,
        user: &SecurityReference,
        entity: &SecurityReference,
    ) -> Result<Arc<SecurityAccessEntry>> {
        if !user.is_user() && !user.is_group() {
            return Err(warden_core::Error::invalid_reference(
                user.to_string(),
                "access can only be resolved for users and groups",
            )
            .into());
        }

        if let Some(entry) = self.cache.get_access(user, entity) {
            return Ok(entry);
        }

        let max_attempts = self.config.max_attempts;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let race = match self.load(user, entity).await {
                Ok(entry) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "Loaded security cache after retrying");
                    }
                    return Ok(entry);
                }
                Err(AuthorizationError::Cache(err)) if err.is_conflict() => {
                    // Another loader got there first
                    if let Some(entry) = self.cache.get_access(user, entity) {
                        return Ok(entry);
                    }
                    err
                }
                Err(AuthorizationError::Cache(err)) if err.is_parent_evicted() => err,
                Err(err) => return Err(err),
            };

            if attempt >= max_attempts {
                tracing::warn!(
                    user = %user,
                    entity = %entity,
                    attempts = attempt,
                    error = %race,
                    "Giving up loading the security cache"
                );
                return Err(AuthorizationError::CacheLoadExhausted {
                    user: user.clone(),
                    entity: entity.clone(),
                    attempts: attempt,
                    last: race,
                });
            }

            tracing::debug!(attempt, error = %race, "Security cache load raced, retrying");
            let delay = self.config.retry_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Whether `user` holds `right` on `entity`
    pub async fn check_access(
        &self,
        right: Right,
        user: &SecurityReference,
        entity: &SecurityReference,
    ) -> Result<bool> {
        let entry = self.resolve_access(user, entity).await?;
        Ok(entry.access().allows(right))
    }

    /// One load attempt
    async fn load(
        &self,
        user: &SecurityReference,
        entity: &SecurityReference,
    ) -> Result<Arc<SecurityAccessEntry>> {
        let entries = self.load_entity_chain(entity).await?;
        let (_, mut groups) = self.ensure_member(user).await?;

        if let (Some(home), Some(foreign)) = (user.wiki(), entity.wiki()) {
            if home != foreign {
                groups.extend(self.ensure_shadow(user, foreign).await?);
            }
        }
        groups.sort();
        groups.dedup();

        let settled = self
            .settlement
            .settle(user, &groups, &entries)
            .await
            .map_err(|e| AuthorizationError::upstream(Collaborator::SettlementEngine, entity, e))?;
        if settled.user() != user || settled.entity() != entity {
            return Err(AuthorizationError::mismatched(
                Collaborator::SettlementEngine,
                format!("{user}@{entity}"),
                format!("{}@{}", settled.user(), settled.entity()),
            ));
        }

        self.cache.add_access(settled.clone())?;
        tracing::debug!(groups = groups.len(), "Settled access");
        Ok(Arc::new(settled))
    }

    async fn read_rules(&self, reference: &SecurityReference) -> Result<SecurityRuleEntry> {
        let entry = self
            .reader
            .read_rules(reference)
            .await
            .map_err(|e| AuthorizationError::upstream(Collaborator::RuleReader, reference, e))?;
        if entry.reference() != reference {
            return Err(AuthorizationError::mismatched(
                Collaborator::RuleReader,
                reference,
                entry.reference(),
            ));
        }
        Ok(entry)
    }

    async fn groups_of(
        &self,
        user: &SecurityReference,
        wiki: &SecurityReference,
    ) -> Result<Vec<SecurityReference>> {
        let groups = self
            .resolver
            .groups_of(user, wiki)
            .await
            .map_err(|e| AuthorizationError::upstream(Collaborator::GroupResolver, user, e))?;
        if let Some(stray) = groups.iter().find(|g| !g.is_group()) {
            return Err(AuthorizationError::mismatched(
                Collaborator::GroupResolver,
                format!("groups of {user}"),
                stray,
            ));
        }
        Ok(groups)
    }

    /// Cached rule entry of a reference holding no users or groups
    async fn ensure_rules(
        &self,
        reference: &SecurityReference,
    ) -> Result<Arc<SecurityRuleEntry>> {
        if let Some(entry) = self.cache.get(reference) {
            return Ok(entry);
        }
        let entry = self.read_rules(reference).await?;
        self.cache.add(entry.clone())?;
        Ok(Arc::new(entry))
    }

    /// Cache `reference` and its ancestors; none of them may be a user or group
    async fn load_plain_chain(&self, reference: &SecurityReference) -> Result<()> {
        for link in reference.ancestors() {
            self.ensure_rules(&link).await?;
        }
        Ok(())
    }

    /// Rule entries of the entity chain, root first
    async fn load_entity_chain(
        &self,
        entity: &SecurityReference,
    ) -> Result<Vec<Arc<SecurityRuleEntry>>> {
        let mut entries = Vec::with_capacity(entity.depth() + 1);
        for link in entity.ancestors() {
            let entry = if link.is_user() || link.is_group() {
                self.ensure_member(&link).await?.0
            } else {
                self.ensure_rules(&link).await?
            };
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Cache a user or group along with its groups in its own wiki
    ///
    /// Groups are cached without memberships of their own; the resolver is
    /// expected to report nested memberships on the user.
    async fn ensure_member(
        &self,
        member: &SecurityReference,
    ) -> Result<(Arc<SecurityRuleEntry>, Vec<SecurityReference>)> {
        if let (Some(entry), Some(groups)) = (
            self.cache.get(member),
            self.cache.groups_for(member, None),
        ) {
            return Ok((entry, groups));
        }

        if let Some(space) = member.parent() {
            self.load_plain_chain(space).await?;
        }

        let groups = match member.wiki() {
            Some(home) if member.is_user() => self.groups_of(member, home).await?,
            _ => Vec::new(),
        };
        for group in &groups {
            self.ensure_group(group).await?;
        }

        let entry = self.read_rules(member).await?;
        self.cache.add_user(entry.clone(), groups.clone())?;
        Ok((Arc::new(entry), groups))
    }

    async fn ensure_group(&self, group: &SecurityReference) -> Result<()> {
        if self.cache.get(group).is_some() {
            return Ok(());
        }
        if let Some(space) = group.parent() {
            self.load_plain_chain(space).await?;
        }
        let entry = self.read_rules(group).await?;
        self.cache.add_user(entry, Vec::new())?;
        Ok(())
    }

    /// Cache the groups of `user` within the foreign `wiki`
    async fn ensure_shadow(
        &self,
        user: &SecurityReference,
        wiki: &SecurityReference,
    ) -> Result<Vec<SecurityReference>> {
        if let Some(groups) = self.cache.groups_for(user, Some(wiki)) {
            return Ok(groups);
        }

        let groups = self.groups_of(user, wiki).await?;
        for group in &groups {
            self.ensure_group(group).await?;
        }
        self.cache.add_shadow(user, wiki, groups.clone())?;
        Ok(groups)
    }
}

impl std::fmt::Debug for SecurityCacheLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityCacheLoader")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}
