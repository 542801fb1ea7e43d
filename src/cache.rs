//! Read-through cache of list pages.
//!
//! Entries are keyed by organization, resource kind and the normalized list
//! parameters. Every mutation bumps a per-(organization, resource) generation
//! counter that is part of the key, so stale pages become unreachable at once
//! and age out of the store on their own.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use dashmap::DashMap;
use moka::sync::Cache;
use serde_json::Value;

use crate::domain::types::OrgId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Customers,
    Tickets,
    Templates,
    Notifications,
}

impl ResourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Customers => "customers",
            ResourceKind::Tickets => "tickets",
            ResourceKind::Templates => "templates",
            ResourceKind::Notifications => "notifications",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one cached page. It captures the generation current at the time it
/// was built, so a page loaded concurrently with a mutation is stored under a
/// key nobody will look up again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait ListCache: Send + Sync {
    fn key(&self, org_id: OrgId, kind: ResourceKind, fingerprint: &str) -> CacheKey;
    fn get(&self, key: &CacheKey) -> Option<Value>;
    fn put(&self, key: CacheKey, page: Value);
    /// Drops every cached page of `kind` for the organization.
    fn invalidate(&self, org_id: OrgId, kind: ResourceKind);
}

pub struct MokaListCache {
    pages: Cache<String, Value>,
    generations: DashMap<(OrgId, ResourceKind), u64>,
}

impl MokaListCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            pages: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            generations: DashMap::new(),
        }
    }

    fn generation(&self, org_id: OrgId, kind: ResourceKind) -> u64 {
        self.generations
            .get(&(org_id, kind))
            .map(|generation| *generation)
            .unwrap_or(0)
    }
}

impl ListCache for MokaListCache {
    fn key(&self, org_id: OrgId, kind: ResourceKind, fingerprint: &str) -> CacheKey {
        let generation = self.generation(org_id, kind);
        CacheKey(format!("{org_id}:{kind}:{generation}:{fingerprint}"))
    }

    fn get(&self, key: &CacheKey) -> Option<Value> {
        self.pages.get(key.as_str())
    }

    fn put(&self, key: CacheKey, page: Value) {
        self.pages.insert(key.0, page);
    }

    fn invalidate(&self, org_id: OrgId, kind: ResourceKind) {
        *self.generations.entry((org_id, kind)).or_insert(0) += 1;
        log::debug!("Invalidated cached {kind} pages of {org_id}");
    }
}
