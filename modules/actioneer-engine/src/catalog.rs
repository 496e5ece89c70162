//! Configuration catalog access: rules, actions, and performers.
//!
//! The engine never mutates the catalog; it reads a validated snapshot per
//! evaluation cycle, optionally through a bounded TTL cache.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;

use actioneer_common::{Action, ActioneerError, ActionLabel, ActionRule};

use crate::performer::ActionPerformer;

/// A point-in-time view of the full configuration: every rule, every
/// action's resolution metadata, every performer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub action_rules: Vec<ActionRule>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub performers: Vec<ActionPerformer>,
}

impl CatalogSnapshot {
    /// Reject configurations that can never behave sensibly: contradictory
    /// rules and duplicate performer names.
    pub fn validate(&self) -> Result<(), ActioneerError> {
        for rule in &self.action_rules {
            rule.validate()?;
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.performers.len());
        for performer in &self.performers {
            if !seen.insert(performer.name()) {
                return Err(ActioneerError::Config(format!(
                    "duplicate performer name '{}' in catalog",
                    performer.name()
                )));
            }
        }
        Ok(())
    }

    /// Index the action metadata by label for the supersession resolver.
    pub fn actions_by_label(&self) -> BTreeMap<ActionLabel, Action> {
        self.actions
            .iter()
            .map(|action| (action.action_label.clone(), action.clone()))
            .collect()
    }
}

/// Read access to the externally-persisted configuration.
///
/// Implemented by FileCatalog (production), MemoryCatalog (tests), and
/// CachedCatalog (TTL wrapper around either).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load a validated snapshot.
    async fn load(&self) -> Result<CatalogSnapshot>;
}

#[async_trait]
impl<S: CatalogStore + ?Sized> CatalogStore for Arc<S> {
    async fn load(&self) -> Result<CatalogSnapshot> {
        (**self).load().await
    }
}

// ---------------------------------------------------------------------------
// FileCatalog — JSON document on disk
// ---------------------------------------------------------------------------

/// Catalog backed by a single JSON document.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogStore for FileCatalog {
    async fn load(&self) -> Result<CatalogSnapshot> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading catalog {}", self.path.display()))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", self.path.display()))?;
        snapshot.validate()?;
        info!(
            path = %self.path.display(),
            rules = snapshot.action_rules.len(),
            actions = snapshot.actions.len(),
            performers = snapshot.performers.len(),
            "Catalog loaded"
        );
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// MemoryCatalog — tests and embedded use
// ---------------------------------------------------------------------------

/// Fixed in-memory catalog. Validates once at construction.
pub struct MemoryCatalog {
    snapshot: CatalogSnapshot,
}

impl MemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Result<Self, ActioneerError> {
        snapshot.validate()?;
        Ok(Self { snapshot })
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn load(&self) -> Result<CatalogSnapshot> {
        Ok(self.snapshot.clone())
    }
}

// ---------------------------------------------------------------------------
// CachedCatalog — bounded TTL over any store
// ---------------------------------------------------------------------------

/// Serves a cached snapshot until the TTL lapses, then reloads from the
/// underlying store. Concurrent readers share the cached value; a refresh
/// failure surfaces to the caller instead of silently serving stale data
/// forever.
pub struct CachedCatalog<S: CatalogStore> {
    inner: S,
    ttl: Duration,
    cached: RwLock<Option<(Instant, CatalogSnapshot)>>,
}

impl<S: CatalogStore> CachedCatalog<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(None),
        }
    }
}

#[async_trait]
impl<S: CatalogStore> CatalogStore for CachedCatalog<S> {
    async fn load(&self) -> Result<CatalogSnapshot> {
        {
            let cached = self.cached.read().await;
            if let Some((loaded_at, snapshot)) = cached.as_ref() {
                if loaded_at.elapsed() < self.ttl {
                    return Ok(snapshot.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // Another writer may have refreshed while we waited for the lock.
        if let Some((loaded_at, snapshot)) = cached.as_ref() {
            if loaded_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = self.inner.load().await?;
        *cached = Some((Instant::now(), snapshot.clone()));
        Ok(snapshot)
    }
}
