//! Provider store
//!
//! In-memory, dependency-injected registry of payment-provider
//! configurations. The store is the sole owner of the provider collection
//! and of the "at most one active provider" invariant: every mutation runs
//! to completion under the write lock, so the deactivate-others-then-write
//! sequence cannot interleave with a concurrent create or update.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::models::{Provider, ProviderDraft, ProviderUpdate};

pub mod records;

pub use records::PaymentRecordStore;

/// Error type for store operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("provider {id} not found")]
    NotFound { id: u64 },
}

#[derive(Debug, Default)]
struct Inner {
    providers: BTreeMap<u64, Provider>,
    next_id: u64,
}

/// Keyed collection of provider configurations.
///
/// Cheap to clone; clones share the same underlying collection.
#[derive(Debug, Clone, Default)]
pub struct ProviderStore {
    inner: Arc<RwLock<Inner>>,
}

impl ProviderStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                providers: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// All providers in insertion (id) order.
    pub fn list(&self) -> Vec<Provider> {
        let inner = self.inner.read().unwrap();
        inner.providers.values().cloned().collect()
    }

    /// Look up a provider by id. Missing ids are not an error.
    pub fn get(&self, id: u64) -> Option<Provider> {
        let inner = self.inner.read().unwrap();
        inner.providers.get(&id).cloned()
    }

    /// The single active provider, if any.
    pub fn active(&self) -> Option<Provider> {
        let inner = self.inner.read().unwrap();
        inner.providers.values().find(|p| p.is_active).cloned()
    }

    /// Insert a new provider, assigning the next sequential id.
    ///
    /// When the draft is active, every other provider is deactivated in the
    /// same critical section before the insert.
    pub fn create(&self, draft: ProviderDraft) -> Provider {
        let mut inner = self.inner.write().unwrap();

        if draft.is_active {
            deactivate_all(&mut inner.providers, None);
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let provider = Provider {
            id,
            name: draft.name,
            kind: draft.kind,
            is_active: draft.is_active,
            is_test_mode: draft.is_test_mode,
            config: draft.config,
            max_installments: draft.max_installments,
        };
        inner.providers.insert(id, provider.clone());
        provider
    }

    /// Merge a partial update onto an existing provider.
    ///
    /// A supplied `config` replaces the stored one wholesale. Flipping
    /// `isActive` to true deactivates all other providers first, atomically
    /// with the write.
    pub fn update(&self, id: u64, update: ProviderUpdate) -> Result<Provider, StoreError> {
        let mut inner = self.inner.write().unwrap();

        let was_active = match inner.providers.get(&id) {
            Some(provider) => provider.is_active,
            None => return Err(StoreError::NotFound { id }),
        };
        if update.is_active == Some(true) && !was_active {
            deactivate_all(&mut inner.providers, Some(id));
        }

        let provider = inner
            .providers
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;
        if let Some(name) = update.name {
            provider.name = name;
        }
        if let Some(is_active) = update.is_active {
            provider.is_active = is_active;
        }
        if let Some(is_test_mode) = update.is_test_mode {
            provider.is_test_mode = is_test_mode;
        }
        if let Some(config) = update.config {
            provider.config = config;
        }
        if let Some(max_installments) = update.max_installments {
            provider.max_installments = max_installments;
        }

        Ok(provider.clone())
    }

    /// Remove a provider. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: u64) {
        let mut inner = self.inner.write().unwrap();
        inner.providers.remove(&id);
    }
}

fn deactivate_all(providers: &mut BTreeMap<u64, Provider>, except: Option<u64>) {
    for provider in providers.values_mut() {
        if Some(provider.id) != except {
            provider.is_active = false;
        }
    }
}
