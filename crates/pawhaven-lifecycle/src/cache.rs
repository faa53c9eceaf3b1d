// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory cache of list reads, one per collection.
//!
//! Each cache holds the last result for a handful of query keys. Every
//! mutation of the collection marks all entries stale so the next read
//! refetches; the contact mark-read path patches the affected record in place
//! instead. A fetch that overlaps an invalidation is stored stale. Reads get a
//! single automatic retry; writes never go through here.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;

use tokio::sync::RwLock;
use uuid::Uuid;

use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, Collection, ContactMessage, FoundPetReport, LostPetReport,
};
use pawhaven_core::PawhavenError;

/// A record that can live in a [`QueryCache`].
pub trait Cached: Clone + Send + Sync + 'static {
    fn cache_id(&self) -> Uuid;
}

macro_rules! cached_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(impl Cached for $ty {
            fn cache_id(&self) -> Uuid {
                self.id
            }
        })+
    };
}

cached_by_id!(
    LostPetReport,
    FoundPetReport,
    AdoptionPet,
    AdoptionApplication,
    ContactMessage,
);

/// Runs a read, retrying it once if the first attempt fails.
pub async fn read_with_retry<T, F, Fut>(label: impl Display, mut read: F) -> Result<T, PawhavenError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PawhavenError>>,
{
    match read().await {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(read = %label, error = %err, "read failed, retrying once");
            read().await
        }
    }
}

struct Entry<T> {
    items: Vec<T>,
    stale: bool,
}

struct Entries<T> {
    /// Bumped by every invalidation.
    generation: u64,
    by_key: HashMap<String, Entry<T>>,
}

/// Cached list reads for one collection.
pub struct QueryCache<T> {
    collection: Collection,
    entries: RwLock<Entries<T>>,
}

impl<T: Cached> QueryCache<T> {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            entries: RwLock::new(Entries {
                generation: 0,
                by_key: HashMap::new(),
            }),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Returns the fresh entry for `key`, or fetches (with one retry) and stores it.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Vec<T>, PawhavenError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<T>, PawhavenError>>,
    {
        let generation = {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.by_key.get(key).filter(|e| !e.stale) {
                return Ok(entry.items.clone());
            }
            entries.generation
        };

        let label = format!("{}:{key}", self.collection);
        let items = read_with_retry(label, fetch).await?;

        let mut entries = self.entries.write().await;
        // A write landed mid-fetch; these items may predate it.
        let stale = entries.generation != generation;
        entries.by_key.insert(
            key.to_string(),
            Entry {
                items: items.clone(),
                stale,
            },
        );
        Ok(items)
    }

    /// Marks every entry stale.
    pub async fn invalidate(&self) {
        let mut entries = self.entries.write().await;
        entries.generation += 1;
        for entry in entries.by_key.values_mut() {
            entry.stale = true;
        }
        tracing::debug!(collection = %self.collection, "query cache invalidated");
    }

    /// Applies `update` to every cached copy of record `id` without refetching.
    /// Returns the number of copies patched.
    pub async fn patch(&self, id: Uuid, mut update: impl FnMut(&mut T)) -> usize {
        let mut entries = self.entries.write().await;
        let mut patched = 0;
        for entry in entries.by_key.values_mut() {
            for item in entry.items.iter_mut().filter(|item| item.cache_id() == id) {
                update(item);
                patched += 1;
            }
        }
        patched
    }

    /// `None` if nothing is cached under `key`.
    pub async fn is_stale(&self, key: &str) -> Option<bool> {
        self.entries.read().await.by_key.get(key).map(|e| e.stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use tracing_test::traced_test;

    fn message(subject: &str) -> ContactMessage {
        ContactMessage {
            id: Uuid::new_v4(),
            name: "Kai".into(),
            email: "kai@example.com".into(),
            subject: subject.into(),
            message: "Hello".into(),
            read: false,
            created_at: Utc::now(),
        }
    }

    fn transport_error() -> PawhavenError {
        PawhavenError::storage(std::io::Error::other("connection reset"))
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_fetching() {
        let cache = QueryCache::new(Collection::ContactMessages);
        let fetches = AtomicUsize::new(0);
        let stored = vec![message("One")];

        for _ in 0..3 {
            let items = cache
                .get_or_fetch("all", || {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    let stored = stored.clone();
                    async move { Ok(stored) }
                })
                .await
                .unwrap();
            assert_eq!(items.len(), 1);
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = QueryCache::new(Collection::ContactMessages);
        let fetches = AtomicUsize::new(0);
        let fetch = || {
            fetches.fetch_add(1, Ordering::SeqCst);
            async { Ok(vec![message("One")]) }
        };

        cache.get_or_fetch("all", fetch).await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.is_stale("all").await, Some(true));
        cache.get_or_fetch("all", fetch).await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.is_stale("all").await, Some(false));
    }

    #[tokio::test]
    async fn invalidation_during_fetch_is_not_lost() {
        let cache = QueryCache::new(Collection::ContactMessages);
        let fetches = AtomicUsize::new(0);

        // The first fetch reads old data, then a write invalidates before it returns.
        let first = cache
            .get_or_fetch("all", || {
                fetches.fetch_add(1, Ordering::SeqCst);
                let cache = &cache;
                async move {
                    cache.invalidate().await;
                    Ok(vec![message("old")])
                }
            })
            .await
            .unwrap();
        assert_eq!(first[0].subject, "old");
        assert_eq!(cache.is_stale("all").await, Some(true));

        let second = cache
            .get_or_fetch("all", || {
                fetches.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec![message("new")]) }
            })
            .await
            .unwrap();
        assert_eq!(second[0].subject, "new");
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.is_stale("all").await, Some(false));
    }

    #[tokio::test]
    async fn patch_updates_in_place() {
        let cache = QueryCache::new(Collection::ContactMessages);
        let first = message("One");
        let id = first.id;
        let stored = vec![first, message("Two")];
        cache
            .get_or_fetch("all", || {
                let stored = stored.clone();
                async move { Ok(stored) }
            })
            .await
            .unwrap();

        assert_eq!(cache.patch(id, |m| m.read = true).await, 1);
        assert_eq!(cache.is_stale("all").await, Some(false));

        let items = cache
            .get_or_fetch("all", || async { Err(transport_error()) })
            .await
            .unwrap();
        assert!(items.iter().find(|m| m.id == id).unwrap().read);
        assert!(!items.iter().find(|m| m.id != id).unwrap().read);
    }

    #[tokio::test]
    #[traced_test]
    async fn read_is_retried_once() {
        let attempts = AtomicUsize::new(0);
        let value = read_with_retry("lost_pets", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(transport_error())
                } else {
                    Ok(7)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(logs_contain("retrying once"));
    }

    #[tokio::test]
    async fn second_failure_is_returned() {
        let attempts = AtomicUsize::new(0);
        let result: Result<u8, _> = read_with_retry("found_pets", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(transport_error()) }
        })
        .await;
        assert!(matches!(result, Err(PawhavenError::Storage { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
