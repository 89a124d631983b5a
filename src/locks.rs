// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-key async serialization.
//!
//! ```text
//! KeyedLocks::lock("app/mod1") --+
//!                                 +--> same Arc<tokio::Mutex<()>>  (queued)
//! KeyedLocks::lock("app/mod1") --+
//! KeyedLocks::lock("app/mod2") ----> independent mutex             (parallel)
//!
//! map holds Weak refs; entries whose last guard dropped are pruned
//! on the next lock() call
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    inner: Arc<Mutex<HashMap<String, Weak<AsyncMutex<()>>>>>,
}

impl KeyedLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. Access ends when the guard drops.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.retain(|_, weak| weak.strong_count() > 0);
            if let Some(existing) = map.get(key).and_then(Weak::upgrade) {
                existing
            } else {
                let fresh = Arc::new(AsyncMutex::new(()));
                map.insert(key.to_string(), Arc::downgrade(&fresh));
                fresh
            }
        };
        mutex.lock_owned().await
    }

    /// Keys with at least one live holder or waiter.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}
