use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{cart::Cart, catalog::CatalogBrowser, checkout::CheckoutSession};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Everything the storefront remembers about one browser session.
#[derive(Debug)]
pub struct Session {
    pub browser: CatalogBrowser,
    pub cart: Cart,
    pub checkout: CheckoutSession,
    last_seen: Instant,
}

impl Session {
    pub fn new(page_size: i64) -> Self {
        Self {
            browser: CatalogBrowser::new(page_size),
            cart: Cart::new(),
            checkout: CheckoutSession::default(),
            last_seen: Instant::now(),
        }
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// In-memory sessions, keyed by the `x-session-id` value.
///
/// Closures passed to [`SessionStore::with`] and [`SessionStore::read`] run
/// while the entry is locked and must not await. Sessions idle for longer
/// than the TTL are dropped by [`SessionStore::evict_idle`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, Session>>,
    page_size: i64,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(page_size: i64) -> Self {
        Self::with_ttl(page_size, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(page_size: i64, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            page_size,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Run `f` against the session, creating it on first use.
    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut entry = self
            .sessions
            .entry(id)
            .or_insert_with(|| Session::new(self.page_size));
        entry.touch();
        f(entry.value_mut())
    }

    /// Run `f` against the session if it exists, or against a fresh one that
    /// is not stored.
    pub fn read<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> R {
        match self.sessions.get_mut(&id) {
            Some(mut entry) => {
                entry.touch();
                f(entry.value())
            }
            None => f(&Session::new(self.page_size)),
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Drop every session not seen within the TTL as of `now`. Returns how
    /// many were removed.
    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) <= self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    /// Sweep idle sessions every `every` until the runtime shuts down.
    pub fn spawn_eviction(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = store.len(), "evicted idle sessions");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
