use std::future::Future;
use std::sync::Arc;

use lingo_common::non_api_structs::ListKey;
use lingo_common::{FriendRequest, FriendRequestLists, User};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::Result;

/// What a cache slot holds at one moment.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub data: Option<Arc<T>>,
    pub stale: bool,
    /// Bumped every time `data` is replaced.
    pub generation: u64,
}
impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self { data: self.data.clone(), stale: self.stale, generation: self.generation }
    }
}
impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self { data: None, stale: true, generation: 0 }
    }
}

/// One named list. Readers load and subscribe; only the crate writes.
pub struct Query<T> {
    key: ListKey,
    tx: watch::Sender<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> Query<T> {
    fn new(key: ListKey) -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self { key, tx }
    }

    pub fn key(&self) -> ListKey {
        self.key
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.tx.borrow().data.clone()
    }

    pub fn is_stale(&self) -> bool {
        self.tx.borrow().stale
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    /// Returns the cached value if fresh, otherwise fetches and stores it.
    /// A failed fetch leaves the slot as it was.
    pub async fn load<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let fresh = {
            let snapshot = self.tx.borrow();
            if snapshot.stale { None } else { snapshot.data.clone() }
        };
        if let Some(data) = fresh {
            return Ok(data);
        }
        self.refetch(fetch).await
    }

    /// Fetches unconditionally; the arriving value replaces whatever is cached.
    pub async fn refetch<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        debug!(key = ?self.key, "fetching list");
        let value = fetch().await?;
        Ok(self.store(value))
    }

    pub(crate) fn store(&self, value: T) -> Arc<T> {
        let data = Arc::new(value);
        self.tx.send_modify(|snapshot| {
            snapshot.data = Some(data.clone());
            snapshot.stale = false;
            snapshot.generation += 1;
        });
        data
    }

    pub(crate) fn invalidate(&self) {
        self.tx.send_modify(|snapshot| snapshot.stale = true);
    }

    pub(crate) fn clear(&self) {
        self.tx.send_modify(|snapshot| {
            snapshot.data = None;
            snapshot.stale = true;
            snapshot.generation += 1;
        });
    }
}

/// Process-wide lists keyed by [`ListKey`].
pub struct QueryCache {
    pub auth_user: Query<Option<User>>,
    pub users: Query<Vec<User>>,
    pub outgoing_requests: Query<Vec<FriendRequest>>,
    pub friend_requests: Query<FriendRequestLists>,
    pub friends: Query<Vec<User>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            auth_user: Query::new(ListKey::AuthUser),
            users: Query::new(ListKey::Users),
            outgoing_requests: Query::new(ListKey::OutgoingFriendReqs),
            friend_requests: Query::new(ListKey::FriendRequests),
            friends: Query::new(ListKey::Friends),
        }
    }

    pub fn is_stale(&self, key: ListKey) -> bool {
        match key {
            ListKey::AuthUser => self.auth_user.is_stale(),
            ListKey::Users => self.users.is_stale(),
            ListKey::OutgoingFriendReqs => self.outgoing_requests.is_stale(),
            ListKey::FriendRequests => self.friend_requests.is_stale(),
            ListKey::Friends => self.friends.is_stale(),
        }
    }

    /// True once the backend has told us there is no signed-in user.
    pub fn is_signed_out(&self) -> bool {
        matches!(self.auth_user.data().as_deref(), Some(None))
    }

    pub(crate) fn invalidate(&self, key: ListKey) {
        info!(?key, "invalidating list");
        match key {
            ListKey::AuthUser => self.auth_user.invalidate(),
            ListKey::Users => self.users.invalidate(),
            ListKey::OutgoingFriendReqs => self.outgoing_requests.invalidate(),
            ListKey::FriendRequests => self.friend_requests.invalidate(),
            ListKey::Friends => self.friends.invalidate(),
        }
    }

    /// Records the signed-out state and drops every list.
    pub(crate) fn end_session(&self) {
        info!("session ended, dropping cached lists");
        self.auth_user.store(None);
        self.users.clear();
        self.outgoing_requests.clear();
        self.friend_requests.clear();
        self.friends.clear();
    }
}
