use std::sync::Arc;

use lingo_common::non_api_structs::ListKey;
use lingo_common::{FriendRequest, FriendRequestLists, User};
use tracing::warn;

use crate::backend::Backend;
use crate::cache::QueryCache;
use crate::error::{ClientError, Result};

/// Signed-in user, with a 401 read as "nobody".
pub(crate) async fn fetch_auth_user(backend: &dyn Backend) -> Result<Option<User>> {
    match backend.auth_user().await {
        Ok(user) => Ok(Some(user)),
        Err(ClientError::Unauthorized) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Read side: each list goes through its cache slot.
#[derive(Clone)]
pub struct Queries {
    backend: Arc<dyn Backend>,
    cache: Arc<QueryCache>,
}

impl Queries {
    pub fn new(backend: Arc<dyn Backend>, cache: Arc<QueryCache>) -> Self {
        Self { backend, cache }
    }

    pub async fn recommended_users(&self) -> Result<Arc<Vec<User>>> {
        let loaded = self.cache.users.load(|| self.backend.recommended_users()).await;
        self.check(loaded)
    }

    pub async fn outgoing_requests(&self) -> Result<Arc<Vec<FriendRequest>>> {
        let loaded = self.cache.outgoing_requests.load(|| self.backend.outgoing_requests()).await;
        self.check(loaded)
    }

    pub async fn friend_requests(&self) -> Result<Arc<FriendRequestLists>> {
        let loaded = self.cache.friend_requests.load(|| self.backend.friend_requests()).await;
        self.check(loaded)
    }

    pub async fn friends(&self) -> Result<Arc<Vec<User>>> {
        let loaded = self.cache.friends.load(|| self.backend.friends()).await;
        self.check(loaded)
    }

    /// Everything the home screen needs, fetched side by side.
    pub async fn home(&self) -> Result<(Arc<Vec<User>>, Arc<Vec<FriendRequest>>, Arc<Vec<User>>)> {
        futures::try_join!(self.recommended_users(), self.outgoing_requests(), self.friends())
    }

    /// Fetches `key` now, whether or not it is stale, and stores the result.
    pub async fn refetch(&self, key: ListKey) -> Result<()> {
        let backend = self.backend.as_ref();
        let fetched = match key {
            ListKey::AuthUser => self.cache.auth_user.refetch(|| fetch_auth_user(backend)).await.map(drop),
            ListKey::Users => self.cache.users.refetch(|| backend.recommended_users()).await.map(drop),
            ListKey::OutgoingFriendReqs => self.cache.outgoing_requests.refetch(|| backend.outgoing_requests()).await.map(drop),
            ListKey::FriendRequests => self.cache.friend_requests.refetch(|| backend.friend_requests()).await.map(drop),
            ListKey::Friends => self.cache.friends.refetch(|| backend.friends()).await.map(drop),
        };
        self.check(fetched)
    }

    fn check<T>(&self, loaded: Result<T>) -> Result<T> {
        if let Err(err) = &loaded {
            warn!(error = %err, "list fetch failed");
            if *err == ClientError::Unauthorized {
                self.cache.end_session();
            }
        }
        loaded
    }
}
