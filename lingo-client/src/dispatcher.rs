use std::collections::HashSet;
use std::sync::Arc;

use lingo_common::non_api_structs::{ListKey, PendingSet};
use lingo_common::{FriendRequest, FriendRequestId, UserId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::cache::QueryCache;
use crate::error::{ClientError, Result};
use crate::notice::{self, Notice, NoticeSender};
use crate::projector::project_pending;
use crate::queries::Queries;

/// A mutation the user can trigger from a card.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Send(UserId),
    Accept(FriendRequestId),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SendOutcome {
    Sent(FriendRequest),
    /// The target already has an outstanding request; nothing was sent.
    AlreadyPending,
    /// The same send is still running; nothing was sent.
    InFlight,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AcceptOutcome {
    Accepted(FriendRequest),
    InFlight,
}

/// Issues friend-request mutations and invalidates the lists they affect.
///
/// Lists are only invalidated after the backend confirms the write, and are
/// re-fetched before the call returns. Nothing is applied optimistically, so a
/// failure leaves every derived value as it was.
pub struct RelationshipDispatcher {
    backend: Arc<dyn Backend>,
    cache: Arc<QueryCache>,
    queries: Queries,
    notices: NoticeSender,
    in_flight: watch::Sender<HashSet<Action>>,
}

/// Clears its action from the in-flight set when dropped.
struct InFlightGuard<'a> {
    in_flight: &'a watch::Sender<HashSet<Action>>,
    action: Action,
}
impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.send_modify(|set| {
            set.remove(&self.action);
        });
    }
}

impl RelationshipDispatcher {
    pub fn new(backend: Arc<dyn Backend>, cache: Arc<QueryCache>, notices: NoticeSender) -> Self {
        let (in_flight, _) = watch::channel(HashSet::new());
        let queries = Queries::new(backend.clone(), cache.clone());
        Self { backend, cache, queries, notices, in_flight }
    }

    /// Pending set of the most recent outgoing snapshot.
    pub fn pending(&self) -> PendingSet {
        self.cache
            .outgoing_requests
            .data()
            .map(|requests| project_pending(&requests))
            .unwrap_or_default()
    }

    pub fn is_in_flight(&self, action: &Action) -> bool {
        self.in_flight.borrow().contains(action)
    }

    pub fn any_in_flight(&self) -> bool {
        !self.in_flight.borrow().is_empty()
    }

    pub fn subscribe_in_flight(&self) -> watch::Receiver<HashSet<Action>> {
        self.in_flight.subscribe()
    }

    pub async fn send_request(&self, target: &UserId) -> Result<SendOutcome> {
        self.ensure_session()?;
        if self.pending().contains(target) {
            debug!(%target, "friend request already pending");
            return Ok(SendOutcome::AlreadyPending);
        }
        let Some(_guard) = self.begin(Action::Send(target.clone())) else {
            debug!(%target, "friend request already in flight");
            return Ok(SendOutcome::InFlight);
        };
        match self.backend.send_friend_request(target).await {
            Ok(request) => {
                info!(%target, request = %request.id, "friend request sent");
                self.cache.invalidate(ListKey::OutgoingFriendReqs);
                self.refresh(ListKey::OutgoingFriendReqs).await;
                self.notify(Notice::success("Friend request sent"));
                Ok(SendOutcome::Sent(request))
            }
            Err(err) => Err(self.fail("send friend request", err)),
        }
    }

    pub async fn accept_request(&self, request: &FriendRequestId) -> Result<AcceptOutcome> {
        self.ensure_session()?;
        let Some(_guard) = self.begin(Action::Accept(request.clone())) else {
            debug!(%request, "accept already in flight");
            return Ok(AcceptOutcome::InFlight);
        };
        match self.backend.accept_friend_request(request).await {
            Ok(accepted) => {
                info!(%request, "friend request accepted");
                // Leaves the incoming list and joins the friends list in one step.
                self.cache.invalidate(ListKey::FriendRequests);
                self.cache.invalidate(ListKey::Friends);
                futures::join!(self.refresh(ListKey::FriendRequests), self.refresh(ListKey::Friends));
                self.notify(Notice::success("Friend request accepted"));
                Ok(AcceptOutcome::Accepted(accepted))
            }
            Err(err) => Err(self.fail("accept friend request", err)),
        }
    }

    /// A failed re-fetch leaves the slot stale for the next read to retry.
    async fn refresh(&self, key: ListKey) {
        if let Err(err) = self.queries.refetch(key).await {
            debug!(?key, error = %err, "re-fetch after mutation failed");
        }
    }

    fn ensure_session(&self) -> Result<()> {
        if self.cache.is_signed_out() {
            return Err(ClientError::Unauthorized);
        }
        Ok(())
    }

    fn begin(&self, action: Action) -> Option<InFlightGuard<'_>> {
        let inserted = self.in_flight.send_if_modified(|set| set.insert(action.clone()));
        inserted.then(|| InFlightGuard { in_flight: &self.in_flight, action })
    }

    fn fail(&self, what: &str, err: ClientError) -> ClientError {
        warn!(error = %err, "{what} failed");
        if err == ClientError::Unauthorized {
            self.cache.end_session();
        }
        self.notify(Notice::error(&err));
        err
    }

    fn notify(&self, notice: Notice) {
        notice::deliver(&self.notices, notice);
    }
}
