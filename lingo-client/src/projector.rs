//! Pure projections from cached snapshots to the state cards render.
//!
//! The pending set is the one piece with an invariant worth stating:
//! it always equals the recipient ids of the latest outgoing list, skipping
//! requests whose recipient could not be resolved.

use std::collections::HashSet;

use lingo_common::non_api_structs::{Affordance, PendingSet};
use lingo_common::{FriendRequest, FriendRequestId, FriendRequestLists, Language, Url, User, UserId};
use tokio::sync::watch;
use tracing::debug;

use crate::cache::{QueryCache, Snapshot};

pub fn project_pending(outgoing: &[FriendRequest]) -> PendingSet {
    outgoing.iter().filter_map(FriendRequest::recipient_id).cloned().collect()
}

/// Read-only view of the outgoing list that yields a rebuilt [`PendingSet`]
/// every time the list is replaced.
pub struct PendingProjector {
    outgoing: watch::Receiver<Snapshot<Vec<FriendRequest>>>,
    seen_generation: u64,
}

impl PendingProjector {
    pub fn new(cache: &QueryCache) -> Self {
        let outgoing = cache.outgoing_requests.subscribe();
        let seen_generation = outgoing.borrow().generation;
        Self { outgoing, seen_generation }
    }

    /// Projection of the latest snapshot; empty if the list was never fetched.
    pub fn current(&self) -> PendingSet {
        match &self.outgoing.borrow().data {
            Some(requests) => project_pending(requests),
            None => PendingSet::default(),
        }
    }

    /// Waits until the outgoing list is replaced, then returns the new set.
    /// Invalidation alone does not wake this; the re-fetch that follows does.
    /// Returns `None` once the cache is gone.
    pub async fn changed(&mut self) -> Option<PendingSet> {
        loop {
            self.outgoing.changed().await.ok()?;
            let snapshot = self.outgoing.borrow_and_update().clone();
            if snapshot.generation == self.seen_generation {
                continue;
            }
            self.seen_generation = snapshot.generation;
            let pending = snapshot.data.map(|requests| project_pending(&requests)).unwrap_or_default();
            debug!(generation = snapshot.generation, pending = pending.len(), "pending set recomputed");
            return Some(pending);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LanguageBadge {
    pub label: String,
    pub flag: Option<Url>,
}
impl From<&Language> for LanguageBadge {
    fn from(language: &Language) -> Self {
        Self { label: language.display_name(), flag: language.flag_url() }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserCard {
    pub user: User,
    pub native: LanguageBadge,
    pub learning: LanguageBadge,
    pub affordance: Affordance,
}
impl UserCard {
    fn new(user: &User, affordance: Affordance) -> Self {
        Self {
            native: LanguageBadge::from(&user.native_language),
            learning: LanguageBadge::from(&user.learning_language),
            user: user.clone(),
            affordance,
        }
    }
}

pub fn affordance_for(user: &UserId, pending: &PendingSet, friends: &HashSet<UserId>, busy: bool) -> Affordance {
    if friends.contains(user) {
        Affordance::Friend
    } else if pending.contains(user) {
        Affordance::Pending
    } else {
        Affordance::Send { enabled: !busy }
    }
}

/// Cards for the "meet new learners" list, in backend order.
pub fn recommended_cards(
    users: &[User],
    pending: &PendingSet,
    friends: &[User],
    busy: impl Fn(&UserId) -> bool,
) -> Vec<UserCard> {
    let friends: HashSet<UserId> = friends.iter().map(|friend| friend.id.clone()).collect();
    users
        .iter()
        .map(|user| UserCard::new(user, affordance_for(&user.id, pending, &friends, busy(&user.id))))
        .collect()
}

pub fn friend_cards(friends: &[User]) -> Vec<UserCard> {
    friends.iter().map(|friend| UserCard::new(friend, Affordance::Friend)).collect()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestCard {
    pub request: FriendRequestId,
    pub sender: Option<User>,
    pub affordance: Affordance,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NotificationView {
    pub incoming: Vec<RequestCard>,
    /// Requests I sent that were accepted, shown as new connections.
    pub new_connections: Vec<User>,
}
impl NotificationView {
    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty() && self.new_connections.is_empty()
    }
}

pub fn notification_view(lists: &FriendRequestLists, busy: impl Fn(&FriendRequestId) -> bool) -> NotificationView {
    NotificationView {
        incoming: lists
            .incoming
            .iter()
            .map(|request| RequestCard {
                request: request.id.clone(),
                sender: request.sender.clone(),
                affordance: Affordance::Accept { enabled: !busy(&request.id) },
            })
            .collect(),
        new_connections: lists.accepted.iter().filter_map(|request| request.recipient.clone()).collect(),
    }
}
