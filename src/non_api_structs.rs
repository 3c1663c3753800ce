use std::collections::HashSet;
use crate::UserId;

/// Recipients of the current user's outstanding outgoing requests.
///
/// Always rebuilt from a complete outgoing list; there is no insert or remove.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PendingSet(HashSet<UserId>);
impl PendingSet {
    pub fn contains(&self, user: impl AsRef<UserId>) -> bool {
        self.0.contains(user.as_ref())
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }
}
impl FromIterator<UserId> for PendingSet {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Logical names of the cached lists.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ListKey {
    AuthUser,
    Users,
    OutgoingFriendReqs,
    FriendRequests,
    Friends,
}
impl ListKey {
    pub const ALL: [ListKey; 5] = [
        ListKey::AuthUser,
        ListKey::Users,
        ListKey::OutgoingFriendReqs,
        ListKey::FriendRequests,
        ListKey::Friends,
    ];
}

/// The action control shown on a user or request card.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Affordance {
    Send { enabled: bool },
    Pending,
    Accept { enabled: bool },
    Friend,
}
impl Affordance {
    pub fn is_enabled(&self) -> bool {
        match self {
            Affordance::Send { enabled } | Affordance::Accept { enabled } => *enabled,
            Affordance::Pending | Affordance::Friend => false,
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Affordance::Send { .. } => "Send Friend Request",
            Affordance::Pending => "Request Sent",
            Affordance::Accept { .. } => "Accept",
            Affordance::Friend => "Friends",
        }
    }
}
