pub mod language;
pub mod non_api_structs;

use serde::{Deserialize, Serialize};

pub use language::Language;

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Url(pub String);

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct UserId(pub String);
impl AsRef<UserId> for UserId {
    fn as_ref(&self) -> &UserId {
        self
    }
}
impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FriendRequestId(pub String);
impl From<&str> for FriendRequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
impl std::fmt::Display for FriendRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A member profile as served by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub native_language: Language,
    #[serde(default)]
    pub learning_language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<Url>,
    #[serde(default)]
    pub is_onboarded: bool,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
}

/// Sender and recipient are populated references; either may be missing when
/// the backend could not resolve the user.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct FriendRequest {
    #[serde(rename = "_id")]
    pub id: FriendRequestId,
    #[serde(default)]
    pub sender: Option<User>,
    #[serde(default)]
    pub recipient: Option<User>,
    #[serde(default)]
    pub status: RequestStatus,
}
impl FriendRequest {
    pub fn recipient_id(&self) -> Option<&UserId> {
        self.recipient.as_ref().map(|user| &user.id).filter(|id| !id.0.is_empty())
    }
    pub fn sender_id(&self) -> Option<&UserId> {
        self.sender.as_ref().map(|user| &user.id).filter(|id| !id.0.is_empty())
    }
}

/// Body of `GET /friend-requests/incoming`.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct FriendRequestLists {
    #[serde(rename = "incomingReqs", alias = "incoming", default)]
    pub incoming: Vec<FriendRequest>,
    #[serde(rename = "acceptedReqs", alias = "accepted", default)]
    pub accepted: Vec<FriendRequest>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequest {
    pub recipient_id: UserId,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    pub full_name: String,
    pub bio: String,
    pub native_language: Language,
    pub learning_language: Language,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<Url>,
}
impl OnboardingProfile {
    /// Wire names of the required fields left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", self.full_name.as_str()),
            ("bio", self.bio.as_str()),
            ("nativeLanguage", self.native_language.as_str()),
            ("learningLanguage", self.learning_language.as_str()),
            ("location", self.location.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct AuthUserBody {
    pub user: User,
}

/// Payload of every non-2xx response.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct ErrorBody {
    pub message: String,
}

/// Paths relative to the API base, shared by client and server.
pub mod paths {
    pub const RECOMMENDED_USERS: &str = "/users/recommended";
    pub const FRIENDS: &str = "/users/friends";
    pub const OUTGOING_REQUESTS: &str = "/friend-requests/outgoing";
    pub const INCOMING_REQUESTS: &str = "/friend-requests/incoming";
    pub const FRIEND_REQUESTS: &str = "/friend-requests";
    pub const SIGNUP: &str = "/auth/signup";
    pub const ME: &str = "/auth/me";
    pub const ONBOARDING: &str = "/auth/onboarding";
    pub const LOGOUT: &str = "/auth/logout";

    pub fn accept_request(id: &crate::FriendRequestId) -> String {
        String::from(FRIEND_REQUESTS) + "/" + &id.0 + "/accept"
    }
}
