use std::sync::Arc;

pub mod backend;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod notice;
pub mod projector;
pub mod queries;
pub mod session;

pub use backend::{Backend, HttpBackend};
pub use cache::{Query, QueryCache, Snapshot};
pub use config::ClientConfig;
pub use dispatcher::{AcceptOutcome, Action, RelationshipDispatcher, SendOutcome};
pub use error::{ClientError, Result};
pub use notice::{Notice, NoticeKind, NoticeReceiver};
pub use projector::PendingProjector;
pub use queries::Queries;
pub use session::{AuthState, Session};

pub mod client {
    use reqwest::{Client, RequestBuilder, Response};
    use serde::de::DeserializeOwned;
    use lingo_common::{paths, AuthSession, AuthUserBody, ErrorBody, FriendRequest, FriendRequestId, FriendRequestLists, OnboardingProfile, SendFriendRequest, SignupRequest, User, UserId};
    use tracing::debug;
    use crate::error::{ClientError, Result};

    /// API base plus the bearer token of the signed-in user.
    #[derive(Clone, Debug, Default)]
    pub struct Endpoint {
        pub base: String,
        pub token: Option<String>,
    }
    impl Endpoint {
        pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
            Self { base: base.into(), token }
        }
        fn get(&self, client: &Client, path: &str) -> RequestBuilder {
            debug!(path, "GET");
            self.authorize(client.get(self.base.clone() + path))
        }
        fn post(&self, client: &Client, path: &str) -> RequestBuilder {
            debug!(path, "POST");
            self.authorize(client.post(self.base.clone() + path))
        }
        fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
            match &self.token {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .ok()
            .filter(|message| !message.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or(text);
        Err(ClientError::from_status(status, message))
    }

    pub async fn signup(client: &Client, endpoint: &Endpoint, full_name: impl Into<String>) -> Result<AuthSession> {
        decode(endpoint.post(client, paths::SIGNUP)
            .json(&SignupRequest { full_name: full_name.into() })
            .send()
            .await?)
            .await
    }
    pub async fn get_auth_user(client: &Client, endpoint: &Endpoint) -> Result<User> {
        Ok(decode::<AuthUserBody>(endpoint.get(client, paths::ME).send().await?).await?.user)
    }
    pub async fn complete_onboarding(client: &Client, endpoint: &Endpoint, profile: &OnboardingProfile) -> Result<User> {
        Ok(decode::<AuthUserBody>(endpoint.post(client, paths::ONBOARDING)
            .json(profile)
            .send()
            .await?)
            .await?
            .user)
    }
    pub async fn logout(client: &Client, endpoint: &Endpoint) -> Result<()> {
        decode::<ErrorBody>(endpoint.post(client, paths::LOGOUT).send().await?).await?;
        Ok(())
    }
    pub async fn get_recommended_users(client: &Client, endpoint: &Endpoint) -> Result<Vec<User>> {
        decode(endpoint.get(client, paths::RECOMMENDED_USERS).send().await?).await
    }
    pub async fn get_friends(client: &Client, endpoint: &Endpoint) -> Result<Vec<User>> {
        decode(endpoint.get(client, paths::FRIENDS).send().await?).await
    }
    pub async fn get_outgoing_friend_requests(client: &Client, endpoint: &Endpoint) -> Result<Vec<FriendRequest>> {
        decode(endpoint.get(client, paths::OUTGOING_REQUESTS).send().await?).await
    }
    pub async fn get_friend_requests(client: &Client, endpoint: &Endpoint) -> Result<FriendRequestLists> {
        decode(endpoint.get(client, paths::INCOMING_REQUESTS).send().await?).await
    }
    pub async fn send_friend_request(client: &Client, endpoint: &Endpoint, recipient: &UserId) -> Result<FriendRequest> {
        decode(endpoint.post(client, paths::FRIEND_REQUESTS)
            .json(&SendFriendRequest { recipient_id: recipient.clone() })
            .send()
            .await?)
            .await
    }
    pub async fn accept_friend_request(client: &Client, endpoint: &Endpoint, request: &FriendRequestId) -> Result<FriendRequest> {
        decode(endpoint.post(client, &paths::accept_request(request))
            .send()
            .await?)
            .await
    }
}

/// Cache, session, readers and dispatcher wired to one backend.
pub struct LingoClient {
    pub cache: Arc<QueryCache>,
    pub session: Session,
    pub queries: Queries,
    pub dispatcher: RelationshipDispatcher,
}

impl LingoClient {
    pub fn new(backend: Arc<dyn Backend>) -> (Self, NoticeReceiver) {
        let cache = Arc::new(QueryCache::new());
        let (notices, receiver) = notice::channel();
        let client = Self {
            session: Session::new(backend.clone(), cache.clone(), notices.clone()),
            queries: Queries::new(backend.clone(), cache.clone()),
            dispatcher: RelationshipDispatcher::new(backend, cache.clone(), notices),
            cache,
        };
        (client, receiver)
    }

    pub fn connect(config: ClientConfig) -> Result<(Self, NoticeReceiver)> {
        Ok(Self::new(Arc::new(HttpBackend::new(&config)?)))
    }

    pub fn pending_projector(&self) -> PendingProjector {
        PendingProjector::new(&self.cache)
    }

    /// Recommended users with the control each card should show.
    pub async fn recommended_cards(&self) -> Result<Vec<projector::UserCard>> {
        let (users, outgoing, friends) = self.queries.home().await?;
        let pending = projector::project_pending(&outgoing);
        Ok(projector::recommended_cards(&users, &pending, &friends, |user| {
            self.dispatcher.is_in_flight(&Action::Send(user.clone()))
        }))
    }

    pub async fn notifications(&self) -> Result<projector::NotificationView> {
        let lists = self.queries.friend_requests().await?;
        Ok(projector::notification_view(&lists, |request| {
            self.dispatcher.is_in_flight(&Action::Accept(request.clone()))
        }))
    }

    pub async fn friend_cards(&self) -> Result<Vec<projector::UserCard>> {
        Ok(projector::friend_cards(&self.queries.friends().await?))
    }
}
