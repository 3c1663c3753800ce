use async_trait::async_trait;
use lingo_common::{FriendRequest, FriendRequestId, FriendRequestLists, OnboardingProfile, User, UserId};
use reqwest::Client;

use crate::client::{self, Endpoint};
use crate::config::ClientConfig;
use crate::error::Result;

/// The REST contract the core consumes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn auth_user(&self) -> Result<User>;
    async fn complete_onboarding(&self, profile: &OnboardingProfile) -> Result<User>;
    async fn logout(&self) -> Result<()>;
    async fn recommended_users(&self) -> Result<Vec<User>>;
    async fn friends(&self) -> Result<Vec<User>>;
    async fn outgoing_requests(&self) -> Result<Vec<FriendRequest>>;
    async fn friend_requests(&self) -> Result<FriendRequestLists>;
    async fn send_friend_request(&self, recipient: &UserId) -> Result<FriendRequest>;
    async fn accept_friend_request(&self, request: &FriendRequestId) -> Result<FriendRequest>;
}

pub struct HttpBackend {
    client: Client,
    endpoint: Endpoint,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: Endpoint::new(config.api_url.clone(), config.token.clone()),
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn auth_user(&self) -> Result<User> {
        client::get_auth_user(&self.client, &self.endpoint).await
    }
    async fn complete_onboarding(&self, profile: &OnboardingProfile) -> Result<User> {
        client::complete_onboarding(&self.client, &self.endpoint, profile).await
    }
    async fn logout(&self) -> Result<()> {
        client::logout(&self.client, &self.endpoint).await
    }
    async fn recommended_users(&self) -> Result<Vec<User>> {
        client::get_recommended_users(&self.client, &self.endpoint).await
    }
    async fn friends(&self) -> Result<Vec<User>> {
        client::get_friends(&self.client, &self.endpoint).await
    }
    async fn outgoing_requests(&self) -> Result<Vec<FriendRequest>> {
        client::get_outgoing_friend_requests(&self.client, &self.endpoint).await
    }
    async fn friend_requests(&self) -> Result<FriendRequestLists> {
        client::get_friend_requests(&self.client, &self.endpoint).await
    }
    async fn send_friend_request(&self, recipient: &UserId) -> Result<FriendRequest> {
        client::send_friend_request(&self.client, &self.endpoint, recipient).await
    }
    async fn accept_friend_request(&self, request: &FriendRequestId) -> Result<FriendRequest> {
        client::accept_friend_request(&self.client, &self.endpoint, request).await
    }
}
