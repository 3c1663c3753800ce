#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lingo_client::{Backend, ClientError, LingoClient, NoticeReceiver, Result};
use lingo_common::{FriendRequest, FriendRequestId, FriendRequestLists, OnboardingProfile, RequestStatus, User, UserId};
use tokio::sync::Notify;

pub fn user(id: &str) -> User {
    User { id: UserId::from(id), full_name: id.to_uppercase(), is_onboarded: true, ..Default::default() }
}

pub fn request(id: &str, sender: Option<&str>, recipient: Option<&str>) -> FriendRequest {
    FriendRequest {
        id: FriendRequestId::from(id),
        sender: sender.map(user),
        recipient: recipient.map(user),
        status: RequestStatus::Pending,
    }
}

#[derive(Default)]
pub struct FakeData {
    pub me: Option<User>,
    pub users: Vec<User>,
    pub outgoing: Vec<FriendRequest>,
    pub incoming: Vec<FriendRequest>,
    pub accepted: Vec<FriendRequest>,
    pub friends: Vec<User>,
    next_id: usize,
}

/// In-memory backend that behaves like the real one for a single user and
/// records every call it receives.
#[derive(Default)]
pub struct FakeBackend {
    pub data: Mutex<FakeData>,
    calls: Mutex<HashMap<&'static str, usize>>,
    fail_next: Mutex<Option<ClientError>>,
    /// When set, sends wait on it before answering.
    pub gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn signed_in(me: &str) -> Self {
        let backend = Self::default();
        backend.data.lock().unwrap().me = Some(user(me));
        backend
    }

    pub fn with(self, edit: impl FnOnce(&mut FakeData)) -> Self {
        edit(&mut self.data.lock().unwrap());
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn fail_next(&self, err: ClientError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    fn record(&self, name: &'static str) -> Result<()> {
        *self.calls.lock().unwrap().entry(name).or_default() += 1;
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn auth_user(&self) -> Result<User> {
        self.record("auth_user")?;
        self.data.lock().unwrap().me.clone().ok_or(ClientError::Unauthorized)
    }
    async fn complete_onboarding(&self, profile: &OnboardingProfile) -> Result<User> {
        self.record("complete_onboarding")?;
        let mut data = self.data.lock().unwrap();
        let me = data.me.as_mut().ok_or(ClientError::Unauthorized)?;
        me.full_name = profile.full_name.clone();
        me.is_onboarded = true;
        Ok(me.clone())
    }
    async fn logout(&self) -> Result<()> {
        self.record("logout")?;
        self.data.lock().unwrap().me = None;
        Ok(())
    }
    async fn recommended_users(&self) -> Result<Vec<User>> {
        self.record("recommended_users")?;
        Ok(self.data.lock().unwrap().users.clone())
    }
    async fn friends(&self) -> Result<Vec<User>> {
        self.record("friends")?;
        Ok(self.data.lock().unwrap().friends.clone())
    }
    async fn outgoing_requests(&self) -> Result<Vec<FriendRequest>> {
        self.record("outgoing_requests")?;
        Ok(self.data.lock().unwrap().outgoing.clone())
    }
    async fn friend_requests(&self) -> Result<FriendRequestLists> {
        self.record("friend_requests")?;
        let data = self.data.lock().unwrap();
        Ok(FriendRequestLists { incoming: data.incoming.clone(), accepted: data.accepted.clone() })
    }
    async fn send_friend_request(&self, recipient: &UserId) -> Result<FriendRequest> {
        self.record("send_friend_request")?;
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let created = FriendRequest {
            id: FriendRequestId(format!("sent-{}", data.next_id)),
            sender: data.me.clone(),
            recipient: Some(user(&recipient.0)),
            status: RequestStatus::Pending,
        };
        data.outgoing.push(created.clone());
        Ok(created)
    }
    async fn accept_friend_request(&self, request: &FriendRequestId) -> Result<FriendRequest> {
        self.record("accept_friend_request")?;
        let mut data = self.data.lock().unwrap();
        let index = data
            .incoming
            .iter()
            .position(|incoming| &incoming.id == request)
            .ok_or_else(|| ClientError::NotFound(String::from("Friend request not found")))?;
        let mut accepted = data.incoming.remove(index);
        accepted.status = RequestStatus::Accepted;
        if let Some(sender) = accepted.sender.clone() {
            data.friends.push(sender);
        }
        Ok(accepted)
    }
}

pub fn client(backend: &Arc<FakeBackend>) -> (LingoClient, NoticeReceiver) {
    LingoClient::new(backend.clone())
}
