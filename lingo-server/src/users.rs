use lingo_common::{FriendRequest, FriendRequestId, RequestStatus, User, UserId};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sled::{Db, Tree};

use crate::error::{AppError, Result};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserData {
    pub profile: User,
    pub friends: Vec<UserId>,
}

/// A request as stored: parties by id, resolved to profiles on the way out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRequest {
    pub id: FriendRequestId,
    pub sender: UserId,
    pub recipient: UserId,
    pub status: RequestStatus,
}
impl StoredRequest {
    pub fn involves(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender == a && &self.recipient == b) || (&self.sender == b && &self.recipient == a)
    }
}

#[derive(Clone)]
pub struct Store {
    users: Tree,
    requests: Tree,
    sessions: Tree,
}

impl Store {
    pub fn open(path: &str) -> Result<Self> {
        Self::new(&sled::open(path)?)
    }

    pub fn temporary() -> Result<Self> {
        Self::new(&sled::Config::new().temporary(true).open()?)
    }

    fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            users: db.open_tree("users")?,
            requests: db.open_tree("friend_requests")?,
            sessions: db.open_tree("sessions")?,
        })
    }

    pub fn user(&self, id: &UserId) -> Result<Option<UserData>> {
        get(&self.users, &id.0)
    }
    pub fn profile(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.user(id)?.map(|user| user.profile))
    }
    pub fn put_user(&self, user: &UserData) -> Result<()> {
        put(&self.users, &user.profile.id.0, user)
    }
    pub fn user_mut(&self, id: &UserId, func: impl FnOnce(&mut UserData)) -> Result<UserData> {
        let mut user = self.user(id)?.ok_or_else(|| AppError::NotFound(String::from("User not found")))?;
        func(&mut user);
        self.put_user(&user)?;
        Ok(user)
    }
    pub fn users(&self) -> Result<Vec<UserData>> {
        all(&self.users)
    }

    pub fn request(&self, id: &FriendRequestId) -> Result<Option<StoredRequest>> {
        get(&self.requests, &id.0)
    }
    pub fn put_request(&self, request: &StoredRequest) -> Result<()> {
        put(&self.requests, &request.id.0, request)
    }
    pub fn requests(&self) -> Result<Vec<StoredRequest>> {
        all(&self.requests)
    }

    /// Resolves both parties; a party that no longer exists comes back as `None`.
    pub fn populate(&self, request: &StoredRequest) -> Result<FriendRequest> {
        Ok(FriendRequest {
            id: request.id.clone(),
            sender: self.profile(&request.sender)?,
            recipient: self.profile(&request.recipient)?,
            status: request.status,
        })
    }

    pub fn create_session(&self, user: &UserId) -> Result<String> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.as_bytes(), user.0.as_bytes())?;
        Ok(token)
    }
    pub fn session_user(&self, token: &str) -> Result<Option<UserId>> {
        Ok(self
            .sessions
            .get(token.as_bytes())?
            .map(|id| UserId(String::from_utf8_lossy(&id).into_owned())))
    }
    pub fn end_session(&self, token: &str) -> Result<()> {
        self.sessions.remove(token.as_bytes())?;
        Ok(())
    }
}

fn get<T: DeserializeOwned>(tree: &Tree, key: &str) -> Result<Option<T>> {
    match tree.get(key.as_bytes())? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn put<T: Serialize>(tree: &Tree, key: &str, value: &T) -> Result<()> {
    tree.insert(key.as_bytes(), serde_json::to_vec(value)?)?;
    Ok(())
}

fn all<T: DeserializeOwned>(tree: &Tree) -> Result<Vec<T>> {
    tree.iter()
        .values()
        .map(|bytes| -> Result<T> { Ok(serde_json::from_slice(&bytes?)?) })
        .collect()
}
