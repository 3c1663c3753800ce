pub mod auth {
    use axum::{Extension, Json};
    use lingo_common::{AuthSession, AuthUserBody, ErrorBody, OnboardingProfile, SignupRequest, User, UserId};
    use tracing::info;
    use crate::error::{AppError, Result};
    use crate::users::UserData;
    use crate::{CurrentUser, State};

    pub async fn signup(Extension(state): Extension<State>, Json(payload): Json<SignupRequest>) -> Result<Json<AuthSession>> {
        let full_name = payload.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::BadRequest(String::from("Full name is required")));
        }
        let user = User {
            id: UserId(uuid::Uuid::new_v4().simple().to_string()),
            full_name: full_name.to_string(),
            ..Default::default()
        };
        state.store.put_user(&UserData { profile: user.clone(), friends: vec![] })?;
        let token = state.store.create_session(&user.id)?;
        info!(user = %user.id, "signed up");
        Ok(Json(AuthSession { token, user }))
    }

    pub async fn me(Extension(state): Extension<State>, current: CurrentUser) -> Result<Json<AuthUserBody>> {
        let user = state.store.profile(&current.id)?.ok_or(AppError::Unauthorized)?;
        Ok(Json(AuthUserBody { user }))
    }

    pub async fn onboarding(Extension(state): Extension<State>, current: CurrentUser, Json(profile): Json<OnboardingProfile>) -> Result<Json<AuthUserBody>> {
        let missing = profile.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!("All fields are required, missing: {}", missing.join(", "))));
        }
        let updated = state.store.user_mut(&current.id, |user| {
            user.profile.full_name = profile.full_name;
            user.profile.bio = Some(profile.bio);
            user.profile.native_language = profile.native_language;
            user.profile.learning_language = profile.learning_language;
            user.profile.location = Some(profile.location);
            if profile.profile_pic.is_some() {
                user.profile.profile_pic = profile.profile_pic;
            }
            user.profile.is_onboarded = true;
        })?;
        info!(user = %current.id, "onboarded");
        Ok(Json(AuthUserBody { user: updated.profile }))
    }

    pub async fn logout(Extension(state): Extension<State>, current: CurrentUser) -> Result<Json<ErrorBody>> {
        state.store.end_session(&current.token)?;
        Ok(Json(ErrorBody { message: String::from("Logout successful") }))
    }
}

pub mod relations {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::{Extension, Json};
    use lingo_common::{FriendRequest, FriendRequestId, FriendRequestLists, RequestStatus, SendFriendRequest, User};
    use tracing::info;
    use crate::error::{AppError, Result};
    use crate::users::StoredRequest;
    use crate::{CurrentUser, State};

    /// Onboarded users other than me and my friends.
    pub async fn recommended(Extension(state): Extension<State>, current: CurrentUser) -> Result<Json<Vec<User>>> {
        let me = state.store.user(&current.id)?.ok_or(AppError::Unauthorized)?;
        Ok(Json(state
            .store
            .users()?
            .into_iter()
            .map(|user| user.profile)
            .filter(|user| user.id != current.id && user.is_onboarded && !me.friends.contains(&user.id))
            .collect()))
    }

    pub async fn friends(Extension(state): Extension<State>, current: CurrentUser) -> Result<Json<Vec<User>>> {
        let me = state.store.user(&current.id)?.ok_or(AppError::Unauthorized)?;
        let mut friends = Vec::with_capacity(me.friends.len());
        for id in &me.friends {
            if let Some(friend) = state.store.profile(id)? {
                friends.push(friend);
            }
        }
        Ok(Json(friends))
    }

    pub async fn outgoing(Extension(state): Extension<State>, current: CurrentUser) -> Result<Json<Vec<FriendRequest>>> {
        let mut outgoing = Vec::new();
        for request in state.store.requests()? {
            if request.sender == current.id && request.status == RequestStatus::Pending {
                outgoing.push(state.store.populate(&request)?);
            }
        }
        Ok(Json(outgoing))
    }

    pub async fn incoming(Extension(state): Extension<State>, current: CurrentUser) -> Result<Json<FriendRequestLists>> {
        let mut lists = FriendRequestLists::default();
        for request in state.store.requests()? {
            match request.status {
                RequestStatus::Pending if request.recipient == current.id => {
                    lists.incoming.push(state.store.populate(&request)?)
                }
                RequestStatus::Accepted if request.sender == current.id => {
                    lists.accepted.push(state.store.populate(&request)?)
                }
                _ => {}
            }
        }
        Ok(Json(lists))
    }

    pub async fn send(Extension(state): Extension<State>, current: CurrentUser, Json(payload): Json<SendFriendRequest>) -> Result<(StatusCode, Json<FriendRequest>)> {
        let recipient = payload.recipient_id;
        if recipient == current.id {
            return Err(AppError::BadRequest(String::from("You can't send friend request to yourself")));
        }
        let _write = state.write().await;
        let target = state.store.user(&recipient)?.ok_or_else(|| AppError::NotFound(String::from("Recipient not found")))?;
        if target.friends.contains(&current.id) {
            return Err(AppError::Conflict(String::from("You are already friends with this user")));
        }
        let duplicate = state
            .store
            .requests()?
            .iter()
            .any(|request| request.status == RequestStatus::Pending && request.involves(&current.id, &recipient));
        if duplicate {
            return Err(AppError::Conflict(String::from("A friend request already exists between you and this user")));
        }
        let request = StoredRequest {
            id: FriendRequestId(uuid::Uuid::new_v4().simple().to_string()),
            sender: current.id.clone(),
            recipient,
            status: RequestStatus::Pending,
        };
        state.store.put_request(&request)?;
        info!(request = %request.id, from = %request.sender, to = %request.recipient, "friend request created");
        Ok((StatusCode::CREATED, Json(state.store.populate(&request)?)))
    }

    pub async fn accept(Extension(state): Extension<State>, current: CurrentUser, Path(id): Path<String>) -> Result<Json<FriendRequest>> {
        let _write = state.write().await;
        let mut request = state
            .store
            .request(&FriendRequestId(id))?
            .filter(|request| request.recipient == current.id)
            .ok_or_else(|| AppError::NotFound(String::from("Friend request not found")))?;
        if request.status == RequestStatus::Accepted {
            return Err(AppError::Conflict(String::from("Friend request already accepted")));
        }
        let (sender, recipient) = (request.sender.clone(), request.recipient.clone());
        state.store.user_mut(&sender, |user| {
            if !user.friends.contains(&recipient) {
                user.friends.push(recipient.clone());
            }
        })?;
        state.store.user_mut(&recipient, |user| {
            if !user.friends.contains(&sender) {
                user.friends.push(sender.clone());
            }
        })?;
        request.status = RequestStatus::Accepted;
        state.store.put_request(&request)?;
        info!(request = %request.id, "friend request accepted");
        Ok(Json(state.store.populate(&request)?))
    }
}
