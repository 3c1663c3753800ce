pub mod config;
pub mod error;
pub mod routes;
pub mod users;

use std::net::TcpListener;
use std::sync::Arc;

use anyhow::anyhow;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Extension, Router};
use lingo_common::{paths, UserId};
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::users::Store;

#[derive(Clone)]
pub struct State {
    pub store: Store,
    /// Serializes check-then-write sequences such as the duplicate-request check.
    write_lock: Arc<Mutex<()>>,
}
impl State {
    pub fn new(store: Store) -> Self {
        Self { store, write_lock: Arc::new(Mutex::new(())) }
    }
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(Store::open(path)?))
    }
    pub fn temporary() -> Result<Self> {
        Ok(Self::new(Store::temporary()?))
    }
    pub async fn write(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

/// The signed-in user, resolved from `Authorization: Bearer <token>`.
pub struct CurrentUser {
    pub id: UserId,
    pub token: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Extension(app) = Extension::<State>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Internal(anyhow!("missing state: {e}")))?;
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();
        let id = app.store.session_user(&token)?.ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser { id, token })
    }
}

pub fn app(state: State) -> Router {
    let api = Router::new()
        .route(paths::SIGNUP, post(routes::auth::signup))
        .route(paths::ME, get(routes::auth::me))
        .route(paths::ONBOARDING, post(routes::auth::onboarding))
        .route(paths::LOGOUT, post(routes::auth::logout))
        .route(paths::RECOMMENDED_USERS, get(routes::relations::recommended))
        .route(paths::FRIENDS, get(routes::relations::friends))
        .route(paths::OUTGOING_REQUESTS, get(routes::relations::outgoing))
        .route(paths::INCOMING_REQUESTS, get(routes::relations::incoming))
        .route(paths::FRIEND_REQUESTS, post(routes::relations::send))
        .route("/friend-requests/:id/accept", post(routes::relations::accept));
    Router::new()
        .nest("/api", api)
        .layer(Extension(state))
}

/// Serves the API on an already-bound listener.
pub async fn serve(listener: TcpListener, state: State) -> anyhow::Result<()> {
    axum::Server::from_tcp(listener)?
        .serve(app(state).into_make_service())
        .await?;
    Ok(())
}
