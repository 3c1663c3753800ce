use std::sync::Arc;

use lingo_common::non_api_structs::ListKey;
use lingo_common::{OnboardingProfile, User};
use tracing::{info, warn};

use crate::backend::Backend;
use crate::cache::QueryCache;
use crate::error::{ClientError, Result};
use crate::notice::{self, Notice, NoticeSender};
use crate::queries::fetch_auth_user;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuthState {
    Authenticated(User),
    Unauthenticated,
}

/// Who is signed in, plus the profile and logout mutations.
pub struct Session {
    backend: Arc<dyn Backend>,
    cache: Arc<QueryCache>,
    notices: NoticeSender,
}

impl Session {
    pub fn new(backend: Arc<dyn Backend>, cache: Arc<QueryCache>, notices: NoticeSender) -> Self {
        Self { backend, cache, notices }
    }

    /// A 401 from the backend means "nobody signed in", not a failure.
    pub async fn current_user(&self) -> Result<AuthState> {
        let user = self
            .cache
            .auth_user
            .load(|| fetch_auth_user(self.backend.as_ref()))
            .await?;
        Ok(match &*user {
            Some(user) => AuthState::Authenticated(user.clone()),
            None => AuthState::Unauthenticated,
        })
    }

    pub async fn require_user(&self) -> Result<User> {
        match self.current_user().await? {
            AuthState::Authenticated(user) => Ok(user),
            AuthState::Unauthenticated => Err(ClientError::Unauthorized),
        }
    }

    pub async fn complete_onboarding(&self, profile: &OnboardingProfile) -> Result<User> {
        let missing = profile.missing_fields();
        if !missing.is_empty() {
            let err = ClientError::Rejected {
                status: 400,
                message: format!("Missing required fields: {}", missing.join(", ")),
            };
            self.notify(Notice::error(&err));
            return Err(err);
        }
        match self.backend.complete_onboarding(profile).await {
            Ok(user) => {
                info!(user = %user.id, "onboarding completed");
                self.cache.invalidate(ListKey::AuthUser);
                self.notify(Notice::success("Profile onboarded successfully!"));
                Ok(user)
            }
            Err(err) => Err(self.fail("onboarding", err)),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        match self.backend.logout().await {
            Ok(()) => {
                info!("logged out");
                self.cache.end_session();
                Ok(())
            }
            Err(err) => Err(self.fail("logout", err)),
        }
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
