//! # Account
//!
//! Sign-in state for the client. The API token and the signed-in user live in
//! the injected [`UserStore`]. The REST client builds its `Authorization`
//! header with [`stored_auth_header`] on every call, the same way
//! [`AccountService::auth_header`] does.

use log::{info, warn};
use shared::{AuthSession, UpdateProfileRequest, User};
use std::sync::Arc;

use crate::io::rest::{bearer, ApiError, BrainBridgeApi};
use crate::storage::UserStore;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Storage(format!("{:#}", err))
    }
}

/// `Authorization` header value for the session held in `store`
pub fn stored_auth_header(store: &dyn UserStore) -> anyhow::Result<Option<String>> {
    Ok(store.load_session()?.map(|session| bearer(&session.token)))
}

#[derive(Clone)]
pub struct AccountService {
    api: Arc<dyn BrainBridgeApi>,
    store: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(api: Arc<dyn BrainBridgeApi>, store: Arc<dyn UserStore>) -> Self {
        Self { api, store }
    }

    /// Persist the user and token returned by the login endpoint
    pub fn login(&self, user: User, token: impl Into<String>) -> Result<(), AccountError> {
        let session = AuthSession {
            user,
            token: token.into(),
        };
        self.store.save_session(&session)?;
        info!("Signed in as user {}", session.user.id);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AccountError> {
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().map(|s| s.user)
    }

    pub fn auth_token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    /// `Authorization` header value for the signed-in user
    pub fn auth_header(&self) -> Option<String> {
        stored_auth_header(self.store.as_ref()).unwrap_or_else(|err| {
            warn!("Could not read stored session: {:#}", err);
            None
        })
    }

    /// Reload the user from `GET /me`. A 401 means the token is dead, so the
    /// stored session is dropped.
    pub async fn refresh_profile(&self) -> Result<User, AccountError> {
        if self.session().is_none() {
            return Err(AccountError::NotSignedIn);
        }

        match self.api.get_me().await {
            Ok(user) => {
                self.store.update_user(&user)?;
                Ok(user)
            }
            Err(err) if err.is_unauthorized() => {
                warn!("Stored token rejected, signing out");
                self.store.clear()?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<User, AccountError> {
        if self.session().is_none() {
            return Err(AccountError::NotSignedIn);
        }

        let user = self.api.update_me(request).await?;
        self.store.update_user(&user)?;
        info!("Profile updated for user {}", user.id);
        Ok(user)
    }

    fn session(&self) -> Option<AuthSession> {
        self.store.load_session().unwrap_or_else(|err| {
            warn!("Could not read stored session: {:#}", err);
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{user, FakeApi};

    fn signed_in(api: &Arc<FakeApi>) -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AccountService::new(api.clone(), store.clone());
        service.login(user(1, "Ana"), "tok_1").unwrap();
        (service, store)
    }

    #[test]
    fn test_login_and_logout() {
        let api = Arc::new(FakeApi::new());
        let (service, _store) = signed_in(&api);

        assert_eq!(service.current_user(), Some(user(1, "Ana")));
        assert_eq!(service.auth_header().as_deref(), Some("Bearer tok_1"));

        service.logout().unwrap();
        assert_eq!(service.current_user(), None);
        assert_eq!(service.auth_header(), None);
    }

    #[test]
    fn test_stored_auth_header_follows_store() {
        let store = MemoryStore::new();
        assert_eq!(stored_auth_header(&store).unwrap(), None);

        store
            .save_session(&AuthSession {
                user: user(2, "Luis"),
                token: "tok_2".to_string(),
            })
            .unwrap();
        assert_eq!(stored_auth_header(&store).unwrap().as_deref(), Some("Bearer tok_2"));
    }

    #[tokio::test]
    async fn test_refresh_profile_updates_store() {
        let api = Arc::new(FakeApi::new());
        *api.me.lock().unwrap() = Some(user(1, "Ana Maria"));
        let (service, store) = signed_in(&api);

        let refreshed = service.refresh_profile().await.unwrap();

        assert_eq!(refreshed.name, "Ana Maria");
        let stored = store.load_session().unwrap().unwrap();
        assert_eq!(stored.user.name, "Ana Maria");
        assert_eq!(stored.token, "tok_1");
    }

    #[tokio::test]
    async fn test_unauthorized_refresh_signs_out() {
        let api = Arc::new(FakeApi::new());
        let unauthorized = ApiError::from_response(401, r#"{"message": "Unauthenticated."}"#);
        *api.fail_with.lock().unwrap() = Some(unauthorized);
        let (service, _store) = signed_in(&api);

        let err = service.refresh_profile().await.unwrap_err();

        assert_eq!(err.to_string(), "Unauthenticated.");
        assert_eq!(service.current_user(), None);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let api = Arc::new(FakeApi::new());
        *api.me.lock().unwrap() = Some(user(1, "Ana"));
        let (service, _store) = signed_in(&api);

        let request = UpdateProfileRequest {
            name: Some("Ana B".to_string()),
            email: None,
            bio: None,
        };
        let updated = service.update_profile(&request).await.unwrap();

        assert_eq!(updated.name, "Ana B");
        assert_eq!(service.current_user().unwrap().name, "Ana B");
        assert_eq!(api.profile_updates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_calls_require_sign_in() {
        let api = Arc::new(FakeApi::new());
        let service = AccountService::new(api.clone(), Arc::new(MemoryStore::new()));

        assert_eq!(service.refresh_profile().await, Err(AccountError::NotSignedIn));
        assert!(api.profile_updates.lock().unwrap().is_empty());
    }
}
