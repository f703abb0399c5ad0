//! `localStorage` backed stores. Values are stored as JSON.

use anyhow::{anyhow, Context, Result};
use brain_bridge_core::{ReviewStore, UserStore};
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use shared::{AuthSession, User};
use std::collections::BTreeSet;

const USER_KEY: &str = "user";
const TOKEN_KEY: &str = "token";
const REVIEWED_KEY: &str = "reviewedCourses";

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    pub fn new() -> Self {
        Self
    }
}

/// A missing key is "nothing stored", not an error
fn read<T: serde::de::DeserializeOwned>(key: &str) -> Result<Option<T>> {
    match LocalStorage::get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::KeyNotFound(_)) => Ok(None),
        Err(e) => Err(anyhow!("{}", e))
            .with_context(|| format!("Failed to read {} from localStorage", key)),
    }
}

fn write<T: serde::Serialize>(key: &str, value: &T) -> Result<()> {
    LocalStorage::set(key, value)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Failed to write {} to localStorage", key))
}

impl UserStore for BrowserStore {
    fn load_session(&self) -> Result<Option<AuthSession>> {
        let user = read::<User>(USER_KEY)?;
        let token = read::<String>(TOKEN_KEY)?;
        Ok(match (user, token) {
            (Some(user), Some(token)) => Some(AuthSession { user, token }),
            _ => None,
        })
    }

    fn save_session(&self, session: &AuthSession) -> Result<()> {
        write(USER_KEY, &session.user)?;
        write(TOKEN_KEY, &session.token)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        if read::<String>(TOKEN_KEY)?.is_none() {
            return Err(anyhow!("No signed-in user to update"));
        }
        write(USER_KEY, user)
    }

    fn clear(&self) -> Result<()> {
        LocalStorage::delete(USER_KEY);
        LocalStorage::delete(TOKEN_KEY);
        Ok(())
    }
}

impl ReviewStore for BrowserStore {
    fn reviewed_courses(&self) -> Result<BTreeSet<i64>> {
        Ok(read::<BTreeSet<i64>>(REVIEWED_KEY)?.unwrap_or_default())
    }

    fn mark_reviewed(&self, course_id: i64) -> Result<()> {
        let mut reviewed = self.reviewed_courses()?;
        if reviewed.insert(course_id) {
            write(REVIEWED_KEY, &reviewed)?;
        }
        Ok(())
    }
}
