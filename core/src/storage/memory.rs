use anyhow::{anyhow, Result};
use shared::{AuthSession, User};
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use super::traits::{ReviewStore, UserStore};

/// Process-local store, used by tests and short-lived tools
#[derive(Default)]
pub struct MemoryStore {
    session: Mutex<Option<AuthSession>>,
    reviewed: Mutex<BTreeSet<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn load_session(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save_session(&self, session: &AuthSession) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let session = guard.as_mut().ok_or_else(|| anyhow!("No signed-in user to update"))?;
        session.user = user.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

impl ReviewStore for MemoryStore {
    fn reviewed_courses(&self) -> Result<BTreeSet<i64>> {
        Ok(self.reviewed.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn mark_reviewed(&self, course_id: i64) -> Result<()> {
        self.reviewed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(course_id);
        Ok(())
    }
}
