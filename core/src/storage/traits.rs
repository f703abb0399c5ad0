//! # Storage Traits
//!
//! Persistence the client needs between page loads: who is signed in (with
//! the bearer token) and which courses the student already reviewed. The
//! domain services receive these as injected trait objects; the browser
//! build backs them with localStorage, native builds with JSON files.

use anyhow::Result;
use shared::{AuthSession, User};
use std::collections::BTreeSet;

/// Signed-in account and its API token
pub trait UserStore: Send + Sync {
    /// Current session, if someone is signed in
    fn load_session(&self) -> Result<Option<AuthSession>>;

    /// Replace the stored session
    fn save_session(&self, session: &AuthSession) -> Result<()>;

    /// Replace the stored user, keeping the token.
    /// Fails when nobody is signed in.
    fn update_user(&self, user: &User) -> Result<()>;

    /// Forget the session (logout)
    fn clear(&self) -> Result<()>;
}

/// Courses the student has already left a review for
pub trait ReviewStore: Send + Sync {
    fn reviewed_courses(&self) -> Result<BTreeSet<i64>>;

    /// Record a review; recording the same course twice is a no-op
    fn mark_reviewed(&self, course_id: i64) -> Result<()>;

    fn has_reviewed(&self, course_id: i64) -> Result<bool> {
        Ok(self.reviewed_courses()?.contains(&course_id))
    }
}
