//! JSON-file backed stores for native builds.
//!
//! Each concern gets one small file under the data directory. Writes go to a
//! temporary sibling first and are renamed into place.

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use shared::{AuthSession, User};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::{ReviewStore, UserStore};

const SESSION_FILE: &str = "auth_session.json";
const REVIEWS_FILE: &str = "reviewed_courses.json";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create data directory {}", base_dir.display()))?;
        info!("Using data directory {}", base_dir.display());
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.base_dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt JSON in {}", path.display()))?;
        Ok(Some(value))
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.base_dir.join(file);
        let tmp = self.base_dir.join(format!("{}.tmp", file));
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, file: &str) -> Result<()> {
        let path = self.base_dir.join(file);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

impl UserStore for JsonFileStore {
    fn load_session(&self) -> Result<Option<AuthSession>> {
        self.read(SESSION_FILE)
    }

    fn save_session(&self, session: &AuthSession) -> Result<()> {
        self.write(SESSION_FILE, session)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut session: AuthSession = self
            .read(SESSION_FILE)?
            .ok_or_else(|| anyhow!("No signed-in user to update"))?;
        session.user = user.clone();
        self.write(SESSION_FILE, &session)
    }

    fn clear(&self) -> Result<()> {
        self.remove(SESSION_FILE)
    }
}

impl ReviewStore for JsonFileStore {
    fn reviewed_courses(&self) -> Result<BTreeSet<i64>> {
        Ok(self.read(REVIEWS_FILE)?.unwrap_or_default())
    }

    fn mark_reviewed(&self, course_id: i64) -> Result<()> {
        let mut reviewed = self.reviewed_courses()?;
        if reviewed.insert(course_id) {
            self.write(REVIEWS_FILE, &reviewed)?;
        }
        Ok(())
    }
}
