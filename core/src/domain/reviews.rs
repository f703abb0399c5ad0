//! Review prompts for completed courses.

use log::{info, warn};
use shared::Enrollment;
use std::sync::Arc;

use crate::io::rest::{ApiError, BrainBridgeApi};
use crate::storage::ReviewStore;

const COMPLETED: &str = "completed";

#[derive(Clone)]
pub struct ReviewService {
    api: Arc<dyn BrainBridgeApi>,
    store: Arc<dyn ReviewStore>,
}

impl ReviewService {
    pub fn new(api: Arc<dyn BrainBridgeApi>, store: Arc<dyn ReviewStore>) -> Self {
        Self { api, store }
    }

    /// True when the course is completed and the student has not reviewed it.
    /// An unreadable store suppresses the prompt.
    pub fn should_prompt_review(&self, course_id: i64, progress_status: &str) -> bool {
        if !progress_status.trim().eq_ignore_ascii_case(COMPLETED) {
            return false;
        }
        match self.store.has_reviewed(course_id) {
            Ok(reviewed) => !reviewed,
            Err(err) => {
                warn!("Could not read reviewed courses: {:#}", err);
                false
            }
        }
    }

    pub fn mark_reviewed(&self, course_id: i64) -> anyhow::Result<()> {
        self.store.mark_reviewed(course_id)?;
        info!("Course {} marked as reviewed", course_id);
        Ok(())
    }

    /// Enrollments that should show the review prompt, in input order
    pub fn pending_reviews<'a>(&self, enrollments: &'a [Enrollment]) -> Vec<&'a Enrollment> {
        enrollments
            .iter()
            .filter(|e| self.should_prompt_review(e.course_id, &e.progress_status))
            .collect()
    }

    pub async fn fetch_pending_reviews(&self) -> Result<Vec<Enrollment>, ApiError> {
        let enrollments = self.api.get_enrolled_courses().await?;
        Ok(self.pending_reviews(&enrollments).into_iter().cloned().collect())
    }
}
