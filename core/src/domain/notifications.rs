use shared::Notification;
use std::sync::Arc;

use crate::io::rest::{ApiError, BrainBridgeApi};

#[derive(Clone)]
pub struct NotificationService {
    api: Arc<dyn BrainBridgeApi>,
}

impl NotificationService {
    pub fn new(api: Arc<dyn BrainBridgeApi>) -> Self {
        Self { api }
    }

    /// Newest first
    pub async fn fetch(&self) -> Result<Vec<Notification>, ApiError> {
        let mut notifications = self.api.get_notifications().await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    pub fn unread_count(notifications: &[Notification]) -> usize {
        notifications.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn notification(id: i64, read: bool, created_at: &str) -> Notification {
        Notification {
            id,
            title: format!("Notice {}", id),
            body: String::new(),
            read,
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_sorts_newest_first_and_counts_unread() {
        let api = Arc::new(FakeApi::new());
        *api.notifications.lock().unwrap() = vec![
            notification(1, true, "2024-03-01T09:00:00Z"),
            notification(2, false, "2024-03-02T09:00:00Z"),
            notification(3, false, "2024-02-28T09:00:00Z"),
        ];
        let service = NotificationService::new(api);

        let notifications = service.fetch().await.unwrap();
        let ids: Vec<i64> = notifications.iter().map(|n| n.id).collect();

        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(NotificationService::unread_count(&notifications), 2);
    }

    #[tokio::test]
    async fn test_fetch_propagates_errors() {
        let api = Arc::new(FakeApi::new());
        *api.fail_with.lock().unwrap() = Some(ApiError::Network("offline".to_string()));
        let service = NotificationService::new(api);

        assert_eq!(service.fetch().await, Err(ApiError::Network("offline".to_string())));
    }
}
