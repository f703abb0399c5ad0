//! Test doubles shared by the service tests.

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;
use shared::{
    BookingIntentRequest, BookingIntentResult, ChatMessage, Enrollment, Notification, RawCourse,
    SendMessageRequest, Session, UpdateProfileRequest, User, UserRole,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::chat::{EventHandler, RealtimeChannel, RealtimeError};
use crate::io::rest::{ApiError, BrainBridgeApi};

/// In-memory stand-in for the REST API that records what it was asked
#[derive(Default)]
pub struct FakeApi {
    pub fail_with: Mutex<Option<ApiError>>,
    pub booking_response: Mutex<Option<Result<BookingIntentResult, ApiError>>>,
    pub booking_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub booking_requests: Mutex<Vec<BookingIntentRequest>>,
    pub session: Mutex<Option<Session>>,
    pub courses: Mutex<Vec<RawCourse>>,
    pub deleted_courses: Mutex<Vec<i64>>,
    pub enrollments: Mutex<Vec<Enrollment>>,
    pub me: Mutex<Option<User>>,
    pub profile_updates: Mutex<Vec<UpdateProfileRequest>>,
    pub messages: Mutex<Vec<ChatMessage>>,
    pub message_fetches: AtomicUsize,
    pub notifications: Mutex<Vec<Notification>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_booking_response(response: Result<BookingIntentResult, ApiError>) -> Self {
        let api = Self::default();
        *api.booking_response.lock().unwrap() = Some(response);
        api
    }

    pub fn booking_calls(&self) -> usize {
        self.booking_requests.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_response(404, r#"{"message": "Not found"}"#)
    }
}

#[async_trait(?Send)]
impl BrainBridgeApi for FakeApi {
    async fn get_session(&self, slot_id: i64) -> Result<Session, ApiError> {
        self.check()?;
        self.session
            .lock()
            .unwrap()
            .clone()
            .filter(|s| s.id == slot_id)
            .ok_or_else(Self::not_found)
    }

    async fn create_booking_intent(
        &self,
        request: &BookingIntentRequest,
    ) -> Result<BookingIntentResult, ApiError> {
        self.booking_requests.lock().unwrap().push(request.clone());
        let gate = self.booking_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.check()?;
        self.booking_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(BookingIntentResult::default()))
    }

    async fn get_enrolled_courses(&self) -> Result<Vec<Enrollment>, ApiError> {
        self.check()?;
        Ok(self.enrollments.lock().unwrap().clone())
    }

    async fn get_public_courses(&self) -> Result<Vec<RawCourse>, ApiError> {
        self.check()?;
        Ok(self.courses.lock().unwrap().clone())
    }

    async fn get_public_course(&self, course_id: i64) -> Result<RawCourse, ApiError> {
        self.check()?;
        self.courses
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn get_courses(&self) -> Result<Vec<RawCourse>, ApiError> {
        self.check()?;
        Ok(self.courses.lock().unwrap().clone())
    }

    async fn delete_course(&self, course_id: i64) -> Result<(), ApiError> {
        self.check()?;
        let mut courses = self.courses.lock().unwrap();
        let before = courses.len();
        courses.retain(|c| c.id != course_id);
        if courses.len() == before {
            return Err(Self::not_found());
        }
        self.deleted_courses.lock().unwrap().push(course_id);
        Ok(())
    }

    async fn get_me(&self) -> Result<User, ApiError> {
        self.check()?;
        self.me.lock().unwrap().clone().ok_or_else(Self::not_found)
    }

    async fn update_me(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        self.check()?;
        self.profile_updates.lock().unwrap().push(request.clone());
        let mut me = self.me.lock().unwrap();
        let user = me.as_mut().ok_or_else(Self::not_found)?;
        if let Some(name) = &request.name {
            user.name = name.clone();
        }
        if let Some(email) = &request.email {
            user.email = email.clone();
        }
        Ok(user.clone())
    }

    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.check()?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn get_messages(&self, other_user_id: i64) -> Result<Vec<ChatMessage>, ApiError> {
        self.check()?;
        self.message_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.sender_id == other_user_id || m.receiver_id == other_user_id)
            .cloned()
            .collect())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<ChatMessage, ApiError> {
        self.check()?;
        let mut messages = self.messages.lock().unwrap();
        let message = ChatMessage {
            id: messages.len() as i64 + 1,
            sender_id: 1,
            receiver_id: request.receiver_id,
            body: request.body.clone(),
            created_at: "2024-03-01T10:00:00Z".to_string(),
        };
        messages.push(message.clone());
        Ok(message)
    }
}

/// Real-time channel double: remembers handlers and lets tests fire events
#[derive(Default)]
pub struct FakeRealtime {
    pub fail_subscribe: bool,
    handlers: RefCell<HashMap<(String, String), EventHandler>>,
    pub unsubscribed: RefCell<Vec<String>>,
}

impl FakeRealtime {
    pub fn failing() -> Self {
        Self {
            fail_subscribe: true,
            ..Self::default()
        }
    }

    pub fn emit(&self, channel: &str, event: &str, payload: Value) {
        let handler = self
            .handlers
            .borrow()
            .get(&(channel.to_string(), event.to_string()))
            .cloned();
        if let Some(handler) = handler {
            handler(&payload);
        }
    }

    pub fn is_subscribed(&self, channel: &str) -> bool {
        self.handlers.borrow().keys().any(|(c, _)| c == channel)
    }
}

impl RealtimeChannel for FakeRealtime {
    fn subscribe(
        &self,
        channel: &str,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), RealtimeError> {
        if self.fail_subscribe {
            return Err(RealtimeError::Subscribe {
                channel: channel.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        self.handlers
            .borrow_mut()
            .insert((channel.to_string(), event.to_string()), handler);
        Ok(())
    }

    fn unsubscribe(&self, channel: &str) {
        self.handlers.borrow_mut().retain(|(c, _), _| c != channel);
        self.unsubscribed.borrow_mut().push(channel.to_string());
    }
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: UserRole::Student,
        avatar: None,
    }
}
