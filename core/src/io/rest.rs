//! # REST API contract
//!
//! The Brain Bridge REST API is an external collaborator. This module fixes
//! the client's view of it: the endpoint paths, the [`BrainBridgeApi`] trait
//! the domain services call, and the error taxonomy every implementation
//! maps its failures into. The browser implementation lives in the frontend
//! crate (gloo `fetch`); tests plug in in-memory fakes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    BookingIntentRequest, BookingIntentResult, ChatMessage, Enrollment, Notification, RawCourse,
    SendMessageRequest, Session, UpdateProfileRequest, User,
};

/// Failure of a REST call, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response; `message` is already the best user-facing text
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
    /// The caller went away before the response arrived
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Build a status error from a response body
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: extract_error_message(status, body),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

/// Best-effort message from an error body: `message`, then `error`, then the
/// first Laravel-style field error, then a generic fallback.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        let text = |key: &str| {
            json.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        text("message").or_else(|| text("error")).or_else(|| {
            json.get("errors")
                .and_then(Value::as_object)
                .and_then(|fields| fields.values().next())
                .and_then(|messages| match messages {
                    Value::Array(items) => {
                        items.first().and_then(Value::as_str).map(str::to_string)
                    }
                    Value::String(s) => Some(s.clone()),
                    _ => None,
                })
        })
    });

    from_json.unwrap_or_else(|| format!("Request failed with status {}", status))
}

/// Decode a success body that may or may not be wrapped in `{"data": ...}`.
///
/// A top-level `data` key wins: payloads with all-default fields would
/// otherwise decode from the envelope itself.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let json: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    if let Some(data) = json.get("data").cloned() {
        return match serde_json::from_value::<T>(data) {
            Ok(value) => Ok(value),
            Err(wrapped_err) => {
                serde_json::from_value(json).map_err(|_| ApiError::Decode(wrapped_err.to_string()))
            }
        };
    }

    serde_json::from_value(json).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Value of the `Authorization` header
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Endpoint paths relative to the API base URL
pub mod endpoints {
    pub const PUBLIC_COURSES: &str = "/public-courses";
    pub const COURSES: &str = "/courses";
    pub const ME: &str = "/me";
    pub const ENROLLED_COURSES: &str = "/enrolled-courses";
    pub const BOOKING_INTENTS: &str = "/booking-intents";
    pub const NOTIFICATIONS: &str = "/notifications";
    pub const MESSAGES: &str = "/messages";

    pub fn public_course(id: i64) -> String {
        format!("{}/{}", PUBLIC_COURSES, id)
    }

    pub fn course(id: i64) -> String {
        format!("{}/{}", COURSES, id)
    }

    pub fn slot(id: i64) -> String {
        format!("/slots/{}", id)
    }

    pub fn conversation(other_user_id: i64) -> String {
        format!("{}/{}", MESSAGES, other_user_id)
    }
}

/// Calls the client makes against the REST API.
///
/// `?Send` because the browser's fetch futures are not `Send`.
#[async_trait(?Send)]
pub trait BrainBridgeApi {
    /// `GET /slots/{id}`
    async fn get_session(&self, slot_id: i64) -> Result<Session, ApiError>;

    /// `POST /booking-intents`
    async fn create_booking_intent(
        &self,
        request: &BookingIntentRequest,
    ) -> Result<BookingIntentResult, ApiError>;

    /// `GET /enrolled-courses`
    async fn get_enrolled_courses(&self) -> Result<Vec<Enrollment>, ApiError>;

    /// `GET /public-courses`
    async fn get_public_courses(&self) -> Result<Vec<RawCourse>, ApiError>;

    /// `GET /public-courses/{id}`
    async fn get_public_course(&self, course_id: i64) -> Result<RawCourse, ApiError>;

    /// `GET /courses` (the signed-in teacher's courses)
    async fn get_courses(&self) -> Result<Vec<RawCourse>, ApiError>;

    /// `DELETE /courses/{id}`
    async fn delete_course(&self, course_id: i64) -> Result<(), ApiError>;

    /// `GET /me`
    async fn get_me(&self) -> Result<User, ApiError>;

    /// `PUT /me`
    async fn update_me(&self, request: &UpdateProfileRequest) -> Result<User, ApiError>;

    /// `GET /notifications`
    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    /// `GET /messages/{user_id}`
    async fn get_messages(&self, other_user_id: i64) -> Result<Vec<ChatMessage>, ApiError>;

    /// `POST /messages`
    async fn send_message(&self, request: &SendMessageRequest) -> Result<ChatMessage, ApiError>;
}
