use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of bookable session offered by a teacher
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// One student, one teacher
    OneToOne,
    /// Several students share the slot up to its capacity
    Group,
    /// Any type the client does not know about yet
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::OneToOne => write!(f, "One-to-one"),
            SessionType::Group => write!(f, "Group"),
            SessionType::Other => write!(f, "Session"),
        }
    }
}

/// Minimal teacher information embedded in a session payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Minimal subject information embedded in a session payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub id: i64,
    pub name: String,
}

/// A bookable slot window (one-to-one or group) as served by `GET /slots/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    /// First bookable day (ISO date or datetime string)
    #[serde(default)]
    pub from_date: Option<String>,
    /// Last bookable day, inclusive
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price: Option<f64>,
    /// Remaining capacity; `None` when the server does not track seats
    #[serde(default)]
    pub available_seats: Option<u32>,
    #[serde(rename = "type", default)]
    pub session_type: SessionType,
    #[serde(default)]
    pub teacher: Option<TeacherSummary>,
    #[serde(default)]
    pub subject: Option<SubjectSummary>,
}

/// One cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCell {
    pub date: NaiveDate,
    /// False for the overflow days borrowed from the neighbouring months
    pub is_current_month: bool,
}

/// Body of `POST /booking-intents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingIntentRequest {
    pub slot_id: i64,
    /// Date-only key, `YYYY-MM-DD`
    pub scheduled_date: String,
}

/// Response of `POST /booking-intents`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingIntentResult {
    #[serde(default)]
    pub requires_payment: bool,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    /// Slot summary forwarded untouched to the payment page
    #[serde(default)]
    pub slot: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    Success,
    Error,
}

/// User-facing notification raised by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Lesson entry as the API sends it. Older course payloads use different
/// field names for the same data, so everything is optional here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLesson {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub position: Option<u32>,
}

/// Course as served by `/courses` and `/public-courses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCourse {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price: Option<f64>,
    #[serde(default)]
    pub teacher: Option<TeacherSummary>,
    #[serde(default)]
    pub subject: Option<SubjectSummary>,
    #[serde(default)]
    pub video_lessons: Option<Vec<RawLesson>>,
    #[serde(default)]
    pub videos: Option<Vec<RawLesson>>,
}

/// Lesson after normalization at the data-access boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    /// Absolute media URL, if the lesson has a video
    pub video_url: Option<String>,
    pub duration_seconds: Option<u32>,
    pub position: u32,
}

/// Course with its lessons normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<f64>,
    pub teacher: Option<TeacherSummary>,
    pub subject: Option<SubjectSummary>,
    pub lessons: Vec<Lesson>,
}

/// Role of an authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
    Admin,
}

/// Account returned by `GET /me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Body of `PUT /me`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Persisted authentication: the user and the bearer token for the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// A student's confirmed relationship to a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub progress_status: String,
}

/// Chat message between two participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    #[serde(alias = "message")]
    pub body: String,
    pub created_at: String,
}

/// Body of `POST /messages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub body: String,
}

/// Entry of `GET /notifications`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: String,
}

/// Laravel-style APIs serialize decimals as strings ("50.00"); accept both.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Number(f64),
        Text(String),
    }

    match Option::<Flexible>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flexible::Number(n)) => Ok(Some(n)),
        Some(Flexible::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Flexible::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
