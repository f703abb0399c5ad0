//! # Domain Module
//!
//! Contains the booking client's rules, independent of Yew and the browser.
//!
//! ## Module Organization
//!
//! - **calendar**: Six-week month grid, month navigation, calendar view model
//! - **availability**: Date range of a session and the selection within it
//! - **booking**: Reserve flow, button state and result toasts
//! - **payment**: Payment page redirect for intents that need payment
//! - **chat**: Conversation channels and message refresh
//! - **lessons**: Course and lesson normalization, course catalogue
//! - **reviews**: Review prompts for completed courses
//! - **account**: Signed-in user and profile
//! - **notifications**: Notification list
//!
//! ## Business Rules
//!
//! - A date is selectable only if it lies inside the session's range
//! - A full session never reaches the booking endpoint
//! - One booking request at a time per button
//! - Real-time events only invalidate; messages always come from the API

pub mod account;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod chat;
pub mod lessons;
pub mod notifications;
pub mod payment;
pub mod reviews;

pub use account::{stored_auth_header, AccountError, AccountService};
pub use availability::{resolve_availability, session_availability, Availability, SelectionState};
pub use booking::{BookingError, BookingOutcome, BookingService, ReserveButtonState, ReserveRequest};
pub use calendar::{CalendarCellView, CalendarService, CalendarView};
pub use chat::{
    conversation_channel, ChatError, ChatService, Conversation, MessageFeed, RealtimeChannel,
};
pub use lessons::{normalize_course, normalize_lessons, CourseService};
pub use notifications::NotificationService;
pub use payment::payment_redirect_url;
pub use reviews::ReviewService;
