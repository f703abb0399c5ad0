//! # Brain Bridge client core
//!
//! Contains all non-UI logic of the Brain Bridge booking client.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Calendar, availability, booking and the other client rules
//! - **Storage**: What the client remembers between page loads
//! - **IO**: The REST API contract and request cancellation
//!
//! Nothing here depends on Yew or the browser. The frontend crate supplies
//! the browser implementations of [`io::BrainBridgeApi`],
//! [`storage::UserStore`], [`storage::ReviewStore`] and
//! [`domain::RealtimeChannel`] and hands them to [`initialize_client`].
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (Yew frontend)
//!     ↓
//! Domain Layer (services, view models)
//!     ↓
//! IO Layer (REST contract)     Storage Layer (session, reviews)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
mod testing;

use log::info;
use std::rc::Rc;
use std::sync::Arc;

pub use config::{ClientConfig, ConfigError};
pub use domain::*;
pub use io::{ApiError, BrainBridgeApi, FetchScope};
pub use storage::{ReviewStore, UserStore};

/// Every service the UI needs, wired to one API client and one set of stores
#[derive(Clone)]
pub struct ClientState {
    pub config: ClientConfig,
    pub calendar: CalendarService,
    pub booking: BookingService,
    pub courses: CourseService,
    pub chat: ChatService,
    pub account: AccountService,
    pub reviews: ReviewService,
    pub notifications: NotificationService,
}

/// Initialize the client with all required services
pub fn initialize_client(
    config: ClientConfig,
    api: Arc<dyn BrainBridgeApi>,
    users: Arc<dyn UserStore>,
    reviews: Arc<dyn ReviewStore>,
    realtime: Rc<dyn RealtimeChannel>,
) -> ClientState {
    info!("Setting up domain services");
    let calendar = CalendarService::new();
    let booking = BookingService::new(api.clone(), config.payment_path.clone());
    let courses = CourseService::new(api.clone(), config.media_base_url.clone());
    let chat = ChatService::new(api.clone(), realtime);
    let account = AccountService::new(api.clone(), users);
    let reviews = ReviewService::new(api.clone(), reviews);
    let notifications = NotificationService::new(api);

    info!("Client state ready");
    ClientState {
        config,
        calendar,
        booking,
        courses,
        chat,
        account,
        reviews,
        notifications,
    }
}
