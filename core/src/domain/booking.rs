//! Booking intent submission for a selected session date.
//!
//! `BookingService::reserve` validates the click locally, sends at most one
//! booking intent at a time and turns the server's answer into either a
//! payment redirect or a confirmation message. Nothing here retries; a
//! failed attempt is reported and the student clicks again.

use log::{debug, info, warn};
use shared::{BookingIntentRequest, Session, Toast};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::availability::{date_key, SelectionState};
use super::payment::payment_redirect_url;
use crate::io::rest::{ApiError, BrainBridgeApi};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Slot reserved successfully!";
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to reserve slot. Please try again.";

pub const LABEL_SEAT_FULL: &str = "Seat Full";
pub const LABEL_RESERVE: &str = "Reserve Slot";
pub const LABEL_RESERVING: &str = "Reserving...";

/// What the student asked to book
#[derive(Debug, Clone, Copy)]
pub struct ReserveRequest<'a> {
    pub slot_id: i64,
    pub selection: &'a SelectionState,
    /// `None` when the server does not track capacity
    pub available_seats: Option<u32>,
}

impl<'a> ReserveRequest<'a> {
    pub fn for_session(session: &Session, selection: &'a SelectionState) -> Self {
        Self {
            slot_id: session.id,
            selection,
            available_seats: session.available_seats,
        }
    }
}

/// Where the booking flow goes after a successful call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Navigate to the payment page
    PaymentRequired { redirect_url: String },
    /// Booked without payment; show `message`
    Reserved { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Please select a date")]
    NoDateSelected,
    #[error("Slot Full")]
    SlotFull,
    #[error("A reservation is already in progress")]
    AlreadyInFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Clears the pending flag when the call finishes, however it finishes
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct BookingService {
    api: Arc<dyn BrainBridgeApi>,
    payment_path: String,
    pending: Arc<AtomicBool>,
}

impl BookingService {
    pub fn new(api: Arc<dyn BrainBridgeApi>, payment_path: impl Into<String>) -> Self {
        Self {
            api,
            payment_path: payment_path.into(),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a booking intent call is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Load the slot shown on the booking page
    pub async fn fetch_session(&self, slot_id: i64) -> Result<Session, ApiError> {
        let session = self.api.get_session(slot_id).await?;
        debug!(
            "Loaded slot {} ({:?} to {:?})",
            session.id, session.from_date, session.to_date
        );
        Ok(session)
    }

    /// Submit a booking intent for the selected date.
    ///
    /// Preconditions are checked before any network call: the slot must
    /// have seats left and a date must be selected. Only one call can be in
    /// flight per service; a second click while pending is rejected.
    pub async fn reserve(
        &self,
        request: ReserveRequest<'_>,
    ) -> Result<BookingOutcome, BookingError> {
        if request.available_seats == Some(0) {
            info!("Reservation of slot {} rejected: no seats left", request.slot_id);
            return Err(BookingError::SlotFull);
        }

        let date = request.selection.selected().ok_or(BookingError::NoDateSelected)?;

        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BookingError::AlreadyInFlight);
        }
        let _pending = PendingGuard(&self.pending);

        let intent = BookingIntentRequest {
            slot_id: request.slot_id,
            scheduled_date: date_key(date),
        };
        info!("Submitting booking intent for slot {} on {}", intent.slot_id, intent.scheduled_date);

        let result = match self.api.create_booking_intent(&intent).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Booking intent for slot {} failed: {}", intent.slot_id, err);
                return Err(err.into());
            }
        };

        if let Some(redirect_url) = payment_redirect_url(&self.payment_path, &result) {
            info!("Slot {} requires payment, redirecting", intent.slot_id);
            return Ok(BookingOutcome::PaymentRequired { redirect_url });
        }

        let message = result
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
        info!("Slot {} reserved on {}", intent.slot_id, intent.scheduled_date);

        Ok(BookingOutcome::Reserved { message })
    }

    /// Toast for a finished attempt, `None` when there is nothing to show
    pub fn toast_for(result: &Result<BookingOutcome, BookingError>) -> Option<Toast> {
        match result {
            Ok(BookingOutcome::PaymentRequired { .. }) => None,
            Ok(BookingOutcome::Reserved { message }) => {
                Some(Toast::success("Reserved", message.clone()))
            }
            Err(BookingError::AlreadyInFlight) => None,
            Err(BookingError::Api(ApiError::Cancelled)) => None,
            Err(BookingError::SlotFull) => Some(Toast::error(
                "Slot Full",
                "There are no seats left in this session.",
            )),
            Err(BookingError::NoDateSelected) => Some(Toast::error(
                "No date selected",
                BookingError::NoDateSelected.to_string(),
            )),
            Err(BookingError::Api(err)) => {
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                Some(Toast::error("Reservation failed", message))
            }
        }
    }
}

/// Label and enabled state of the reserve button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveButtonState {
    pub label: &'static str,
    pub disabled: bool,
}

impl ReserveButtonState {
    pub fn new(available_seats: Option<u32>, pending: bool) -> Self {
        if available_seats == Some(0) {
            Self {
                label: LABEL_SEAT_FULL,
                disabled: true,
            }
        } else if pending {
            Self {
                label: LABEL_RESERVING,
                disabled: true,
            }
        } else {
            Self {
                label: LABEL_RESERVE,
                disabled: false,
            }
        }
    }
}
