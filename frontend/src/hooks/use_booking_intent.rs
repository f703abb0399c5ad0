use brain_bridge_core::{
    ApiError, BookingError, BookingOutcome, BookingService, FetchScope, ReserveButtonState,
    ReserveRequest, SelectionState,
};
use gloo::timers::future::TimeoutFuture;
use log::{debug, error};
use shared::Toast;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::context::use_client;

const TOAST_TIMEOUT_MS: u32 = 4000;

#[derive(Clone, PartialEq)]
pub struct BookingIntentState {
    pub pending: bool,
    pub button: ReserveButtonState,
    pub toast: Option<Toast>,
}

pub struct UseBookingIntentResult {
    pub state: BookingIntentState,
    pub actions: UseBookingIntentActions,
}

#[derive(Clone)]
pub struct UseBookingIntentActions {
    pub reserve: Callback<MouseEvent>,
    pub dismiss_toast: Callback<()>,
}

#[derive(Clone, PartialEq)]
struct ReserveDeps {
    slot_id: i64,
    available_seats: Option<u32>,
    selection: Option<SelectionState>,
}

/// Reserve button behaviour for one slot
#[hook]
pub fn use_booking_intent(
    slot_id: i64,
    available_seats: Option<u32>,
    selection: Option<SelectionState>,
) -> UseBookingIntentResult {
    let client = use_client();
    let pending = use_state(|| false);
    let toast = use_state(|| Option::<Toast>::None);

    let toast_serial = use_mut_ref(|| 0u64);
    let scope = use_mut_ref(FetchScope::new);

    // Unmount aborts the booking call and silences pending toast timers
    {
        let scope = scope.clone();
        use_effect_with((), move |_| move || scope.borrow().cancel());
    }

    let show_toast = {
        let toast = toast.clone();
        let toast_serial = toast_serial.clone();
        let scope = scope.borrow().clone();
        use_callback((), move |next: Toast, _| {
            let serial = {
                let mut current = toast_serial.borrow_mut();
                *current += 1;
                *current
            };
            toast.set(Some(next));

            let toast = toast.clone();
            let toast_serial = toast_serial.clone();
            let scope = scope.clone();
            spawn_local(async move {
                TimeoutFuture::new(TOAST_TIMEOUT_MS).await;
                if scope.is_cancelled() {
                    return;
                }
                // Leave a newer toast alone
                if *toast_serial.borrow() == serial {
                    toast.set(None);
                }
            });
        })
    };

    let reserve = {
        let booking = client.booking.clone();
        let pending = pending.clone();
        let show_toast = show_toast.clone();
        let scope = scope.borrow().clone();
        let deps = ReserveDeps {
            slot_id,
            available_seats,
            selection,
        };

        use_callback(deps, move |_: MouseEvent, deps| {
            let booking = booking.clone();
            let pending = pending.clone();
            let show_toast = show_toast.clone();
            let scope = scope.clone();
            let deps = deps.clone();

            spawn_local(async move {
                let Some(selection) = deps.selection else {
                    return;
                };
                let request = ReserveRequest {
                    slot_id: deps.slot_id,
                    selection: &selection,
                    available_seats: deps.available_seats,
                };

                pending.set(true);
                let result = scope.run(booking.reserve(request)).await;
                if let Err(BookingError::Api(ApiError::Cancelled)) = result {
                    debug!("Booking intent for slot {} cancelled", deps.slot_id);
                    return;
                }
                pending.set(booking.is_pending());

                match &result {
                    Ok(BookingOutcome::PaymentRequired { redirect_url }) => {
                        if let Err(e) = gloo::utils::window().location().set_href(redirect_url) {
                            error!("Failed to open payment page: {:?}", e);
                        }
                    }
                    _ => {
                        if let Some(next) = BookingService::toast_for(&result) {
                            show_toast.emit(next);
                        }
                    }
                }
            });
        })
    };

    let dismiss_toast = {
        let toast = toast.clone();
        use_callback((), move |_: (), _| toast.set(None))
    };

    let state = BookingIntentState {
        pending: *pending,
        button: ReserveButtonState::new(available_seats, *pending),
        toast: (*toast).clone(),
    };

    let actions = UseBookingIntentActions {
        reserve,
        dismiss_toast,
    };

    UseBookingIntentResult { state, actions }
}
