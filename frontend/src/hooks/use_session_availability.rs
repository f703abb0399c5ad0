use brain_bridge_core::{ApiError, CalendarView, FetchScope, SelectionState};
use chrono::{Local, NaiveDate};
use log::warn;
use shared::Session;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::FetchState;
use crate::context::use_client;

#[derive(Clone, PartialEq)]
pub struct SessionAvailabilityState {
    pub session: FetchState<Session>,
    pub selection: Option<SelectionState>,
    pub calendar: Option<CalendarView>,
}

pub struct UseSessionAvailabilityResult {
    pub state: SessionAvailabilityState,
    pub actions: UseSessionAvailabilityActions,
}

#[derive(Clone)]
pub struct UseSessionAvailabilityActions {
    pub select_date: Callback<NaiveDate>,
    pub prev_month: Callback<MouseEvent>,
    pub next_month: Callback<MouseEvent>,
}

/// Load slot `slot_id` and track the student's date selection for it
#[hook]
pub fn use_session_availability(slot_id: i64) -> UseSessionAvailabilityResult {
    let client = use_client();
    let session = use_state(|| FetchState::<Session>::Loading);
    let selection = use_state(|| Option::<SelectionState>::None);

    // Fetch on mount and whenever the slot changes; teardown cancels
    {
        let booking = client.booking.clone();
        let session = session.clone();
        let selection = selection.clone();

        use_effect_with(slot_id, move |&slot_id| {
            let scope = FetchScope::new();
            session.set(FetchState::Loading);
            selection.set(None);

            {
                let scope = scope.clone();
                spawn_local(async move {
                    match scope.run(booking.fetch_session(slot_id)).await {
                        Ok(data) => {
                            let today = Local::now().date_naive();
                            selection.set(Some(SelectionState::for_session(&data, today)));
                            session.set(FetchState::Loaded(data));
                        }
                        Err(ApiError::Cancelled) => {}
                        Err(e) => {
                            warn!("Failed to load slot {}: {}", slot_id, e);
                            session.set(FetchState::Failed(e.to_string()));
                        }
                    }
                });
            }

            move || scope.cancel()
        });
    }

    let select_date = {
        let selection = selection.clone();
        use_callback(selection, move |date: NaiveDate, selection| {
            if let Some(mut current) = (**selection).clone() {
                if current.select(date) {
                    selection.set(Some(current));
                }
            }
        })
    };

    let prev_month = {
        let selection = selection.clone();
        use_callback(selection, move |_: MouseEvent, selection| {
            if let Some(mut current) = (**selection).clone() {
                current.show_previous_month();
                selection.set(Some(current));
            }
        })
    };

    let next_month = {
        let selection = selection.clone();
        use_callback(selection, move |_: MouseEvent, selection| {
            if let Some(mut current) = (**selection).clone() {
                current.show_next_month();
                selection.set(Some(current));
            }
        })
    };

    let calendar = selection
        .as_ref()
        .map(|current| CalendarView::build(&client.calendar, current));

    let state = SessionAvailabilityState {
        session: (*session).clone(),
        selection: (*selection).clone(),
        calendar,
    };

    let actions = UseSessionAvailabilityActions {
        select_date,
        prev_month,
        next_month,
    };

    UseSessionAvailabilityResult { state, actions }
}
