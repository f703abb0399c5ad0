use shared::Session;
use yew::prelude::*;

use super::chat_panel::ChatPanel;
use super::reserve_button::ReserveButton;
use super::session_calendar::SessionCalendar;
use super::toast::ToastView;
use crate::hooks::use_booking_intent::use_booking_intent;
use crate::hooks::use_session_availability::use_session_availability;
use crate::hooks::FetchState;

#[derive(Properties, PartialEq)]
pub struct BookingPageProps {
    pub slot_id: i64,
}

#[function_component(BookingPage)]
pub fn booking_page(props: &BookingPageProps) -> Html {
    let availability = use_session_availability(props.slot_id);
    let available_seats = availability
        .state
        .session
        .loaded()
        .and_then(|session| session.available_seats);
    let booking = use_booking_intent(
        props.slot_id,
        available_seats,
        availability.state.selection.clone(),
    );

    let content = match &availability.state.session {
        FetchState::Loading => html! {
            <div class="loading">{"Loading session..."}</div>
        },
        FetchState::Failed(error) => html! {
            <div class="form-message error">
                <div class="error-title">{"Could not load this session"}</div>
                <div>{error}</div>
            </div>
        },
        FetchState::Loaded(session) => html! {
            <>
                <SessionSummary session={session.clone()} />

                {match availability.state.calendar.clone() {
                    Some(view) => html! {
                        <SessionCalendar
                            {view}
                            on_select={availability.actions.select_date.clone()}
                            on_previous={availability.actions.prev_month.clone()}
                            on_next={availability.actions.next_month.clone()}
                        />
                    },
                    None => html! {},
                }}

                <div class="selected-date">
                    {match availability.state.selection.as_ref().and_then(|s| s.selected_key()) {
                        Some(key) => format!("Selected date: {}", key),
                        None => "No dates available for this session".to_string(),
                    }}
                </div>

                <ReserveButton
                    state={booking.state.button}
                    onclick={booking.actions.reserve.clone()}
                />

                {match session.teacher.as_ref() {
                    Some(teacher) => html! {
                        <ChatPanel other_user_id={teacher.id} other_name={teacher.name.clone()} />
                    },
                    None => html! {},
                }}
            </>
        },
    };

    html! {
        <section class="booking-page">
            {content}
            <ToastView
                toast={booking.state.toast.clone()}
                on_dismiss={booking.actions.dismiss_toast.clone()}
            />
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct SessionSummaryProps {
    session: Session,
}

#[function_component(SessionSummary)]
fn session_summary(props: &SessionSummaryProps) -> Html {
    let session = &props.session;
    let subject = session
        .subject
        .as_ref()
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "Session".to_string());
    let time = match (&session.start_time, &session.end_time) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        (Some(start), None) => start.clone(),
        _ => "Time to be announced".to_string(),
    };

    html! {
        <div class="session-summary">
            <h2>{subject}</h2>
            {if let Some(teacher) = session.teacher.as_ref() {
                html! { <div class="session-teacher">{format!("with {}", teacher.name)}</div> }
            } else { html! {} }}
            <div class="session-meta">
                <span class="session-type">{session.session_type.to_string()}</span>
                <span class="session-time">{time}</span>
                {if let Some(price) = session.price {
                    html! { <span class="session-price">{format!("${:.2}", price)}</span> }
                } else { html! {} }}
                {if let Some(seats) = session.available_seats {
                    html! { <span class="session-seats">{format!("{} seats left", seats)}</span> }
                } else { html! {} }}
            </div>
        </div>
    }
}
