use brain_bridge_core::domain::calendar::WEEKDAY_LABELS;
use brain_bridge_core::{CalendarCellView, CalendarView};
use chrono::{Datelike, NaiveDate};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SessionCalendarProps {
    pub view: CalendarView,
    pub on_select: Callback<NaiveDate>,
    pub on_previous: Callback<MouseEvent>,
    pub on_next: Callback<MouseEvent>,
}

/// Month grid where only the session's dates can be picked
#[function_component(SessionCalendar)]
pub fn session_calendar(props: &SessionCalendarProps) -> Html {
    html! {
        <div class="session-calendar">
            <div class="calendar-header">
                <button class="calendar-nav-btn" onclick={props.on_previous.clone()} title="Previous Month">
                    {"‹"}
                </button>
                <h3 class="calendar-title">{&props.view.title}</h3>
                <button class="calendar-nav-btn" onclick={props.on_next.clone()} title="Next Month">
                    {"›"}
                </button>
            </div>

            <div class="calendar-weekdays">
                {for WEEKDAY_LABELS.iter().map(|label| html! {
                    <div class="weekday">{*label}</div>
                })}
            </div>

            <div class="calendar-grid">
                {for props.view.weeks().map(|week| html! {
                    <div class="calendar-week">
                        {for week.iter().map(|cell| day_cell(cell, &props.on_select))}
                    </div>
                })}
            </div>
        </div>
    }
}

fn day_cell(cell: &CalendarCellView, on_select: &Callback<NaiveDate>) -> Html {
    let classes = classes!(
        "calendar-day",
        (!cell.cell.is_current_month).then_some("outside"),
        if cell.selectable { "available" } else { "disabled" },
        cell.selected.then_some("selected"),
    );

    let onclick = {
        let on_select = on_select.clone();
        let date = cell.cell.date;
        let selectable = cell.selectable;
        Callback::from(move |_: MouseEvent| {
            if selectable {
                on_select.emit(date);
            }
        })
    };

    html! {
        <button
            key={cell.key.clone()}
            class={classes}
            disabled={!cell.selectable}
            data-date={cell.key.clone()}
            {onclick}
        >
            {cell.cell.date.day()}
        </button>
    }
}
