pub mod booking_page;
pub mod chat_panel;
pub mod reserve_button;
pub mod session_calendar;
pub mod toast;
