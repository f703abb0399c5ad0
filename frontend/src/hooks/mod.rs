pub mod use_booking_intent;
pub mod use_chat;
pub mod use_session_availability;

/// Loading, error panel or content, for every data surface
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> FetchState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}
