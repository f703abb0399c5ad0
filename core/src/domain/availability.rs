//! Availability of a session's date range and the page's selection state.

use chrono::NaiveDate;
use log::debug;
use shared::Session;

use super::calendar::{first_of_month, CalendarService};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parse the calendar date written at the start of an ISO date or datetime.
///
/// Only the `YYYY-MM-DD` prefix is read, so `2024-03-01T23:30:00-05:00` is
/// March 1st no matter which timezone the client runs in.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    let (date, rest) = NaiveDate::parse_and_remainder(raw.trim(), DATE_KEY_FORMAT).ok()?;
    if rest.is_empty() || rest.starts_with(['T', 't', ' ']) {
        Some(date)
    } else {
        None
    }
}

/// Date-only key used on the wire and for set membership
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Ordered, gap-free set of bookable days
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Availability {
    dates: Vec<NaiveDate>,
}

impl Availability {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn keys(&self) -> Vec<String> {
        self.dates.iter().copied().map(date_key).collect()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        // dates are sorted, so the range check is exact
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => *first <= date && date <= *last,
            _ => false,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
            .map(|date| self.contains(date))
            .unwrap_or(false)
    }

    /// First available date, selected by default on load
    pub fn default_selection(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Month shown on load: the default selection's month, else `today`'s
    pub fn default_month(&self, today: NaiveDate) -> NaiveDate {
        first_of_month(self.default_selection().unwrap_or(today))
    }
}

/// Every day from `from_date` to `to_date` inclusive.
///
/// A missing or unparseable bound, or an inverted range, yields an empty set.
pub fn resolve_availability(from_date: Option<&str>, to_date: Option<&str>) -> Availability {
    let from = from_date.and_then(parse_date_key);
    let to = to_date.and_then(parse_date_key);
    let (Some(from), Some(to)) = (from, to) else {
        debug!("Availability empty: unusable range {:?}..{:?}", from_date, to_date);
        return Availability::empty();
    };

    if from > to {
        debug!("Availability empty: {} is after {}", from, to);
        return Availability::empty();
    }

    let dates: Vec<NaiveDate> = from.iter_days().take_while(|d| *d <= to).collect();
    debug!("Resolved {} available dates from {} to {}", dates.len(), from, to);

    Availability { dates }
}

/// Availability of a fetched session
pub fn session_availability(session: &Session) -> Availability {
    resolve_availability(session.from_date.as_deref(), session.to_date.as_deref())
}

/// Selected date and visible month of the booking page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    availability: Availability,
    selected: Option<NaiveDate>,
    visible_month: NaiveDate,
}

impl SelectionState {
    /// Start with the first available date selected and its month visible
    pub fn new(availability: Availability, today: NaiveDate) -> Self {
        let selected = availability.default_selection();
        let visible_month = availability.default_month(today);
        Self {
            availability,
            selected,
            visible_month,
        }
    }

    pub fn for_session(session: &Session, today: NaiveDate) -> Self {
        Self::new(session_availability(session), today)
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn selected_key(&self) -> Option<String> {
        self.selected.map(date_key)
    }

    pub fn visible_month(&self) -> NaiveDate {
        self.visible_month
    }

    /// Select `date` if it is available. Returns whether the selection changed
    /// hands to `date`; unavailable dates leave the state untouched.
    pub fn select(&mut self, date: NaiveDate) -> bool {
        if !self.availability.contains(date) {
            debug!("Ignoring selection of unavailable date {}", date);
            return false;
        }
        self.selected = Some(date);
        true
    }

    pub fn show_previous_month(&mut self) {
        self.visible_month = CalendarService.previous_month_start(self.visible_month);
    }

    pub fn show_next_month(&mut self) {
        self.visible_month = CalendarService.next_month_start(self.visible_month);
    }
}
