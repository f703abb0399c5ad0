//! Calendar domain logic for the session booking page.
//!
//! Builds the fixed 6-week month grid the booking calendar renders and the
//! per-cell view model (selectable / selected) derived from a session's
//! availability. The UI only draws what this module computes.

use chrono::{Datelike, Days, Months, NaiveDate};
use log::debug;
use shared::DateCell;

use super::availability::{date_key, SelectionState};

/// Cells in the month grid: 6 rows of 7 days
pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Calendar service that handles all date-grid calculations
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Build the Sunday-first grid for the month containing `month`.
    ///
    /// The grid starts with as many trailing days of the previous month as the
    /// weekday index of the 1st, continues with every day of the month and is
    /// padded with the leading days of the next month up to 42 cells.
    pub fn build_calendar_grid(&self, month: NaiveDate) -> Vec<DateCell> {
        let first = first_of_month(month);
        let padding_before = first.weekday().num_days_from_sunday();

        let mut cells = Vec::with_capacity(GRID_CELLS);

        // Trailing days of the previous month, oldest first
        for offset in (1..=padding_before).rev() {
            if let Some(date) = first.checked_sub_days(Days::new(u64::from(offset))) {
                cells.push(DateCell {
                    date,
                    is_current_month: false,
                });
            }
        }

        let days = self.days_in_month(first.month(), first.year());
        cells.extend(
            first
                .iter_days()
                .take(days as usize)
                .map(|date| DateCell {
                    date,
                    is_current_month: true,
                }),
        );

        // Leading days of the next month
        let mut last = cells.last().map(|c| c.date).unwrap_or(first);
        while cells.len() < GRID_CELLS {
            match last.succ_opt() {
                Some(next) => {
                    cells.push(DateCell {
                        date: next,
                        is_current_month: false,
                    });
                    last = next;
                }
                None => break,
            }
        }

        debug!(
            "Built calendar grid for {}: {} padding days before, {} cells",
            self.format_month_title(first),
            padding_before,
            cells.len()
        );

        cells
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Header shown above the grid, e.g. "March 2024"
    pub fn format_month_title(&self, month: NaiveDate) -> String {
        format!("{} {}", self.month_name(month.month()), month.year())
    }

    /// First day of the month before `month`
    pub fn previous_month_start(&self, month: NaiveDate) -> NaiveDate {
        let first = first_of_month(month);
        first.checked_sub_months(Months::new(1)).unwrap_or(first)
    }

    /// First day of the month after `month`
    pub fn next_month_start(&self, month: NaiveDate) -> NaiveDate {
        let first = first_of_month(month);
        first.checked_add_months(Months::new(1)).unwrap_or(first)
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// One rendered grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCellView {
    pub cell: DateCell,
    pub key: String,
    /// Only dates in the availability set can be clicked
    pub selectable: bool,
    pub selected: bool,
}

/// Everything the booking calendar needs to draw one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub title: String,
    pub cells: Vec<CalendarCellView>,
}

impl CalendarView {
    pub fn build(calendar: &CalendarService, selection: &SelectionState) -> Self {
        let visible = selection.visible_month();
        let selected = selection.selected();

        let cells = calendar
            .build_calendar_grid(visible)
            .into_iter()
            .map(|cell| CalendarCellView {
                key: date_key(cell.date),
                selectable: selection.availability().contains(cell.date),
                selected: selected == Some(cell.date),
                cell,
            })
            .collect();

        Self {
            title: calendar.format_month_title(visible),
            cells,
        }
    }

    /// Cells grouped into the six rendered rows
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCellView]> {
        self.cells.chunks(WEEKDAY_LABELS.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::resolve_availability;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        let service = CalendarService::new();

        assert_eq!(service.days_in_month(1, 2025), 31);
        assert_eq!(service.days_in_month(4, 2025), 30);
        assert_eq!(service.days_in_month(2, 2025), 28);
        assert_eq!(service.days_in_month(2, 2024), 29);
    }

    #[test]
    fn test_is_leap_year() {
        let service = CalendarService::new();

        assert!(!service.is_leap_year(2025));
        assert!(service.is_leap_year(2024));
        assert!(!service.is_leap_year(1900));
        assert!(service.is_leap_year(2000));
    }

    #[test]
    fn test_month_name() {
        let service = CalendarService::new();

        assert_eq!(service.month_name(1), "January");
        assert_eq!(service.month_name(12), "December");
        assert_eq!(service.month_name(13), "Invalid Month");
    }

    #[test]
    fn test_navigation() {
        let service = CalendarService::new();

        assert_eq!(service.previous_month_start(date(2025, 1, 20)), date(2024, 12, 1));
        assert_eq!(service.next_month_start(date(2024, 12, 31)), date(2025, 1, 1));
    }

    #[test]
    fn test_grid_properties_hold_for_every_month() {
        let service = CalendarService::new();

        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let reference = date(year, month, 1);
                let grid = service.build_calendar_grid(reference);

                assert_eq!(grid.len(), GRID_CELLS, "{}-{}", year, month);

                let in_month: Vec<_> = grid.iter().filter(|c| c.is_current_month).collect();
                assert_eq!(in_month.len() as u32, service.days_in_month(month, year));
                assert!(in_month.iter().all(|c| c.date.month() == month && c.date.year() == year));
                assert_eq!(in_month[0].date.day(), 1);

                for pair in grid.windows(2) {
                    assert_eq!(
                        pair[0].date.succ_opt(),
                        Some(pair[1].date),
                        "gap in {}-{}",
                        year,
                        month
                    );
                }

                assert_eq!(grid[0].date.weekday().num_days_from_sunday(), 0);
            }
        }
    }

    #[test]
    fn test_grid_for_month_starting_on_sunday_has_no_leading_padding() {
        let service = CalendarService::new();
        // September 2024 starts on a Sunday
        let grid = service.build_calendar_grid(date(2024, 9, 15));

        assert_eq!(grid[0], DateCell { date: date(2024, 9, 1), is_current_month: true });
        assert_eq!(grid[41].date, date(2024, 10, 12));
    }

    #[test]
    fn test_december_grid_rolls_into_january() {
        let service = CalendarService::new();
        let grid = service.build_calendar_grid(date(2024, 12, 1));

        // December 1st 2024 is a Sunday; the tail runs into 2025
        assert_eq!(grid[0].date, date(2024, 12, 1));
        assert_eq!(grid[31].date, date(2025, 1, 1));
        assert!(!grid[31].is_current_month);
        assert_eq!(grid[41].date, date(2025, 1, 11));
    }

    #[test]
    fn test_january_grid_starts_in_previous_december() {
        let service = CalendarService::new();
        let grid = service.build_calendar_grid(date(2025, 1, 1));

        // January 1st 2025 is a Wednesday
        assert_eq!(grid[0].date, date(2024, 12, 29));
        assert!(!grid[0].is_current_month);
        assert_eq!(grid[3], DateCell { date: date(2025, 1, 1), is_current_month: true });
    }

    #[test]
    fn test_calendar_view_marks_selectable_and_selected_cells() {
        let service = CalendarService::new();
        let availability = resolve_availability(Some("2024-03-01"), Some("2024-03-03"));
        let selection = SelectionState::new(availability, date(2024, 1, 10));

        let view = CalendarView::build(&service, &selection);

        assert_eq!(view.title, "March 2024");
        assert_eq!(view.weeks().count(), 6);

        let selectable: Vec<_> = view
            .cells
            .iter()
            .filter(|c| c.selectable)
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(selectable, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);

        let selected: Vec<_> = view.cells.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key, "2024-03-01");

        // Feb 29th sits in the leading padding and is outside the range
        let padding = view.cells.iter().find(|c| c.key == "2024-02-29").unwrap();
        assert!(!padding.selectable);
        assert!(!padding.cell.is_current_month);
    }
}
