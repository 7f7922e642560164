//! # Grid Renderer
//!
//! Pure construction of the month and time-slot button grids.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Navigation header row, half-hour time grid
//! - 1.0.0: Initial creation
//!
//! Rendering owns no state. Month position and selected date travel inside
//! each cell's [`Action`] payload, so a tap is meaningful even when it
//! arrives long after the grid was drawn.

use chrono::{Datelike, NaiveDate, Utc};

use crate::transport::Action;

/// Weekday header labels, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Slots per row on the time grid.
pub const SLOT_COLUMNS: usize = 4;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, independent of any particular day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRef {
    pub year: i32,
    /// 1-based, January = 1.
    pub month: u32,
}

impl MonthRef {
    /// The month containing the current UTC instant.
    pub fn current() -> Self {
        let now = Utc::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// The month before this one, rolling over year boundaries.
    pub fn prev(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one, rolling over year boundaries.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Header label, e.g. "June 2024".
    pub fn label(self) -> String {
        let name = self
            .month
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i as usize))
            .copied()
            .unwrap_or("?");
        format!("{name} {}", self.year)
    }

    /// Number of days in this month.
    pub fn days(self) -> u32 {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(0)
    }
}

/// One button cell of a rendered grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub label: String,
    pub action: Action,
}

impl Cell {
    fn noop(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: Action::Noop,
        }
    }
}

/// Render the month grid: a navigation header, a weekday header, and one row
/// per calendar week with seven cells each.
///
/// Cells outside the month are blank no-ops, so every tap on a day cell
/// carries a full year/month/day payload.
pub fn month_grid(month: MonthRef) -> Vec<Vec<Cell>> {
    let mut rows = vec![
        vec![
            Cell {
                label: "‹".to_string(),
                action: Action::PrevMonth {
                    year: month.year,
                    month: month.month,
                },
            },
            Cell::noop(month.label()),
            Cell {
                label: "›".to_string(),
                action: Action::NextMonth {
                    year: month.year,
                    month: month.month,
                },
            },
        ],
        WEEKDAY_LABELS.iter().map(|day| Cell::noop(*day)).collect(),
    ];

    let Some(first) = NaiveDate::from_ymd_opt(month.year, month.month, 1) else {
        return rows;
    };

    let lead = first.weekday().num_days_from_monday();
    let mut week: Vec<Cell> = (0..lead).map(|_| Cell::noop(" ")).collect();
    for day in 1..=month.days() {
        week.push(Cell {
            label: day.to_string(),
            action: Action::SelectDate {
                year: month.year,
                month: month.month,
                day,
            },
        });
        if week.len() == WEEKDAY_LABELS.len() {
            rows.push(week);
            week = Vec::new();
        }
    }
    if !week.is_empty() {
        while week.len() < WEEKDAY_LABELS.len() {
            week.push(Cell::noop(" "));
        }
        rows.push(week);
    }

    rows
}

/// Render the time grid for a chosen date: all 48 half-hour slots of the day,
/// four per row.
pub fn time_grid(date: NaiveDate) -> Vec<Vec<Cell>> {
    let mut rows = Vec::new();
    let mut row = Vec::with_capacity(SLOT_COLUMNS);
    for slot in 0..48u32 {
        let hour = slot / 2;
        let minute = (slot % 2) * 30;
        row.push(Cell {
            label: format!("{hour:02}:{minute:02}"),
            action: Action::SelectSlot { date, hour, minute },
        });
        if row.len() == SLOT_COLUMNS {
            rows.push(row);
            row = Vec::with_capacity(SLOT_COLUMNS);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_cells(rows: &[Vec<Cell>]) -> Vec<&Cell> {
        rows.iter()
            .skip(2)
            .flatten()
            .filter(|cell| cell.action != Action::Noop)
            .collect()
    }

    #[test]
    fn test_month_rollover() {
        let jan = MonthRef {
            year: 2024,
            month: 1,
        };
        assert_eq!(
            jan.prev(),
            MonthRef {
                year: 2023,
                month: 12
            }
        );
        let dec = MonthRef {
            year: 2024,
            month: 12,
        };
        assert_eq!(
            dec.next(),
            MonthRef {
                year: 2025,
                month: 1
            }
        );
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(
            MonthRef {
                year: 2024,
                month: 2
            }
            .days(),
            29
        );
        assert_eq!(
            MonthRef {
                year: 2025,
                month: 2
            }
            .days(),
            28
        );
        assert_eq!(
            MonthRef {
                year: 2024,
                month: 6
            }
            .days(),
            30
        );
        assert_eq!(
            MonthRef {
                year: 2024,
                month: 12
            }
            .days(),
            31
        );
    }

    #[test]
    fn test_month_grid_shape() {
        // June 2024 starts on a Saturday: five leading blanks.
        let rows = month_grid(MonthRef {
            year: 2024,
            month: 6,
        });

        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][1].label, "June 2024");
        assert_eq!(rows[0][1].action, Action::Noop);
        assert_eq!(
            rows[1].iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
            WEEKDAY_LABELS
        );

        for week in &rows[2..] {
            assert_eq!(week.len(), 7);
        }
        for blank in rows[2].iter().take(5) {
            assert_eq!(blank.action, Action::Noop);
        }
        assert_eq!(
            rows[2][5].action,
            Action::SelectDate {
                year: 2024,
                month: 6,
                day: 1
            }
        );
    }

    #[test]
    fn test_month_grid_every_day_tappable() {
        for (year, month) in [(2024, 2), (2024, 6), (2025, 2), (2025, 12)] {
            let month_ref = MonthRef { year, month };
            let rows = month_grid(month_ref);
            let days = day_cells(&rows);
            assert_eq!(days.len() as u32, month_ref.days());
            for (i, cell) in days.iter().enumerate() {
                let day = i as u32 + 1;
                assert_eq!(cell.label, day.to_string());
                assert_eq!(cell.action, Action::SelectDate { year, month, day });
            }
        }
    }

    #[test]
    fn test_month_grid_navigation_carries_displayed_month() {
        let rows = month_grid(MonthRef {
            year: 2025,
            month: 1,
        });
        assert_eq!(
            rows[0][0].action,
            Action::PrevMonth {
                year: 2025,
                month: 1
            }
        );
        assert_eq!(
            rows[0][2].action,
            Action::NextMonth {
                year: 2025,
                month: 1
            }
        );
    }

    #[test]
    fn test_time_grid_covers_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let rows = time_grid(date);
        assert_eq!(rows.len(), 48 / SLOT_COLUMNS);
        for row in &rows {
            assert_eq!(row.len(), SLOT_COLUMNS);
        }
        assert_eq!(rows[0][0].label, "00:00");
        assert_eq!(rows[0][1].label, "00:30");
        assert_eq!(rows[11][3].label, "23:30");
        assert_eq!(
            rows[11][3].action,
            Action::SelectSlot {
                date,
                hour: 23,
                minute: 30
            }
        );
    }
}
