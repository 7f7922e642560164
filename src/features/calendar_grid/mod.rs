//! # Calendar Grid Feature
//!
//! Month and time-slot grids rendered as button matrices.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Month navigation header
//! - 1.0.0: Initial creation with the month grid

pub mod renderer;

pub use renderer::{month_grid, time_grid, Cell, MonthRef, SLOT_COLUMNS, WEEKDAY_LABELS};
