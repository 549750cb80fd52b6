//! Centralized time and layout constants for the calendar overlay.
//!
//! Tick arithmetic mirrors the host's date primitives; the panel geometry
//! is the fixed contract the overlay adapter draws against.

use crate::clock::AbsoluteTick;

// Time ----------------------------------------------------------------------
pub const TICKS_PER_HOUR: AbsoluteTick = 2_500;
pub const HOURS_PER_DAY: AbsoluteTick = 24;
pub const TICKS_PER_DAY: AbsoluteTick = HOURS_PER_DAY * TICKS_PER_HOUR;
pub const DAYS_PER_QUADRUM: i32 = 15;
pub const QUADRUMS_PER_YEAR: i32 = 4;
pub const DAYS_PER_YEAR: i32 = DAYS_PER_QUADRUM * QUADRUMS_PER_YEAR;
pub const TICKS_PER_QUADRUM: AbsoluteTick = TICKS_PER_DAY * DAYS_PER_QUADRUM as AbsoluteTick;
pub const TICKS_PER_YEAR: AbsoluteTick = TICKS_PER_QUADRUM * QUADRUMS_PER_YEAR as AbsoluteTick;
pub const MINUTES_PER_HOUR: AbsoluteTick = 60;
/// First in-world year shown at tick zero.
pub const YEAR_EPOCH: i32 = 5500;
/// Degrees of longitude per local hour.
pub const DEGREES_PER_TIME_ZONE: f32 = 15.0;

// Palette -------------------------------------------------------------------
/// Past-day markers drawn per season; day fifteen is never "past".
pub const X_MARKS_PER_SEASON: usize = 14;

// Panel layout --------------------------------------------------------------
pub const PANEL_SIZE: f32 = 125.0;
pub const PANEL_RIGHT_INSET: f32 = 130.0;
pub const PANEL_LEAD_FACTOR: f32 = 1.1;
pub const PANEL_TRAIL_FACTOR: f32 = 0.40;
pub const SLOT_SIZE: f32 = 20.0;

/// Top-left offset of each day slot (day 1 first) relative to the panel origin.
pub const SLOT_POSITIONS: [(f32, f32); DAYS_PER_QUADRUM as usize] = [
    (3.0, 53.0),
    (28.0, 53.0),
    (53.0, 53.0),
    (78.0, 53.0),
    (103.0, 53.0),
    (3.0, 77.0),
    (28.0, 77.0),
    (53.0, 77.0),
    (78.0, 77.0),
    (103.0, 77.0),
    (3.0, 101.0),
    (28.0, 101.0),
    (53.0, 101.0),
    (78.0, 101.0),
    (103.0, 101.0),
];

// Text placement relative to the panel origin: (dx, dy, width, height).
pub(crate) const YEAR_LABEL: (f32, f32, f32, f32) = (-5.0, 0.0, PANEL_SIZE, 25.0);
pub(crate) const MONTH_LABEL: (f32, f32, f32, f32) = (0.0, 20.0, PANEL_SIZE, 30.0);
pub(crate) const SEASON_LABEL: (f32, f32, f32, f32) = (0.0, -30.0, PANEL_SIZE, 30.0);
pub(crate) const HOUR_LABEL: (f32, f32, f32, f32) = (0.0, -55.0, PANEL_SIZE, 30.0);

// Text ----------------------------------------------------------------------
pub(crate) const BIRTHDAY_TOOLTIP_PREFIX: &str = "🎂 Birthday: ";
pub(crate) const ANNIVERSARY_TOOLTIP_PREFIX: &str = "🪦 Death Anniversary: ";
