//! Longitude-adjusted date arithmetic.
//!
//! Everything here is a pure function of the absolute tick counter and a
//! world location. Year, quadrum, day and season come from a
//! [`DatePrimitives`] implementation (the host's, or [`StandardCalendar`]);
//! the displayed hour is derived locally from the raw hour and the map's
//! time zone.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LatitudeBands;
use crate::constants::{
    DAYS_PER_QUADRUM, DAYS_PER_YEAR, DEGREES_PER_TIME_ZONE, HOURS_PER_DAY, MINUTES_PER_HOUR,
    TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_YEAR, YEAR_EPOCH,
};
use crate::numbers::{narrow_i64_to_i32, narrow_to_u8, round_ties_even_to_i32};

/// Simulation ticks since the host's epoch.
pub type AbsoluteTick = i64;

/// The in-world month. Four per year, fifteen days each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrum {
    Aprimay,
    Jugust,
    Septober,
    Decembary,
}

impl Quadrum {
    pub const ALL: [Self; 4] = [Self::Aprimay, Self::Jugust, Self::Septober, Self::Decembary];

    /// Zero-based position within the year.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Aprimay => 0,
            Self::Jugust => 1,
            Self::Septober => 2,
            Self::Decembary => 3,
        }
    }

    /// Quadrum for a zero-based index, wrapping outside `0..4`.
    #[must_use]
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Quadrum containing a zero-based day of the year.
    #[must_use]
    pub const fn from_day_of_year(day_of_year: i64) -> Self {
        Self::from_index(day_of_year.div_euclid(DAYS_PER_QUADRUM as i64))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aprimay => "Aprimay",
            Self::Jugust => "Jugust",
            Self::Septober => "Septober",
            Self::Decembary => "Decembary",
        }
    }
}

impl fmt::Display for Quadrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Season as reported by the host for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    PermanentSummer,
    PermanentWinter,
}

impl Season {
    /// Collapse the permanent biome seasons onto the four displayed ones.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::PermanentSummer => Self::Summer,
            Self::PermanentWinter => Self::Winter,
            other => other,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        season_label(self)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Geographic coordinates of a world tile, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldLocation {
    pub longitude: f32,
    pub latitude: f32,
}

impl WorldLocation {
    #[must_use]
    pub const fn new(longitude: f32, latitude: f32) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Date fields derived for one tick at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFields {
    pub year: i32,
    pub quadrum: Quadrum,
    /// Zero-based day within the quadrum (`0..15`).
    pub day_of_season: u8,
    pub hour: u8,
    pub minute: u8,
    /// Already normalized; never a permanent variant.
    pub season: Season,
}

impl DateFields {
    /// One-based day shown on the calendar grid.
    #[must_use]
    pub const fn display_day(&self) -> u8 {
        self.day_of_season.saturating_add(1)
    }
}

/// The host's date primitives. Every method takes the longitude directly
/// so that different world tiles observe consistent local dates.
pub trait DatePrimitives {
    fn year(&self, tick: AbsoluteTick, longitude: f32) -> i32;
    fn quadrum(&self, tick: AbsoluteTick, longitude: f32) -> Quadrum;
    /// Zero-based day within the quadrum.
    fn day_of_season(&self, tick: AbsoluteTick, longitude: f32) -> u8;
    fn season(&self, tick: AbsoluteTick, location: WorldLocation) -> Season;
    fn hour_of_day(&self, tick: AbsoluteTick, longitude: f32) -> u8;
}

/// Whole-hour time zone for a longitude (ties to even).
#[must_use]
pub fn time_zone(longitude: f32) -> i32 {
    round_ties_even_to_i32(longitude / DEGREES_PER_TIME_ZONE)
}

/// Reference date primitives using the conventional colony-sim calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardCalendar {
    bands: LatitudeBands,
}

impl Default for StandardCalendar {
    fn default() -> Self {
        Self::new(LatitudeBands::default())
    }
}

impl StandardCalendar {
    #[must_use]
    pub const fn new(bands: LatitudeBands) -> Self {
        Self { bands }
    }

    fn local_ticks(tick: AbsoluteTick, longitude: f32) -> AbsoluteTick {
        tick.saturating_add(i64::from(time_zone(longitude)) * TICKS_PER_HOUR)
    }

    fn day_of_year(tick: AbsoluteTick, longitude: f32) -> i64 {
        Self::local_ticks(tick, longitude)
            .div_euclid(TICKS_PER_DAY)
            .rem_euclid(i64::from(DAYS_PER_YEAR))
    }
}

impl DatePrimitives for StandardCalendar {
    fn year(&self, tick: AbsoluteTick, longitude: f32) -> i32 {
        let elapsed = Self::local_ticks(tick, longitude).div_euclid(TICKS_PER_YEAR);
        YEAR_EPOCH.saturating_add(narrow_i64_to_i32(elapsed))
    }

    fn quadrum(&self, tick: AbsoluteTick, longitude: f32) -> Quadrum {
        Quadrum::from_day_of_year(Self::day_of_year(tick, longitude))
    }

    fn day_of_season(&self, tick: AbsoluteTick, longitude: f32) -> u8 {
        narrow_to_u8(Self::day_of_year(tick, longitude).rem_euclid(i64::from(DAYS_PER_QUADRUM)))
    }

    fn season(&self, tick: AbsoluteTick, location: WorldLocation) -> Season {
        let latitude = location.latitude.abs();
        if latitude < self.bands.tropical {
            return Season::PermanentSummer;
        }
        if latitude > self.bands.polar {
            return Season::PermanentWinter;
        }
        let mut index = i64::from(self.quadrum(tick, location.longitude).index());
        if location.latitude < 0.0 {
            index += 2;
        }
        match index.rem_euclid(4) {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Fall,
            _ => Season::Winter,
        }
    }

    fn hour_of_day(&self, tick: AbsoluteTick, longitude: f32) -> u8 {
        narrow_to_u8(
            Self::local_ticks(tick, longitude)
                .div_euclid(TICKS_PER_HOUR)
                .rem_euclid(HOURS_PER_DAY),
        )
    }
}

/// Minute within the hour for an absolute tick, independent of longitude.
#[must_use]
pub fn raw_minute(tick: AbsoluteTick) -> u8 {
    narrow_to_u8(tick.rem_euclid(TICKS_PER_HOUR) * MINUTES_PER_HOUR / TICKS_PER_HOUR)
}

/// Shift a longitude-free hour into the local time zone, wrapping into `0..24`.
#[must_use]
pub fn local_hour(raw_hour: u8, longitude: f32) -> u8 {
    let shifted = i64::from(raw_hour) + i64::from(time_zone(longitude));
    narrow_to_u8(shifted.rem_euclid(HOURS_PER_DAY))
}

/// Derive every displayed date field for a tick at a location.
pub fn date_fields<D: DatePrimitives + ?Sized>(
    dates: &D,
    tick: AbsoluteTick,
    location: WorldLocation,
) -> DateFields {
    let longitude = location.longitude;
    DateFields {
        year: dates.year(tick, longitude),
        quadrum: dates.quadrum(tick, longitude),
        day_of_season: dates.day_of_season(tick, longitude),
        hour: local_hour(dates.hour_of_day(tick, 0.0), longitude),
        minute: raw_minute(tick),
        season: dates.season(tick, location).normalized(),
    }
}

/// Display label for a season; permanent biomes read as their steady state.
#[must_use]
pub const fn season_label(season: Season) -> &'static str {
    match season.normalized() {
        Season::Spring => "Spring",
        Season::Summer | Season::PermanentSummer => "Summer",
        Season::Fall => "Fall",
        Season::Winter | Season::PermanentWinter => "Winter",
    }
}

/// Twelve-hour clock text, e.g. `"2:05 PM"`.
#[must_use]
pub fn format_hour12(hour: u8, minute: u8) -> String {
    let hour12 = ((hour % 24) + 11) % 12 + 1;
    let period = if hour >= 12 { "PM" } else { "AM" };
    format!("{hour12}:{minute:02} {period}")
}

/// English ordinal for a day number (`1st`, `12th`, `22nd`).
#[must_use]
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_at(hour: i64, minute: i64) -> AbsoluteTick {
        hour * TICKS_PER_HOUR + minute * TICKS_PER_HOUR / 60
    }

    #[test]
    fn hour_text_at_prime_meridian() {
        let cal = StandardCalendar::default();
        let fields = date_fields(&cal, tick_at(14, 30), WorldLocation::new(0.0, 40.0));
        assert_eq!((fields.hour, fields.minute), (14, 30));
        assert_eq!(format_hour12(fields.hour, fields.minute), "2:30 PM");
    }

    #[test]
    fn hour_text_shifts_east() {
        let cal = StandardCalendar::default();
        let fields = date_fields(&cal, tick_at(14, 30), WorldLocation::new(45.0, 40.0));
        assert_eq!(fields.hour, 17);
        assert_eq!(format_hour12(fields.hour, fields.minute), "5:30 PM");
    }

    #[test]
    fn hour_text_wraps_west() {
        let cal = StandardCalendar::default();
        let fields = date_fields(&cal, tick_at(1, 30), WorldLocation::new(-45.0, 40.0));
        assert_eq!(fields.hour, 22);
        assert_eq!(format_hour12(fields.hour, fields.minute), "10:30 PM");
    }

    #[test]
    fn local_hour_stays_in_range_for_all_longitudes() {
        for raw in 0..24u8 {
            for degrees in -180..=180 {
                #[allow(clippy::cast_precision_loss)]
                let hour = local_hour(raw, degrees as f32);
                assert!(hour < 24, "raw {raw} lon {degrees} -> {hour}");
            }
        }
    }

    #[test]
    fn half_zone_longitudes_round_to_even() {
        assert_eq!(time_zone(7.5), 0);
        assert_eq!(time_zone(22.5), 2);
        assert_eq!(time_zone(-22.5), -2);
        assert_eq!(time_zone(180.0), 12);
    }

    #[test]
    fn midnight_and_noon_format() {
        assert_eq!(format_hour12(0, 0), "12:00 AM");
        assert_eq!(format_hour12(12, 5), "12:05 PM");
        assert_eq!(format_hour12(23, 59), "11:59 PM");
        assert_eq!(format_hour12(9, 7), "9:07 AM");
    }

    #[test]
    fn ordinals_follow_english_rules() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (111, "111th"),
        ];
        for (day, expected) in cases {
            assert_eq!(ordinal(day), expected);
        }
    }

    #[test]
    fn quadrum_and_day_follow_local_ticks() {
        let cal = StandardCalendar::default();
        let tick = 17 * TICKS_PER_DAY + 3 * TICKS_PER_HOUR;
        assert_eq!(cal.quadrum(tick, 0.0), Quadrum::Jugust);
        assert_eq!(cal.day_of_season(tick, 0.0), 2);
        // Four hours west pushes the local clock back into the previous day.
        assert_eq!(cal.day_of_season(tick, -60.0), 1);
        assert_eq!(cal.year(tick, 0.0), YEAR_EPOCH);
        assert_eq!(cal.year(tick + TICKS_PER_YEAR, 0.0), YEAR_EPOCH + 1);
    }

    #[test]
    fn negative_local_ticks_wrap_into_previous_year() {
        let cal = StandardCalendar::default();
        assert_eq!(cal.year(0, -90.0), YEAR_EPOCH - 1);
        assert_eq!(cal.quadrum(0, -90.0), Quadrum::Decembary);
        assert_eq!(cal.day_of_season(0, -90.0), 14);
        assert_eq!(cal.hour_of_day(0, -90.0), 18);
    }

    #[test]
    fn seasons_respect_hemisphere_and_bands() {
        let cal = StandardCalendar::default();
        let jugust = 20 * TICKS_PER_DAY;
        assert_eq!(cal.season(jugust, WorldLocation::new(0.0, 45.0)), Season::Summer);
        assert_eq!(cal.season(jugust, WorldLocation::new(0.0, -45.0)), Season::Winter);
        assert_eq!(
            cal.season(jugust, WorldLocation::new(0.0, 2.0)),
            Season::PermanentSummer
        );
        assert_eq!(
            cal.season(jugust, WorldLocation::new(0.0, -85.0)),
            Season::PermanentWinter
        );
    }

    #[test]
    fn date_fields_normalize_permanent_seasons() {
        let cal = StandardCalendar::default();
        let tropical = date_fields(&cal, 0, WorldLocation::new(0.0, 0.0));
        assert_eq!(tropical.season, Season::Summer);
        let polar = date_fields(&cal, 0, WorldLocation::new(0.0, 89.0));
        assert_eq!(polar.season, Season::Winter);
        assert_eq!(season_label(Season::PermanentWinter), "Winter");
        assert_eq!(Season::PermanentSummer.to_string(), "Summer");
    }

    #[test]
    fn quadrum_index_roundtrips_and_wraps() {
        for quadrum in Quadrum::ALL {
            assert_eq!(Quadrum::from_index(i64::from(quadrum.index())), quadrum);
        }
        assert_eq!(Quadrum::from_index(-1), Quadrum::Decembary);
        assert_eq!(Quadrum::from_day_of_year(17), Quadrum::Jugust);
        assert_eq!(Quadrum::Septober.to_string(), "Septober");
    }

    #[test]
    fn display_day_saturates() {
        let cal = StandardCalendar::default();
        let mut date = date_fields(&cal, 0, WorldLocation::new(0.0, 45.0));
        assert_eq!(date.display_day(), 1);
        date.day_of_season = u8::MAX;
        assert_eq!(date.display_day(), u8::MAX);
    }
}
