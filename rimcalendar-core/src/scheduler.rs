//! Refresh cadence: decides, once per frame, which indices need rebuilding.
//!
//! Boundaries are detected by comparing the frame's date against the last
//! observed one. Event hooks arm one-shot refreshes that are folded into
//! the next plan.
use serde::Serialize;

use crate::clock::{AbsoluteTick, DateFields, Quadrum, Season, WorldLocation, date_fields};
use crate::error::CalendarError;
use crate::host::{ColonyHost, MapId, TileId};

/// Tick, location and date captured once at the top of a frame. Every
/// indexer run during that frame reads this instead of the live host clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub now: AbsoluteTick,
    pub map: MapId,
    pub tile: TileId,
    pub location: WorldLocation,
    pub date: DateFields,
}

impl FrameSnapshot {
    /// Capture the host's clock at the active map.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NoActiveMap`] when no map is being viewed.
    pub fn capture<H: ColonyHost>(host: &H) -> Result<Self, CalendarError> {
        let map = host.active_map().ok_or(CalendarError::NoActiveMap)?;
        let now = host.ticks_abs();
        let location = host.location_of(map.tile);
        Ok(Self {
            now,
            map: map.id,
            tile: map.tile,
            location,
            date: date_fields(host.dates(), now, location),
        })
    }
}

/// Last boundary values seen by the scheduler. `None` means never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LastObserved {
    pub season: Option<Season>,
    pub month: Option<Quadrum>,
    pub year: Option<i32>,
    /// Zero-based day of the season last indexed.
    pub day: Option<u8>,
    pub map: Option<MapId>,
}

/// Work requested for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RefreshPlan {
    /// Reshuffle the x-mark palette and swap the backdrop.
    pub season_changed: bool,
    /// Refresh the backdrop.
    pub month_changed: bool,
    pub birthdays: bool,
    pub quests: bool,
    pub anniversaries: bool,
}

impl RefreshPlan {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.season_changed
            || self.month_changed
            || self.birthdays
            || self.quests
            || self.anniversaries)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RefreshScheduler {
    last: LastObserved,
    colonists_pending: bool,
    map_anniversaries_pending: bool,
}

impl RefreshScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare this frame against the last one and record the new state.
    ///
    /// `pawns_ready` gates the one-shot anniversary refresh after a map
    /// switch until the map's pawn list exists.
    pub fn observe(&mut self, snapshot: &FrameSnapshot, pawns_ready: bool) -> RefreshPlan {
        let date = &snapshot.date;
        let mut plan = RefreshPlan::default();

        if self.last.map != Some(snapshot.map) {
            self.last.map = Some(snapshot.map);
            self.map_anniversaries_pending = true;
        }

        if self.last.season != Some(date.season) {
            self.last.season = Some(date.season);
            plan.season_changed = true;
        }

        let new_month = self.last.month != Some(date.quadrum);
        if new_month {
            self.last.month = Some(date.quadrum);
            plan.month_changed = true;
        }

        let new_year = self.last.year != Some(date.year);
        if new_month || new_year || self.last.day != Some(date.day_of_season) {
            self.last.year = Some(date.year);
            self.last.day = Some(date.day_of_season);
            plan.birthdays = true;
            plan.quests = true;
            plan.anniversaries = true;
        }

        if std::mem::take(&mut self.colonists_pending) {
            plan.birthdays = true;
            plan.anniversaries = true;
        }

        if self.map_anniversaries_pending && pawns_ready {
            self.map_anniversaries_pending = false;
            plan.anniversaries = true;
        }

        plan
    }

    /// Rebuild birthdays and anniversaries on the next frame, once the
    /// spawning pawn has finished initializing.
    pub fn defer_colonist_refresh(&mut self) {
        self.colonists_pending = true;
    }

    /// Rebuild anniversaries once the newly active map has pawns.
    pub fn arm_map_refresh(&mut self) {
        self.map_anniversaries_pending = true;
    }

    #[must_use]
    pub const fn last_observed(&self) -> &LastObserved {
        &self.last
    }

    #[must_use]
    pub const fn has_pending_work(&self) -> bool {
        self.colonists_pending || self.map_anniversaries_pending
    }
}
