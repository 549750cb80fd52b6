//! The calendar as one owned value.
//!
//! A host adapter creates a [`CalendarService`] when a game loads, calls
//! [`CalendarService::draw`] from its date-widget callback and forwards game
//! events to the `on_*` hooks.
use log::{debug, info, trace};

use crate::anniversaries::{AnniversaryIndexer, Remembrance};
use crate::birthdays::index_birthdays;
use crate::clock::AbsoluteTick;
use crate::config::CalendarConfig;
use crate::day_index::{DayIndex, Indexed};
use crate::error::CalendarError;
use crate::host::{ColonyHost, Corpse, Pawn, PawnRef};
use crate::panel::{HostUi, Painter, draw_calendar_panel};
use crate::palette::XMarkPalette;
use crate::quest_events::{QuestEntry, index_quest_events};
use crate::render::{FrameView, RenderInputs, TextureLoader, TextureStore, compose_view};
use crate::scheduler::{FrameSnapshot, RefreshPlan, RefreshScheduler};

#[derive(Debug, Clone)]
pub struct CalendarService {
    config: CalendarConfig,
    scheduler: RefreshScheduler,
    palette: XMarkPalette,
    textures: TextureStore,
    birthdays: DayIndex<PawnRef>,
    quests: DayIndex<QuestEntry>,
    anniversaries: DayIndex<Remembrance>,
    anniversary_indexer: AnniversaryIndexer,
    snapshot: Option<FrameSnapshot>,
    skipped: Vec<CalendarError>,
}

impl CalendarService {
    #[must_use]
    pub fn new(config: CalendarConfig, seed: u64) -> Self {
        Self {
            config,
            scheduler: RefreshScheduler::new(),
            palette: XMarkPalette::from_seed(seed),
            textures: TextureStore::new(),
            birthdays: DayIndex::new(),
            quests: DayIndex::new(),
            anniversaries: DayIndex::new(),
            anniversary_indexer: AnniversaryIndexer::new(),
            snapshot: None,
            skipped: Vec::new(),
        }
    }

    /// Per-frame update: capture the clock, load textures on first use and
    /// rebuild whatever the scheduler asks for.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NoActiveMap`] when there is nothing to draw;
    /// no index is touched in that case.
    pub fn frame<H, L>(&mut self, host: &H, loader: &mut L) -> Result<RefreshPlan, CalendarError>
    where
        H: ColonyHost,
        L: TextureLoader + ?Sized,
    {
        let snapshot = FrameSnapshot::capture(host).inspect_err(|_| {
            trace!("no active map; calendar frame skipped");
        })?;
        let pawns_ready = host.active_map().is_some_and(|map| map.pawns_ready);

        self.skipped = self.textures.load_all(&self.config.textures, loader);

        let plan = self.scheduler.observe(&snapshot, pawns_ready);
        if plan.season_changed {
            self.palette.reshuffle(&self.config.x_marks);
            info!("season is now {}; x-marks reshuffled", snapshot.date.season);
        }
        if plan.month_changed {
            info!("quadrum is now {} {}", snapshot.date.quadrum, snapshot.date.year);
        }
        if plan.birthdays {
            self.refresh_birthdays(host, &snapshot);
        }
        if plan.quests {
            self.refresh_quests(host, &snapshot);
        }
        if plan.anniversaries {
            self.refresh_anniversaries(host, &snapshot);
        }

        self.snapshot = Some(snapshot);
        Ok(plan)
    }

    /// Frame update followed by the panel draw. Returns the new base y, or
    /// `base_y` untouched when there is no active map.
    pub fn draw<H, L, P, U>(
        &mut self,
        base_y: f32,
        host: &H,
        loader: &mut L,
        painter: &mut P,
        ui: &mut U,
    ) -> f32
    where
        H: ColonyHost,
        L: TextureLoader + ?Sized,
        P: Painter + ?Sized,
        U: HostUi + ?Sized,
    {
        if self.frame(host, loader).is_err() {
            return base_y;
        }
        match self.view() {
            Some(view) => draw_calendar_panel(base_y, &view, painter, ui),
            None => base_y,
        }
    }

    /// The view for the last successful frame.
    #[must_use]
    pub fn view(&self) -> Option<FrameView> {
        let snapshot = self.snapshot.as_ref()?;
        Some(compose_view(&RenderInputs {
            date: &snapshot.date,
            names: &self.config.textures,
            textures: &self.textures,
            palette: &self.palette,
            birthdays: &self.birthdays,
            quests: &self.quests,
            anniversaries: &self.anniversaries,
        }))
    }

    /// A quest was added to the quest log.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NoActiveMap`] when the quest index cannot be
    /// rebuilt right now; the next day boundary picks the quest up.
    pub fn on_quest_added<H: ColonyHost>(&mut self, host: &H) -> Result<(), CalendarError> {
        let snapshot = FrameSnapshot::capture(host)?;
        if self.shows_day_of(&snapshot) {
            self.refresh_quests(host, &snapshot);
        } else {
            self.refresh_all(host, &snapshot);
        }
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// A pawn finished spawning. Player-faction pawns refresh birthdays and
    /// anniversaries on the next frame.
    pub fn on_pawn_spawned(&mut self, pawn: &Pawn) {
        if pawn.is_player_faction() {
            debug!("colonist '{}' spawned; refresh deferred", pawn.label);
            self.scheduler.defer_colonist_refresh();
        }
    }

    /// A pawn died. Player-faction deaths refresh birthdays and
    /// anniversaries immediately.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NoActiveMap`] when no map is active.
    pub fn on_pawn_killed<H: ColonyHost>(
        &mut self,
        host: &H,
        pawn: &Pawn,
    ) -> Result<(), CalendarError> {
        if !pawn.is_player_faction() {
            return Ok(());
        }
        let snapshot = FrameSnapshot::capture(host)?;
        if self.shows_day_of(&snapshot) {
            self.refresh_birthdays(host, &snapshot);
            self.refresh_anniversaries(host, &snapshot);
        } else {
            self.refresh_all(host, &snapshot);
        }
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Stamp a new corpse with its time of death before anything can read
    /// it.
    pub fn on_corpse_created(&mut self, corpse: &mut Corpse, now: AbsoluteTick) {
        corpse.time_of_death = Some(now);
        trace!("corpse of '{}' stamped at tick {now}", corpse.inner_pawn.label);
    }

    /// The player switched to another map.
    pub fn on_map_activated(&mut self) {
        self.scheduler.arm_map_refresh();
    }

    /// Whether the stored snapshot already describes `snapshot`'s map and
    /// day, so a partial rebuild keeps every index on one date.
    fn shows_day_of(&self, snapshot: &FrameSnapshot) -> bool {
        self.snapshot.as_ref().is_some_and(|shown| {
            shown.map == snapshot.map
                && shown.date.year == snapshot.date.year
                && shown.date.quadrum == snapshot.date.quadrum
                && shown.date.day_of_season == snapshot.date.day_of_season
        })
    }

    fn refresh_all<H: ColonyHost>(&mut self, host: &H, snapshot: &FrameSnapshot) {
        debug!(
            "hook crossed into {} {} of {}; rebuilding every index",
            snapshot.date.display_day(),
            snapshot.date.quadrum,
            snapshot.date.year
        );
        self.refresh_birthdays(host, snapshot);
        self.refresh_quests(host, snapshot);
        self.refresh_anniversaries(host, snapshot);
    }

    fn refresh_birthdays<H: ColonyHost>(&mut self, host: &H, snapshot: &FrameSnapshot) {
        let Indexed { index, skipped } =
            index_birthdays(host.free_colonists(), snapshot.date.quadrum);
        self.birthdays = index;
        self.skipped.extend(skipped);
    }

    fn refresh_quests<H: ColonyHost>(&mut self, host: &H, snapshot: &FrameSnapshot) {
        let Indexed { index, skipped } = index_quest_events(host.quests(), host.dates(), snapshot);
        self.quests = index;
        self.skipped.extend(skipped);
    }

    fn refresh_anniversaries<H: ColonyHost>(&mut self, host: &H, snapshot: &FrameSnapshot) {
        let Indexed { index, skipped } = self.anniversary_indexer.index(host, snapshot);
        self.anniversaries = index;
        self.skipped.extend(skipped);
    }

    #[must_use]
    pub const fn config(&self) -> &CalendarConfig {
        &self.config
    }

    #[must_use]
    pub const fn birthdays(&self) -> &DayIndex<PawnRef> {
        &self.birthdays
    }

    #[must_use]
    pub const fn quest_events(&self) -> &DayIndex<QuestEntry> {
        &self.quests
    }

    #[must_use]
    pub const fn anniversaries(&self) -> &DayIndex<Remembrance> {
        &self.anniversaries
    }

    #[must_use]
    pub const fn palette(&self) -> &XMarkPalette {
        &self.palette
    }

    #[must_use]
    pub const fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<&FrameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Entries skipped since the start of the last frame.
    #[must_use]
    pub fn skipped(&self) -> &[CalendarError] {
        &self.skipped
    }
}
