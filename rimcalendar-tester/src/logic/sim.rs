//! Simulated colony used by the scenario catalog.
//!
//! `SimColony` stands in for the game: it owns the clock, one active map and
//! the colonist and quest lists, and forwards the same events a real adapter
//! would to a [`CalendarService`].
use std::collections::HashMap;

use anyhow::{Context, Result};
use rimcalendar_core::{
    AbsoluteTick, Anchor, CalendarConfig, CalendarService, ColonyHost, ColonyMap, Corpse, Grave, HostUi, MapId,
    MenuOption, MessageKind, Painter, Pawn, PawnId, Position, Quest, QuestId, QuestPart, Rect,
    StandardCalendar, TextureHandle, TextureLoader, ThingId, TileId, WorldLocation,
};

pub const HOME_TILE: TileId = 0;
pub const HOME_MAP: MapId = MapId(1);

pub struct SimColony {
    pub now: AbsoluteTick,
    pub map: Option<ColonyMap>,
    pub tiles: HashMap<TileId, WorldLocation>,
    pub colonists: Vec<Pawn>,
    pub quests: Vec<Quest>,
    calendar: StandardCalendar,
    next_thing: u64,
}

impl SimColony {
    #[must_use]
    pub fn new(location: WorldLocation, calendar: StandardCalendar) -> Self {
        Self {
            now: 0,
            map: Some(ColonyMap::new(HOME_MAP, HOME_TILE)),
            tiles: HashMap::from([(HOME_TILE, location)]),
            colonists: Vec::new(),
            quests: Vec::new(),
            calendar,
            next_thing: 1_000,
        }
    }

    /// A colony whose seasons follow `config`'s latitude bands.
    #[must_use]
    pub fn at(longitude: f32, latitude: f32, config: &CalendarConfig) -> Self {
        Self::new(
            WorldLocation::new(longitude, latitude),
            config.reference_calendar(),
        )
    }

    /// Move the clock forward; quest timers count down with it.
    pub fn advance(&mut self, ticks: AbsoluteTick) {
        self.now += ticks;
        for quest in &mut self.quests {
            quest.ticks_until_acceptance_expiry -= ticks;
            for part in &mut quest.parts {
                if let QuestPart::Delay { ticks_left } = part {
                    *ticks_left = (*ticks_left - ticks).max(0);
                }
            }
        }
    }

    fn map_mut(&mut self) -> Result<&mut ColonyMap> {
        self.map.as_mut().context("simulated colony has no active map")
    }

    const fn next_thing_id(&mut self) -> ThingId {
        self.next_thing += 1;
        ThingId(self.next_thing)
    }

    /// Add a colonist and tell the calendar it spawned.
    pub fn add_colonist(&mut self, pawn: Pawn, calendar: &mut CalendarService) {
        calendar.on_pawn_spawned(&pawn);
        self.colonists.push(pawn);
    }

    /// Post a quest and let the calendar pick it up at once.
    ///
    /// # Errors
    ///
    /// Fails when the colony has no active map.
    pub fn add_quest(&mut self, quest: Quest, calendar: &mut CalendarService) -> Result<QuestId> {
        let id = quest.id;
        self.quests.push(quest);
        calendar
            .on_quest_added(self)
            .context("quest added without an active map")?;
        Ok(id)
    }

    /// Kill a colonist where they stand. The corpse is stamped by the
    /// calendar before it lands on the map.
    ///
    /// # Errors
    ///
    /// Fails when the pawn is not a living colonist or there is no map.
    pub fn kill_colonist(
        &mut self,
        pawn: PawnId,
        position: Position,
        calendar: &mut CalendarService,
    ) -> Result<ThingId> {
        let slot = self
            .colonists
            .iter()
            .position(|candidate| candidate.id == pawn)
            .with_context(|| format!("no living colonist {pawn:?}"))?;
        let victim = self.colonists.remove(slot);
        let id = self.next_thing_id();
        let tile = self.map.as_ref().map_or(HOME_TILE, |map| map.tile);
        let mut corpse = Corpse::new(id, victim.clone(), tile, position);
        calendar.on_corpse_created(&mut corpse, self.now);
        self.map_mut()?.corpses.push(corpse);
        calendar
            .on_pawn_killed(self, &victim)
            .context("pawn killed without an active map")?;
        Ok(id)
    }

    /// Move a loose corpse into a new grave.
    ///
    /// # Errors
    ///
    /// Fails when the corpse is not lying on the active map.
    pub fn bury(&mut self, corpse: ThingId, position: Position) -> Result<ThingId> {
        let grave_id = self.next_thing_id();
        let map = self.map_mut()?;
        let slot = map
            .corpses
            .iter()
            .position(|candidate| candidate.id == corpse)
            .with_context(|| format!("no loose corpse {corpse:?}"))?;
        let mut body = map.corpses.remove(slot);
        body.spawned = false;
        map.graves.push(Grave {
            id: grave_id,
            position,
            corpse: Some(body),
        });
        Ok(grave_id)
    }
}

impl ColonyHost for SimColony {
    type Dates = StandardCalendar;

    fn dates(&self) -> &StandardCalendar {
        &self.calendar
    }

    fn ticks_abs(&self) -> AbsoluteTick {
        self.now
    }

    fn active_map(&self) -> Option<&ColonyMap> {
        self.map.as_ref()
    }

    fn location_of(&self, tile: TileId) -> WorldLocation {
        self.tiles
            .get(&tile)
            .or_else(|| self.tiles.get(&HOME_TILE))
            .copied()
            .unwrap_or_default()
    }

    fn free_colonists(&self) -> &[Pawn] {
        &self.colonists
    }

    fn quests(&self) -> &[Quest] {
        &self.quests
    }
}

/// Every asset resolves; handles are assigned in load order.
#[derive(Debug, Default)]
pub struct SimTextures {
    loaded: Vec<String>,
}

impl SimTextures {
    #[must_use]
    pub fn handle_of(&self, asset: &str) -> Option<TextureHandle> {
        self.loaded
            .iter()
            .position(|name| name == asset)
            .and_then(|idx| u32::try_from(idx).ok())
            .map(TextureHandle)
    }
}

impl TextureLoader for SimTextures {
    fn load(&mut self, asset: &str) -> Option<TextureHandle> {
        self.loaded.push(asset.to_string());
        self.handle_of(asset)
    }
}

/// Records every draw call; clicks land on `click` when set.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub screen_width: f32,
    pub textures: Vec<(Rect, TextureHandle)>,
    pub labels: Vec<(Rect, String, Anchor)>,
    pub tooltips: Vec<(Rect, String)>,
    pub click: Option<Rect>,
}

impl RecordingPainter {
    #[must_use]
    pub fn with_width(screen_width: f32) -> Self {
        Self {
            screen_width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label_rect(&self, text: &str) -> Option<Rect> {
        self.labels
            .iter()
            .find(|(_, label, _)| label == text)
            .map(|(rect, _, _)| *rect)
    }
}

impl Painter for RecordingPainter {
    fn screen_width(&self) -> f32 {
        self.screen_width
    }

    fn draw_texture(&mut self, rect: Rect, texture: TextureHandle) {
        self.textures.push((rect, texture));
    }

    fn label(&mut self, rect: Rect, text: &str, anchor: Anchor) {
        self.labels.push((rect, text.to_string(), anchor));
    }

    fn tooltip(&mut self, rect: Rect, text: &str) {
        self.tooltips.push((rect, text.to_string()));
    }

    fn button_invisible(&mut self, rect: Rect) -> bool {
        self.click == Some(rect)
    }
}

/// Host actions the panel asked for. Pawn selection always fails, as it does
/// for a dead pawn.
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub jumps: Vec<Position>,
    pub opened: Vec<QuestId>,
    pub menus: Vec<Vec<String>>,
    pub messages: Vec<(String, MessageKind)>,
}

impl HostUi for RecordingUi {
    fn select_pawn(&mut self, _pawn: PawnId) -> bool {
        false
    }

    fn jump_to(&mut self, position: Position) {
        self.jumps.push(position);
    }

    fn open_quest(&mut self, quest: QuestId) {
        self.opened.push(quest);
    }

    fn show_menu(&mut self, options: &[MenuOption]) {
        self.menus
            .push(options.iter().map(|option| option.label.clone()).collect());
    }

    fn message(&mut self, text: &str, kind: MessageKind) {
        self.messages.push((text.to_string(), kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimcalendar_core::LatitudeBands;

    fn calendar() -> CalendarService {
        CalendarService::new(CalendarConfig::default_config(), 7)
    }

    fn colony() -> SimColony {
        SimColony::at(0.0, 40.0, &CalendarConfig::default_config())
    }

    #[test]
    fn killing_a_colonist_leaves_a_stamped_corpse() {
        let mut colony = colony();
        let mut calendar = calendar();
        colony.add_colonist(Pawn::colonist(1, "Ada", 3), &mut calendar);
        colony.now = 500;
        let corpse = colony
            .kill_colonist(PawnId(1), Position::new(4, 4), &mut calendar)
            .unwrap();

        assert!(colony.colonists.is_empty());
        let map = colony.map.as_ref().unwrap();
        assert_eq!(map.corpses[0].id, corpse);
        assert_eq!(map.corpses[0].time_of_death, Some(500));
    }

    #[test]
    fn burying_moves_the_corpse_into_a_grave() {
        let mut colony = colony();
        let mut calendar = calendar();
        colony.add_colonist(Pawn::colonist(1, "Ada", 3), &mut calendar);
        let corpse = colony
            .kill_colonist(PawnId(1), Position::new(4, 4), &mut calendar)
            .unwrap();
        colony.bury(corpse, Position::new(9, 9)).unwrap();

        let map = colony.map.as_ref().unwrap();
        assert!(map.corpses.is_empty());
        let grave = map.grave_of(PawnId(1)).unwrap();
        assert_eq!(grave.position, Position::new(9, 9));
        assert!(!grave.corpse.as_ref().unwrap().spawned);
    }

    #[test]
    fn unknown_pawn_cannot_be_killed() {
        let mut colony = colony();
        assert!(
            colony
                .kill_colonist(PawnId(9), Position::new(0, 0), &mut calendar())
                .is_err()
        );
    }

    #[test]
    fn quests_need_an_active_map() {
        let mut colony = colony();
        colony.map = None;
        let quest = Quest::new(1, "Lost", rimcalendar_core::QuestState::Ongoing, vec![]);
        assert!(colony.add_quest(quest, &mut calendar()).is_err());
    }

    #[test]
    fn seasons_follow_the_configured_bands() {
        let mut config = CalendarConfig::default_config();
        config.latitude_bands = LatitudeBands {
            tropical: 80.0,
            polar: 85.0,
        };
        let tropical = SimColony::at(0.0, 40.0, &config);
        let mut wide_tropics = CalendarService::new(config, 7);
        wide_tropics.frame(&tropical, &mut SimTextures::default()).unwrap();
        assert_eq!(wide_tropics.view().unwrap().season_text, "Summer");

        let temperate = colony();
        let mut standard = calendar();
        standard.frame(&temperate, &mut SimTextures::default()).unwrap();
        assert_eq!(standard.view().unwrap().season_text, "Spring");
    }
}
