#![allow(dead_code)]

use std::collections::HashMap;

use rimcalendar_core::constants::TICKS_PER_HOUR;
use rimcalendar_core::{
    AbsoluteTick, ColonyHost, ColonyMap, MapId, Pawn, Quest, StandardCalendar, TextureHandle,
    TextureLoader, TileId, WorldLocation,
};

pub const HOME_TILE: TileId = 0;

/// In-memory colony with one active map.
pub struct TestColony {
    pub now: AbsoluteTick,
    pub map: Option<ColonyMap>,
    pub tiles: HashMap<TileId, WorldLocation>,
    pub colonists: Vec<Pawn>,
    pub quests: Vec<Quest>,
    pub calendar: StandardCalendar,
}

impl TestColony {
    pub fn at(longitude: f32, latitude: f32) -> Self {
        Self {
            now: 0,
            map: Some(ColonyMap::new(MapId(1), HOME_TILE)),
            tiles: HashMap::from([(HOME_TILE, WorldLocation::new(longitude, latitude))]),
            colonists: Vec::new(),
            quests: Vec::new(),
            calendar: StandardCalendar::default(),
        }
    }

    pub fn map_mut(&mut self) -> &mut ColonyMap {
        self.map.as_mut().expect("test colony has an active map")
    }
}

impl ColonyHost for TestColony {
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

/// Hands out a distinct handle per asset name.
#[derive(Default)]
pub struct AllTextures {
    names: Vec<String>,
}

impl AllTextures {
    pub fn handle_of(&self, asset: &str) -> Option<TextureHandle> {
        self.names
            .iter()
            .position(|name| name == asset)
            .and_then(|idx| u32::try_from(idx).ok())
            .map(TextureHandle)
    }
}

impl TextureLoader for AllTextures {
    fn load(&mut self, asset: &str) -> Option<TextureHandle> {
        self.names.push(asset.to_string());
        self.handle_of(asset)
    }
}

pub fn tick_at(hour: i64, minute: i64) -> AbsoluteTick {
    hour * TICKS_PER_HOUR + minute * TICKS_PER_HOUR / 60
}
