//! The game state the calendar reads, and the trait a host implements to
//! expose it.
//!
//! Pawns, quests and corpses are opaque to the calendar beyond the fields
//! modelled here; identity is carried by the id newtypes.
use serde::{Deserialize, Serialize};

use crate::clock::{AbsoluteTick, DatePrimitives, WorldLocation};
use crate::quest::Quest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PawnId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestId(pub u64);

/// Identity of a map thing (corpse or grave building).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub u32);

/// World tile index. Negative means "not on the world grid".
pub type TileId = i32;

/// Cell coordinates on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub z: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    /// Short capitalized display name.
    pub label: String,
    pub faction: Option<Faction>,
    pub is_colonist: bool,
    /// Day of the year (`0..60`) the pawn was born on; `None` when the pawn
    /// has no age tracker.
    pub birth_day_of_year: Option<u8>,
}

impl Pawn {
    /// A player-faction colonist with an age tracker.
    #[must_use]
    pub fn colonist(id: u64, label: &str, birth_day_of_year: u8) -> Self {
        Self {
            id: PawnId(id),
            label: label.to_string(),
            faction: Some(Faction::Player),
            is_colonist: true,
            birth_day_of_year: Some(birth_day_of_year),
        }
    }

    #[must_use]
    pub fn is_player_faction(&self) -> bool {
        self.faction == Some(Faction::Player)
    }
}

/// The identity and display name of a pawn, as held by the calendar's
/// indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PawnRef {
    pub id: PawnId,
    pub label: String,
}

impl From<&Pawn> for PawnRef {
    fn from(pawn: &Pawn) -> Self {
        Self {
            id: pawn.id,
            label: pawn.label.clone(),
        }
    }
}

/// A dead pawn's body, free-standing or inside a grave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpse {
    pub id: ThingId,
    pub inner_pawn: Pawn,
    pub spawned: bool,
    pub tile: TileId,
    pub position: Position,
    /// Absolute tick at which the corpse was created. Stamped by
    /// `CalendarService::on_corpse_created`.
    pub time_of_death: Option<AbsoluteTick>,
}

impl Corpse {
    /// A freshly spawned corpse that has not been stamped yet.
    #[must_use]
    pub fn new(id: ThingId, inner_pawn: Pawn, tile: TileId, position: Position) -> Self {
        Self {
            id,
            inner_pawn,
            spawned: true,
            tile,
            position,
            time_of_death: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grave {
    pub id: ThingId,
    pub position: Position,
    pub corpse: Option<Corpse>,
}

/// Snapshot of the active map as far as the calendar cares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyMap {
    pub id: MapId,
    pub tile: TileId,
    /// False until the map's pawn list has been initialized.
    pub pawns_ready: bool,
    pub corpses: Vec<Corpse>,
    pub graves: Vec<Grave>,
}

impl ColonyMap {
    #[must_use]
    pub const fn new(id: MapId, tile: TileId) -> Self {
        Self {
            id,
            tile,
            pawns_ready: true,
            corpses: Vec::new(),
            graves: Vec::new(),
        }
    }

    /// Corpses lying on the map itself.
    pub fn spawned_corpses(&self) -> impl Iterator<Item = &Corpse> {
        self.corpses.iter().filter(|corpse| corpse.spawned)
    }

    /// Grave holding the given pawn's corpse, if any.
    #[must_use]
    pub fn grave_of(&self, pawn: PawnId) -> Option<&Grave> {
        self.graves.iter().find(|grave| {
            grave
                .corpse
                .as_ref()
                .is_some_and(|corpse| corpse.inner_pawn.id == pawn)
        })
    }
}

/// Read access to live game state.
///
/// Every call is made on the host's UI thread; implementations hand out
/// borrowed snapshots and need no interior locking.
pub trait ColonyHost {
    type Dates: DatePrimitives;

    fn dates(&self) -> &Self::Dates;

    fn ticks_abs(&self) -> AbsoluteTick;

    fn active_map(&self) -> Option<&ColonyMap>;

    fn location_of(&self, tile: TileId) -> WorldLocation;

    /// Player-faction colonists with an age tracker, across all maps.
    fn free_colonists(&self) -> &[Pawn];

    fn quests(&self) -> &[Quest];

    fn longitude_of(&self, tile: TileId) -> f32 {
        self.location_of(tile).longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpse(id: u64, pawn: u64) -> Corpse {
        Corpse::new(
            ThingId(id),
            Pawn::colonist(pawn, "Ada", 3),
            4,
            Position::new(1, 2),
        )
    }

    #[test]
    fn spawned_corpses_skip_contained_ones() {
        let mut map = ColonyMap::new(MapId(1), 4);
        let mut hidden = corpse(2, 20);
        hidden.spawned = false;
        map.corpses = vec![corpse(1, 10), hidden];
        let ids: Vec<_> = map.spawned_corpses().map(|c| c.id).collect();
        assert_eq!(ids, vec![ThingId(1)]);
    }

    #[test]
    fn grave_lookup_matches_inner_pawn() {
        let mut map = ColonyMap::new(MapId(1), 4);
        map.graves = vec![
            Grave {
                id: ThingId(50),
                position: Position::new(5, 5),
                corpse: None,
            },
            Grave {
                id: ThingId(51),
                position: Position::new(6, 5),
                corpse: Some(corpse(3, 30)),
            },
        ];
        assert_eq!(map.grave_of(PawnId(30)).map(|g| g.id), Some(ThingId(51)));
        assert!(map.grave_of(PawnId(31)).is_none());
    }

    #[test]
    fn colonist_constructor_is_player_faction() {
        let pawn = Pawn::colonist(1, "Bo", 59);
        assert!(pawn.is_player_faction());
        assert_eq!(pawn.birth_day_of_year, Some(59));
    }
}
