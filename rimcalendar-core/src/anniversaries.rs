//! Death anniversaries of colonists whose remains are on the active map.
//!
//! The day of an anniversary is computed at the longitude of the tile the
//! colonist died on, so it stays put when the player views another map.
use log::warn;
use serde::Serialize;
use std::collections::HashSet;

use crate::clock::DatePrimitives;
use crate::day_index::Indexed;
use crate::error::CalendarError;
use crate::host::{ColonyHost, ColonyMap, Corpse, PawnRef, Position, ThingId};
use crate::scheduler::FrameSnapshot;

/// A remembered colonist and where their remains lie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remembrance {
    pub pawn: PawnRef,
    pub corpse: ThingId,
    /// Grave holding the corpse, when buried.
    pub grave: Option<ThingId>,
    /// Grave position when buried, corpse position otherwise.
    pub position: Position,
}

/// Rebuilds the anniversary index and remembers which corpses have already
/// been reported for a missing time of death.
#[derive(Debug, Clone, Default)]
pub struct AnniversaryIndexer {
    warned: HashSet<ThingId>,
}

impl AnniversaryIndexer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every colonist corpse on the active map whose death quadrum
    /// matches the current one.
    pub fn index<H: ColonyHost>(
        &mut self,
        host: &H,
        snapshot: &FrameSnapshot,
    ) -> Indexed<Remembrance> {
        let mut out = Indexed::default();
        let Some(map) = host.active_map() else {
            out.skip(CalendarError::NoActiveMap);
            return out;
        };

        for (corpse, grave) in remains_on(map) {
            if !corpse.inner_pawn.is_colonist {
                continue;
            }
            let Some(time_of_death) = corpse.time_of_death.filter(|tick| *tick >= 0) else {
                if self.warned.insert(corpse.id) {
                    warn!(
                        "corpse of '{}' has no recorded time of death; not commemorated",
                        corpse.inner_pawn.label
                    );
                }
                out.skip(CalendarError::MissingTimeOfDeath {
                    corpse: corpse.id,
                    pawn: corpse.inner_pawn.id,
                });
                continue;
            };

            let tile = if corpse.tile >= 0 { corpse.tile } else { map.tile };
            let longitude = host.longitude_of(tile);
            let dates = host.dates();
            if dates.quadrum(time_of_death, longitude) != snapshot.date.quadrum {
                continue;
            }
            let day = dates.day_of_season(time_of_death, longitude).saturating_add(1);
            out.index.push(
                day,
                Remembrance {
                    pawn: PawnRef::from(&corpse.inner_pawn),
                    corpse: corpse.id,
                    grave: grave.map(|(id, _)| id),
                    position: grave.map_or(corpse.position, |(_, position)| position),
                },
            );
        }
        out
    }

    /// Number of corpses already warned about.
    #[must_use]
    pub fn warned_count(&self) -> usize {
        self.warned.len()
    }
}

/// Spawned corpses followed by buried ones, each corpse once.
fn remains_on(map: &ColonyMap) -> Vec<(&Corpse, Option<(ThingId, Position)>)> {
    let mut seen = HashSet::new();
    let loose = map.spawned_corpses().map(|corpse| (corpse, None));
    let buried = map.graves.iter().filter_map(|grave| {
        grave
            .corpse
            .as_ref()
            .map(|corpse| (corpse, Some((grave.id, grave.position))))
    });
    loose
        .chain(buried)
        .filter(|(corpse, _)| seen.insert(corpse.id))
        .collect()
}
