//! Soft-failure taxonomy for the calendar.
//!
//! None of these interrupt the host. Indexers collect them as skipped
//! entries; the frame loop only ever surfaces [`CalendarError::NoActiveMap`].
use thiserror::Error;

use crate::clock::AbsoluteTick;
use crate::host::{PawnId, QuestId, ThingId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("no active map; calendar skipped this frame")]
    NoActiveMap,
    #[error("texture `{asset}` could not be loaded")]
    MissingTexture { asset: String },
    #[error("quest {quest:?} has no recognizable schedule")]
    UnknownQuestShape { quest: QuestId },
    #[error("corpse {corpse:?} of pawn {pawn:?} has no recorded time of death")]
    MissingTimeOfDeath { corpse: ThingId, pawn: PawnId },
    #[error("firing tick {tick} is not after the current tick {now}")]
    InvalidTick { tick: AbsoluteTick, now: AbsoluteTick },
}
