//! Quest event indexing for the current quadrum.
use log::debug;
use serde::Serialize;

use crate::clock::DatePrimitives;
use crate::day_index::Indexed;
use crate::error::CalendarError;
use crate::host::QuestId;
use crate::quest::{EventKind, Quest, QuestClassification, QuestState, classify};
use crate::scheduler::FrameSnapshot;

/// A quest placed on the calendar, with the classification it was indexed
/// under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestEntry {
    pub id: QuestId,
    pub name: String,
    pub classification: QuestClassification,
}

/// Index every quest firing later in the current quadrum of the current
/// year.
pub fn index_quest_events<D>(
    quests: &[Quest],
    dates: &D,
    snapshot: &FrameSnapshot,
) -> Indexed<QuestEntry>
where
    D: DatePrimitives + ?Sized,
{
    let now = snapshot.now;
    let longitude = snapshot.location.longitude;
    let mut out = Indexed::default();

    for quest in quests {
        let classification = classify(quest, now);
        let Some(firing) = classification.firing_tick else {
            if quest.state == QuestState::Ongoing && classification.kind == EventKind::Expiry {
                out.skip(CalendarError::UnknownQuestShape { quest: quest.id });
            }
            continue;
        };
        if firing <= now {
            out.skip(CalendarError::InvalidTick { tick: firing, now });
            continue;
        }

        let quadrum = dates.quadrum(firing, longitude);
        let year = dates.year(firing, longitude);
        if quadrum != snapshot.date.quadrum || year != snapshot.date.year {
            continue;
        }
        let day = dates.day_of_season(firing, longitude).saturating_add(1);
        let entry = QuestEntry {
            id: quest.id,
            name: quest.name.clone(),
            classification,
        };
        if out.index.push(day, entry) {
            debug!(
                "{} '{}' occurs on {quadrum} Day {day}",
                classification.kind.log_category(),
                quest.name
            );
        }
    }
    out
}
