//! Quest classification: which icon a quest gets on the calendar and when
//! it fires.
use serde::{Deserialize, Serialize};

use crate::clock::AbsoluteTick;
use crate::host::QuestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestState {
    NotYetAccepted,
    Ongoing,
    EndedSuccess,
    EndedFailed,
    EndedOfferExpired,
}

/// The subset of quest behaviour parts the calendar understands. Anything
/// else the host exposes arrives as [`QuestPart::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestPart {
    Delay { ticks_left: AbsoluteTick },
    RandomRaid,
    ShuttleDelay,
    ShuttleLeaveDelay,
    SendShuttleAway,
    RefugeeDelayedReward,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub name: String,
    pub state: QuestState,
    pub ticks_until_acceptance_expiry: AbsoluteTick,
    pub parts: Vec<QuestPart>,
}

impl Quest {
    #[must_use]
    pub fn new(id: u64, name: &str, state: QuestState, parts: Vec<QuestPart>) -> Self {
        Self {
            id: QuestId(id),
            name: name.to_string(),
            state,
            ticks_until_acceptance_expiry: 0,
            parts,
        }
    }

    /// `ticks_left` of the first `Delay` part, if any.
    #[must_use]
    pub fn first_delay(&self) -> Option<AbsoluteTick> {
        self.parts.iter().find_map(|part| match part {
            QuestPart::Delay { ticks_left } => Some(*ticks_left),
            _ => None,
        })
    }
}

/// Icon taxonomy for quest events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Raid,
    ShuttleArrival,
    ShuttleDeparture,
    RefugeeDeparture,
    TimedEvent,
    Expiry,
}

impl EventKind {
    #[must_use]
    pub const fn label_prefix(self) -> &'static str {
        match self {
            Self::Raid => "Raid Arrives: ",
            Self::ShuttleArrival => "Shuttle Arrives: ",
            Self::ShuttleDeparture => "Shuttle Departs: ",
            Self::RefugeeDeparture => "Refugees Depart: ",
            Self::TimedEvent => "Event Expires: ",
            Self::Expiry => "Quest Expires: ",
        }
    }

    /// Category used in the indexing log line.
    #[must_use]
    pub const fn log_category(self) -> &'static str {
        match self {
            Self::Raid => "Raid Event",
            Self::ShuttleArrival | Self::ShuttleDeparture => "Shuttle Event",
            Self::RefugeeDeparture => "Refugee Event",
            Self::TimedEvent => "Active Quest",
            Self::Expiry => "Available Quest",
        }
    }

    /// Kind implied by a single non-delay part.
    const fn of_part(part: &QuestPart) -> Option<Self> {
        match part {
            QuestPart::RandomRaid => Some(Self::Raid),
            QuestPart::ShuttleDelay | QuestPart::ShuttleLeaveDelay => Some(Self::ShuttleArrival),
            QuestPart::SendShuttleAway => Some(Self::ShuttleDeparture),
            QuestPart::RefugeeDelayedReward => Some(Self::RefugeeDeparture),
            QuestPart::Delay { .. } | QuestPart::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestClassification {
    pub kind: EventKind,
    pub label_prefix: &'static str,
    /// Absolute tick the event fires at; `None` when the quest is not
    /// scheduled.
    pub firing_tick: Option<AbsoluteTick>,
}

impl QuestClassification {
    const fn new(kind: EventKind, firing_tick: Option<AbsoluteTick>) -> Self {
        Self {
            kind,
            label_prefix: kind.label_prefix(),
            firing_tick,
        }
    }

    /// Whether the quest has a firing tick at all.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.firing_tick.is_some()
    }
}

/// Classify a quest relative to the current tick.
///
/// Unaccepted offers fire when acceptance expires. Ongoing quests take the
/// kind of the last recognized non-delay part, firing after the first
/// delay; a quest with only delay parts is a timed event firing when its
/// last delay elapses. Anything else is an unscheduled expiry.
#[must_use]
pub fn classify(quest: &Quest, now: AbsoluteTick) -> QuestClassification {
    match quest.state {
        QuestState::NotYetAccepted => {
            let expiry = quest.ticks_until_acceptance_expiry;
            let firing = (expiry > 0).then(|| now.saturating_add(expiry));
            QuestClassification::new(EventKind::Expiry, firing)
        }
        QuestState::Ongoing => classify_ongoing(quest, now),
        QuestState::EndedSuccess | QuestState::EndedFailed | QuestState::EndedOfferExpired => {
            QuestClassification::new(EventKind::Expiry, None)
        }
    }
}

fn classify_ongoing(quest: &Quest, now: AbsoluteTick) -> QuestClassification {
    let mut winner: Option<EventKind> = None;
    let mut last_delay: Option<AbsoluteTick> = None;
    for part in &quest.parts {
        if let QuestPart::Delay { ticks_left } = part {
            last_delay = Some(*ticks_left);
        } else if let Some(kind) = EventKind::of_part(part) {
            winner = Some(kind);
        }
    }

    match (winner, last_delay) {
        (Some(kind), _) => {
            let delay = quest.first_delay().unwrap_or(0);
            QuestClassification::new(kind, Some(now.saturating_add(delay)))
        }
        (None, Some(ticks_left)) => {
            QuestClassification::new(EventKind::TimedEvent, Some(now.saturating_add(ticks_left)))
        }
        (None, None) => QuestClassification::new(EventKind::Expiry, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TICKS_PER_DAY;

    fn ongoing(parts: Vec<QuestPart>) -> Quest {
        Quest::new(1, "Fighting for Profit", QuestState::Ongoing, parts)
    }

    #[test]
    fn raid_after_delay_uses_first_delay() {
        let quest = ongoing(vec![
            QuestPart::Delay {
                ticks_left: 2 * TICKS_PER_DAY,
            },
            QuestPart::RandomRaid,
        ]);
        let class = classify(&quest, 0);
        assert_eq!(class.kind, EventKind::Raid);
        assert_eq!(class.label_prefix, "Raid Arrives: ");
        assert_eq!(class.firing_tick, Some(2 * TICKS_PER_DAY));
    }

    #[test]
    fn last_recognized_part_wins() {
        let quest = ongoing(vec![
            QuestPart::RandomRaid,
            QuestPart::Delay { ticks_left: 500 },
            QuestPart::RefugeeDelayedReward,
            QuestPart::Other("QuestPart_Letter".to_string()),
        ]);
        let class = classify(&quest, 1_000);
        assert_eq!(class.kind, EventKind::RefugeeDeparture);
        assert_eq!(class.firing_tick, Some(1_500));
    }

    #[test]
    fn trailing_delay_does_not_demote_recognized_kind() {
        let quest = ongoing(vec![
            QuestPart::Delay { ticks_left: 300 },
            QuestPart::ShuttleLeaveDelay,
            QuestPart::Delay { ticks_left: 900 },
        ]);
        let class = classify(&quest, 0);
        assert_eq!(class.kind, EventKind::ShuttleArrival);
        assert_eq!(class.label_prefix, "Shuttle Arrives: ");
        assert_eq!(class.firing_tick, Some(300));
    }

    #[test]
    fn delay_only_is_timed_event() {
        let quest = ongoing(vec![QuestPart::Delay { ticks_left: 4_000 }]);
        let class = classify(&quest, 10);
        assert_eq!(class.kind, EventKind::TimedEvent);
        assert_eq!(class.label_prefix, "Event Expires: ");
        assert_eq!(class.firing_tick, Some(4_010));
    }

    #[test]
    fn recognized_part_without_delay_fires_now() {
        let quest = ongoing(vec![QuestPart::SendShuttleAway]);
        let class = classify(&quest, 77);
        assert_eq!(class.kind, EventKind::ShuttleDeparture);
        assert_eq!(class.firing_tick, Some(77));
    }

    #[test]
    fn unknown_shape_is_unscheduled_expiry() {
        let quest = ongoing(vec![QuestPart::Other("QuestPart_Choice".to_string())]);
        let class = classify(&quest, 0);
        assert_eq!(class.kind, EventKind::Expiry);
        assert!(!class.is_scheduled());
    }

    #[test]
    fn unaccepted_offer_expires() {
        let mut quest = Quest::new(9, "Desperate Nomads", QuestState::NotYetAccepted, vec![]);
        quest.ticks_until_acceptance_expiry = 1_200;
        let class = classify(&quest, 100);
        assert_eq!(class.kind, EventKind::Expiry);
        assert_eq!(class.label_prefix, "Quest Expires: ");
        assert_eq!(class.firing_tick, Some(1_300));

        quest.ticks_until_acceptance_expiry = 0;
        assert_eq!(classify(&quest, 100).firing_tick, None);
    }

    #[test]
    fn ended_quests_are_not_scheduled() {
        let quest = Quest::new(
            3,
            "Old News",
            QuestState::EndedSuccess,
            vec![QuestPart::RandomRaid, QuestPart::Delay { ticks_left: 10 }],
        );
        assert_eq!(classify(&quest, 0).firing_tick, None);
    }

    #[test]
    fn log_categories_group_shuttles() {
        assert_eq!(EventKind::ShuttleArrival.log_category(), "Shuttle Event");
        assert_eq!(EventKind::ShuttleDeparture.log_category(), "Shuttle Event");
        assert_eq!(EventKind::Expiry.log_category(), "Available Quest");
    }
}
