//! The frame view: everything the panel draws, resolved to texture handles,
//! strings and click actions.
use log::warn;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::anniversaries::Remembrance;
use crate::clock::{DateFields, format_hour12, ordinal, season_label};
use crate::config::TextureNames;
use crate::constants::{
    ANNIVERSARY_TOOLTIP_PREFIX, BIRTHDAY_TOOLTIP_PREFIX, DAYS_PER_QUADRUM, SLOT_POSITIONS,
};
use crate::day_index::DayIndex;
use crate::error::CalendarError;
use crate::host::{PawnRef, Position, QuestId};
use crate::palette::XMarkPalette;
use crate::quest_events::QuestEntry;

/// Opaque handle to a host texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextureHandle(pub u32);

/// Host-side texture loading.
pub trait TextureLoader {
    /// Resolve an asset name; `None` when the asset does not exist.
    fn load(&mut self, asset: &str) -> Option<TextureHandle>;
}

/// Texture handles, loaded once on the first frame.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    handles: HashMap<String, Option<TextureHandle>>,
    loaded: bool,
}

impl TextureStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load every configured asset if that has not happened yet. Returns one
    /// [`CalendarError::MissingTexture`] per asset that failed; later calls
    /// return nothing.
    pub fn load_all<L: TextureLoader + ?Sized>(
        &mut self,
        names: &TextureNames,
        loader: &mut L,
    ) -> Vec<CalendarError> {
        if self.loaded {
            return Vec::new();
        }
        self.loaded = true;
        let mut missing = Vec::new();
        for asset in names.all() {
            if self.handles.contains_key(asset) {
                continue;
            }
            let handle = loader.load(asset);
            if handle.is_none() {
                warn!("calendar texture `{asset}` is missing; its layer will not be drawn");
                missing.push(CalendarError::MissingTexture {
                    asset: asset.to_string(),
                });
            }
            self.handles.insert(asset.to_string(), handle);
        }
        missing
    }

    #[must_use]
    pub fn handle(&self, asset: &str) -> Option<TextureHandle> {
        self.handles.get(asset).copied().flatten()
    }
}

/// Decoration layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Layer {
    XMark,
    QuestEvent,
    DeathAnniversary,
    Birthday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemainsKind {
    Grave,
    Corpse,
}

impl fmt::Display for RemainsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grave => "grave",
            Self::Corpse => "remains",
        })
    }
}

/// Where the camera goes when a dead colonist cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JumpTarget {
    pub position: Position,
    pub kind: RemainsKind,
}

impl From<&Remembrance> for JumpTarget {
    fn from(remembrance: &Remembrance) -> Self {
        Self {
            position: remembrance.position,
            kind: if remembrance.grave.is_some() {
                RemainsKind::Grave
            } else {
                RemainsKind::Corpse
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClickAction {
    None,
    SelectPawn(PawnRef),
    /// Select the pawn, falling back to the camera jump when the host
    /// cannot select it.
    VisitRemains { pawn: PawnRef, remains: JumpTarget },
    OpenQuest(QuestId),
    Menu(Vec<MenuOption>),
}

impl ClickAction {
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuOption {
    pub label: String,
    pub action: ClickAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDecoration {
    pub layer: Layer,
    pub icon: TextureHandle,
    pub tooltip: Option<String>,
    pub on_click: ClickAction,
}

/// One frame of the calendar panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameView {
    pub backdrop: Option<TextureHandle>,
    pub season_text: String,
    pub month_text: String,
    pub year_text: String,
    pub day_text: String,
    pub hour_text: String,
    /// Decorations per day, index 0 holding day 1, each bottom layer first.
    pub slots: Vec<Vec<SlotDecoration>>,
}

impl FrameView {
    /// Decorations for a one-based day; empty outside `1..=15`.
    #[must_use]
    pub fn slot(&self, day: u8) -> &[SlotDecoration] {
        usize::from(day)
            .checked_sub(1)
            .and_then(|idx| self.slots.get(idx))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Topmost decoration on a day that reacts to clicks.
    #[must_use]
    pub fn click_target(&self, day: u8) -> Option<&SlotDecoration> {
        self.slot(day)
            .iter()
            .rev()
            .find(|decoration| decoration.on_click.is_clickable())
    }
}

/// Borrowed state the view is composed from.
#[derive(Debug, Clone, Copy)]
pub struct RenderInputs<'a> {
    pub date: &'a DateFields,
    pub names: &'a TextureNames,
    pub textures: &'a TextureStore,
    pub palette: &'a XMarkPalette,
    pub birthdays: &'a DayIndex<PawnRef>,
    pub quests: &'a DayIndex<QuestEntry>,
    pub anniversaries: &'a DayIndex<Remembrance>,
}

/// Build the frame view. Layers whose texture is missing are left out.
#[must_use]
pub fn compose_view(inputs: &RenderInputs<'_>) -> FrameView {
    let date = inputs.date;
    let textures = inputs.textures;
    let names = inputs.names;
    let today = date.display_day();

    let mut slots = Vec::with_capacity(SLOT_POSITIONS.len());
    for day in (1..=DAYS_PER_QUADRUM).filter_map(|d| u8::try_from(d).ok()) {
        let mut layers = Vec::new();

        if day < today {
            let mark = inputs.palette.mark_for(usize::from(day - 1));
            if let Some(icon) = mark.and_then(|m| textures.handle(names.x_mark(m))) {
                layers.push(SlotDecoration {
                    layer: Layer::XMark,
                    icon,
                    tooltip: None,
                    on_click: ClickAction::None,
                });
            }
        }

        let quests = inputs.quests.get(day);
        if let Some(first) = quests.first()
            && let Some(icon) = textures.handle(names.event_icon(first.classification.kind))
        {
            layers.push(SlotDecoration {
                layer: Layer::QuestEvent,
                icon,
                tooltip: Some(joined(
                    first.classification.label_prefix,
                    quests.iter().map(|q| q.name.as_str()),
                )),
                on_click: quest_click(quests),
            });
        }

        let remembered = inputs.anniversaries.get(day);
        if !remembered.is_empty()
            && let Some(icon) = textures.handle(&names.gravestone)
        {
            layers.push(SlotDecoration {
                layer: Layer::DeathAnniversary,
                icon,
                tooltip: Some(joined(
                    ANNIVERSARY_TOOLTIP_PREFIX,
                    remembered.iter().map(|r| r.pawn.label.as_str()),
                )),
                on_click: anniversary_click(remembered),
            });
        }

        let birthdays = inputs.birthdays.get(day);
        if !birthdays.is_empty()
            && let Some(icon) = textures.handle(&names.birthday)
        {
            layers.push(SlotDecoration {
                layer: Layer::Birthday,
                icon,
                tooltip: Some(joined(
                    BIRTHDAY_TOOLTIP_PREFIX,
                    birthdays.iter().map(|p| p.label.as_str()),
                )),
                on_click: birthday_click(birthdays),
            });
        }

        slots.push(layers);
    }

    FrameView {
        backdrop: textures.handle(names.backdrop(date.season)),
        season_text: season_label(date.season).to_string(),
        month_text: date.quadrum.name().to_string(),
        year_text: date.year.to_string(),
        day_text: ordinal(u32::from(today)),
        hour_text: format_hour12(date.hour, date.minute),
        slots,
    }
}

fn joined<'a>(prefix: &str, names: impl Iterator<Item = &'a str>) -> String {
    let mut text = prefix.to_string();
    for (idx, name) in names.enumerate() {
        if idx > 0 {
            text.push_str(", ");
        }
        text.push_str(name);
    }
    text
}

/// Single target acts directly; several become a menu.
fn single_or_menu<T>(
    entries: &[T],
    label: impl Fn(&T) -> String,
    action: impl Fn(&T) -> ClickAction,
) -> ClickAction {
    match entries {
        [] => ClickAction::None,
        [only] => action(only),
        many => ClickAction::Menu(
            many.iter()
                .map(|entry| MenuOption {
                    label: label(entry),
                    action: action(entry),
                })
                .collect(),
        ),
    }
}

fn quest_click(quests: &[QuestEntry]) -> ClickAction {
    single_or_menu(quests, |q| q.name.clone(), |q| ClickAction::OpenQuest(q.id))
}

fn birthday_click(pawns: &[PawnRef]) -> ClickAction {
    single_or_menu(pawns, |p| p.label.clone(), |p| ClickAction::SelectPawn(p.clone()))
}

fn anniversary_click(remembered: &[Remembrance]) -> ClickAction {
    single_or_menu(
        remembered,
        |r| r.pawn.label.clone(),
        |r| ClickAction::VisitRemains {
            pawn: r.pawn.clone(),
            remains: JumpTarget::from(r),
        },
    )
}
