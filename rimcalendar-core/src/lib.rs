//! RimCalendar core
//!
//! Host-agnostic calendar overlay logic for a colony sim: the longitude-aware
//! clock, the quest classifier, the birthday, quest-event and death-anniversary
//! indices for the current quadrum, the refresh scheduler and the render model.
//! Drawing and game actions go through the traits in [`host`], [`render`] and
//! [`panel`]; this crate never touches a UI toolkit.

pub mod anniversaries;
pub mod birthdays;
pub mod clock;
pub mod config;
pub mod constants;
pub mod day_index;
pub mod error;
pub mod host;
pub mod numbers;
pub mod palette;
pub mod panel;
pub mod quest;
pub mod quest_events;
pub mod render;
pub mod scheduler;
pub mod service;

// Re-export commonly used types
pub use anniversaries::{AnniversaryIndexer, Remembrance};
pub use birthdays::{birthday_slot, index_birthdays};
pub use clock::{
    AbsoluteTick, DateFields, DatePrimitives, Quadrum, Season, StandardCalendar, WorldLocation,
    date_fields, format_hour12, local_hour, ordinal, season_label,
};
pub use config::{CalendarConfig, ConfigError, LatitudeBands, TextureNames, XMarkWeights};
pub use day_index::{DayEntries, DayIndex, Indexed};
pub use error::CalendarError;
pub use host::{
    ColonyHost, ColonyMap, Corpse, Faction, Grave, MapId, Pawn, PawnId, PawnRef, Position,
    QuestId, ThingId, TileId,
};
pub use palette::{XMark, XMarkPalette};
pub use panel::{
    Anchor, HostUi, MessageKind, Painter, Rect, draw_calendar_panel, perform_click, slot_at,
    slot_rect,
};
pub use quest::{EventKind, Quest, QuestClassification, QuestPart, QuestState, classify};
pub use quest_events::{QuestEntry, index_quest_events};
pub use render::{
    ClickAction, FrameView, JumpTarget, Layer, MenuOption, RemainsKind, SlotDecoration,
    TextureHandle, TextureLoader, TextureStore,
};
pub use scheduler::{FrameSnapshot, LastObserved, RefreshPlan, RefreshScheduler};
pub use service::CalendarService;
