//! Panel adapter contract: where the calendar draws and what clicks do.
//!
//! The host splices [`draw_calendar_panel`] into its own date-widget draw
//! callback. Everything drawn goes through [`Painter`]; everything a click
//! changes in the game goes through [`HostUi`].
use serde::Serialize;

use crate::constants::{
    HOUR_LABEL, MONTH_LABEL, PANEL_LEAD_FACTOR, PANEL_RIGHT_INSET, PANEL_SIZE,
    PANEL_TRAIL_FACTOR, SEASON_LABEL, SLOT_POSITIONS, SLOT_SIZE, YEAR_LABEL,
};
use crate::host::{PawnId, Position, QuestId};
use crate::render::{ClickAction, FrameView, MenuOption, TextureHandle};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    const fn offset(origin: (f32, f32), layout: (f32, f32, f32, f32)) -> Self {
        Self::new(origin.0 + layout.0, origin.1 + layout.1, layout.2, layout.3)
    }
}

/// Horizontal text alignment, vertically centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    Positive,
}

/// Immediate-mode drawing primitives.
pub trait Painter {
    fn screen_width(&self) -> f32;
    /// Draw a texture scaled to fit `rect`.
    fn draw_texture(&mut self, rect: Rect, texture: TextureHandle);
    fn label(&mut self, rect: Rect, text: &str, anchor: Anchor);
    fn tooltip(&mut self, rect: Rect, text: &str);
    /// An invisible button; true when clicked this frame.
    fn button_invisible(&mut self, rect: Rect) -> bool;
}

/// Game actions a click can trigger.
pub trait HostUi {
    /// Jump the camera to a living pawn and select it. False when the pawn
    /// cannot be selected (dead, despawned, off-map).
    fn select_pawn(&mut self, pawn: PawnId) -> bool;
    fn jump_to(&mut self, position: Position);
    /// Open the quests tab on a quest, un-hiding it first.
    fn open_quest(&mut self, quest: QuestId);
    /// Present a choice. The host calls [`perform_click`] with the chosen
    /// option's action.
    fn show_menu(&mut self, options: &[MenuOption]);
    fn message(&mut self, text: &str, kind: MessageKind);
}

/// Top-left corner of the panel for a screen width and base y, after the
/// lead decrement.
#[must_use]
pub fn panel_origin(screen_width: f32, base_y: f32) -> (f32, f32) {
    (
        screen_width - PANEL_RIGHT_INSET,
        base_y - PANEL_SIZE * PANEL_LEAD_FACTOR,
    )
}

/// Rectangle of a one-based day slot relative to a panel origin.
#[must_use]
pub fn slot_rect(origin: (f32, f32), day: u8) -> Option<Rect> {
    let idx = usize::from(day).checked_sub(1)?;
    let (dx, dy) = SLOT_POSITIONS.get(idx)?;
    Some(Rect::new(origin.0 + dx, origin.1 + dy, SLOT_SIZE, SLOT_SIZE))
}

/// Day slot under a screen point, if any.
#[must_use]
pub fn slot_at(origin: (f32, f32), x: f32, y: f32) -> Option<u8> {
    (1..=u8::try_from(SLOT_POSITIONS.len()).ok()?)
        .find(|day| slot_rect(origin, *day).is_some_and(|rect| rect.contains(x, y)))
}

/// Carry out a slot's click action against the host.
pub fn perform_click<U: HostUi + ?Sized>(action: &ClickAction, ui: &mut U) {
    match action {
        ClickAction::None => {}
        ClickAction::SelectPawn(pawn) => {
            ui.select_pawn(pawn.id);
        }
        ClickAction::VisitRemains { pawn, remains } => {
            if ui.select_pawn(pawn.id) {
                return;
            }
            ui.jump_to(remains.position);
            ui.message(
                &format!("Jumping to {}'s {}.", pawn.label, remains.kind),
                MessageKind::Positive,
            );
        }
        ClickAction::OpenQuest(quest) => ui.open_quest(*quest),
        ClickAction::Menu(options) => ui.show_menu(options),
    }
}

/// Draw the calendar above `base_y` and dispatch this frame's click.
/// Returns the base y for whatever the host draws next.
pub fn draw_calendar_panel<P, U>(
    base_y: f32,
    view: &FrameView,
    painter: &mut P,
    ui: &mut U,
) -> f32
where
    P: Painter + ?Sized,
    U: HostUi + ?Sized,
{
    let origin = panel_origin(painter.screen_width(), base_y);

    if let Some(backdrop) = view.backdrop {
        painter.draw_texture(
            Rect::new(origin.0, origin.1, PANEL_SIZE, PANEL_SIZE),
            backdrop,
        );
    }
    painter.label(Rect::offset(origin, SEASON_LABEL), &view.season_text, Anchor::Right);
    painter.label(Rect::offset(origin, MONTH_LABEL), &view.month_text, Anchor::Center);
    painter.label(Rect::offset(origin, YEAR_LABEL), &view.year_text, Anchor::Right);
    painter.label(Rect::offset(origin, HOUR_LABEL), &view.hour_text, Anchor::Right);

    for (day, decorations) in (1u8..).zip(&view.slots) {
        let Some(rect) = slot_rect(origin, day) else {
            break;
        };
        for decoration in decorations {
            painter.draw_texture(rect, decoration.icon);
            if let Some(tooltip) = &decoration.tooltip {
                painter.tooltip(rect, tooltip);
            }
        }
        if let Some(target) = view.click_target(day)
            && painter.button_invisible(rect)
        {
            perform_click(&target.on_click, ui);
        }
    }

    origin.1 - PANEL_SIZE * PANEL_TRAIL_FACTOR
}
