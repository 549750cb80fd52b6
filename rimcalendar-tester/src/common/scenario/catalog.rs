use anyhow::{Context, Result, ensure};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::logic::sim::{RecordingPainter, RecordingUi, SimColony, SimTextures};
use rimcalendar_core::constants::{
    DAYS_PER_QUADRUM, PANEL_LEAD_FACTOR, PANEL_SIZE, PANEL_TRAIL_FACTOR, TICKS_PER_DAY,
    TICKS_PER_HOUR, TICKS_PER_QUADRUM, TICKS_PER_YEAR,
};
use rimcalendar_core::panel::panel_origin;
use rimcalendar_core::{
    AbsoluteTick, CalendarConfig, CalendarService, ColonyHost, DatePrimitives, EventKind,
    FrameSnapshot, Layer, MessageKind, Pawn, PawnId, Position, Quadrum, Quest, QuestPart,
    QuestState, Rect, classify, format_hour12, index_birthdays, index_quest_events, slot_at,
    slot_rect,
};

fn calendar(seed: u64, config: &CalendarConfig) -> CalendarService {
    CalendarService::new(config.clone(), seed)
}

/// Tick for a wall-clock time on day zero. Rounds up so the minute reads
/// back exactly.
fn tick_at(hour: u8, minute: u8) -> AbsoluteTick {
    i64::from(hour) * TICKS_PER_HOUR + (i64::from(minute) * TICKS_PER_HOUR + 59) / 60
}

fn shown_hour(
    seed: u64,
    config: &CalendarConfig,
    longitude: f32,
    tick: AbsoluteTick,
) -> Result<String> {
    let mut colony = SimColony::at(longitude, 40.0, config);
    colony.now = tick;
    let mut calendar = calendar(seed, config);
    calendar.frame(&colony, &mut SimTextures::default())?;
    let view = calendar.view().context("no view after a successful frame")?;
    Ok(view.hour_text)
}

pub fn hour_at_prime_meridian(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (hour, minute) = (rng.gen_range(0..24u8), rng.gen_range(0..60u8));
    let text = shown_hour(seed, config, 0.0, tick_at(hour, minute))?;
    ensure!(
        text == format_hour12(hour, minute),
        "{hour:02}:{minute:02} at longitude 0 shown as '{text}'"
    );
    let fixed = shown_hour(seed, config, 0.0, tick_at(14, 30))?;
    ensure!(fixed == "2:30 PM", "14:30 shown as '{fixed}'");
    Ok(())
}

pub fn hour_east(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (hour, minute) = (rng.gen_range(0..24u8), rng.gen_range(0..60u8));
    let text = shown_hour(seed, config, 45.0, tick_at(hour, minute))?;
    let expected = format_hour12((hour + 3) % 24, minute);
    ensure!(
        text == expected,
        "{hour:02}:{minute:02} at 45E shown as '{text}', expected '{expected}'"
    );
    Ok(())
}

pub fn hour_wraps_west(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (hour, minute) = (rng.gen_range(0..3u8), rng.gen_range(0..60u8));
    let text = shown_hour(seed, config, -45.0, tick_at(hour, minute))?;
    let expected = format_hour12(hour + 21, minute);
    ensure!(
        text == expected,
        "{hour:02}:{minute:02} at 45W shown as '{text}', expected '{expected}'"
    );
    let fixed = shown_hour(seed, config, -45.0, tick_at(1, 30))?;
    ensure!(fixed == "10:30 PM", "01:30 at 45W shown as '{fixed}'");
    Ok(())
}

pub fn quest_classification(seed: u64, _config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let now = rng.gen_range(0..TICKS_PER_YEAR);
    let delay = rng.gen_range(1..10 * TICKS_PER_DAY);
    let cases = [
        (QuestPart::RandomRaid, EventKind::Raid, "Raid Arrives: "),
        (
            QuestPart::ShuttleDelay,
            EventKind::ShuttleArrival,
            "Shuttle Arrives: ",
        ),
        (
            QuestPart::SendShuttleAway,
            EventKind::ShuttleDeparture,
            "Shuttle Departs: ",
        ),
        (
            QuestPart::RefugeeDelayedReward,
            EventKind::RefugeeDeparture,
            "Refugees Depart: ",
        ),
    ];
    for (part, kind, prefix) in cases {
        let quest = Quest::new(
            1,
            "Sampled",
            QuestState::Ongoing,
            vec![QuestPart::Delay { ticks_left: delay }, part.clone()],
        );
        let class = classify(&quest, now);
        ensure!(class.kind == kind, "{part:?} classified as {:?}", class.kind);
        ensure!(class.label_prefix == prefix, "{part:?} prefix '{}'", class.label_prefix);
        ensure!(
            class.firing_tick == Some(now + delay),
            "{part:?} fires at {:?}, expected {}",
            class.firing_tick,
            now + delay
        );
    }

    let mut offer = Quest::new(2, "Offer", QuestState::NotYetAccepted, vec![]);
    offer.ticks_until_acceptance_expiry = delay;
    let class = classify(&offer, now);
    ensure!(
        class.kind == EventKind::Expiry && class.firing_tick == Some(now + delay),
        "unaccepted offer classified as {class:?}"
    );

    let finished = Quest::new(
        3,
        "Done",
        QuestState::EndedSuccess,
        vec![QuestPart::RandomRaid],
    );
    ensure!(
        classify(&finished, now).firing_tick.is_none(),
        "finished quest is still scheduled"
    );
    Ok(())
}

pub fn birthday_index(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let birth = rng.gen_range(0..60u8);
    let other = (birth + 15) % 60;
    let quadrum = Quadrum::from_day_of_year(i64::from(birth));
    let day = birth % 15 + 1;

    let mut colony = SimColony::at(0.0, 40.0, config);
    let mut calendar = calendar(seed, config);
    colony.add_colonist(Pawn::colonist(1, "Ada", birth), &mut calendar);
    colony.add_colonist(Pawn::colonist(2, "Bo", other), &mut calendar);
    colony.now = i64::from(quadrum.index()) * TICKS_PER_QUADRUM
        + rng.gen_range(0..i64::from(DAYS_PER_QUADRUM)) * TICKS_PER_DAY;

    let mut textures = SimTextures::default();
    calendar.frame(&colony, &mut textures)?;
    let index = calendar.birthdays();
    ensure!(
        index.get(day).iter().any(|pawn| pawn.id == PawnId(1)),
        "Ada (day of year {birth}) missing from {quadrum} day {day}"
    );
    ensure!(
        index.iter().all(|(_, pawns)| pawns.iter().all(|p| p.id != PawnId(2))),
        "Bo (day of year {other}) indexed in {quadrum}"
    );

    let view = calendar.view().context("no view")?;
    let cake = textures.handle_of(&config.textures.birthday);
    let slot = view.slot(day);
    let decoration = slot
        .iter()
        .find(|d| d.layer == Layer::Birthday)
        .with_context(|| format!("no birthday decoration on day {day}"))?;
    ensure!(Some(decoration.icon) == cake, "birthday drawn with the wrong icon");
    ensure!(
        decoration.tooltip.as_deref() == Some("🎂 Birthday: Ada"),
        "birthday tooltip {:?}",
        decoration.tooltip
    );
    Ok(())
}

pub fn death_anniversary(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let longitude = f32::from(rng.gen_range(-180i16..180));
    let died = rng.gen_range(0..TICKS_PER_YEAR);
    let grave_at = Position::new(rng.gen_range(0..250), rng.gen_range(0..250));

    let mut colony = SimColony::at(longitude, 40.0, config);
    let mut calendar = calendar(seed, config);
    colony.add_colonist(Pawn::colonist(3, "Cy", 0), &mut calendar);
    colony.now = died;
    let corpse = colony.kill_colonist(PawnId(3), Position::new(1, 1), &mut calendar)?;
    colony.bury(corpse, grave_at)?;

    colony.advance(TICKS_PER_YEAR);
    let day = colony.dates().day_of_season(died, longitude).saturating_add(1);
    let origin = panel_origin(1920.0, 800.0);
    let mut painter = RecordingPainter::with_width(1920.0);
    painter.click = slot_rect(origin, day);
    let mut ui = RecordingUi::default();
    calendar.draw(
        800.0,
        &colony,
        &mut SimTextures::default(),
        &mut painter,
        &mut ui,
    );

    ensure!(
        calendar.anniversaries().get(day).iter().any(|r| r.corpse == corpse),
        "no anniversary on day {day} a year after death"
    );
    ensure!(
        painter
            .tooltips
            .iter()
            .any(|(_, text)| text == "🪦 Death Anniversary: Cy"),
        "anniversary tooltip not drawn"
    );
    ensure!(ui.jumps == vec![grave_at], "jumped to {:?}", ui.jumps);
    ensure!(
        ui.messages == vec![("Jumping to Cy's grave.".to_string(), MessageKind::Positive)],
        "messages {:?}",
        ui.messages
    );
    Ok(())
}

pub fn season_rollover(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let start = rng.gen_range(0..16) * TICKS_PER_QUADRUM + 14 * TICKS_PER_DAY + tick_at(23, 0);

    let mut colony = SimColony::at(0.0, 40.0, config);
    colony.now = start;
    let mut calendar = calendar(seed, config);
    let mut twin = CalendarService::new(config.clone(), seed);
    let mut textures = SimTextures::default();
    calendar.frame(&colony, &mut textures)?;
    twin.frame(&colony, &mut textures)?;
    let before = calendar.snapshot().context("no snapshot")?.date;
    ensure!(before.day_of_season == 14, "started on day {}", before.day_of_season);

    colony.advance(2 * TICKS_PER_HOUR);
    let plan = calendar.frame(&colony, &mut textures)?;
    twin.frame(&colony, &mut textures)?;
    let after = calendar.snapshot().context("no snapshot")?.date;
    ensure!(plan.season_changed, "season did not change at the quadrum boundary");
    ensure!(
        plan.birthdays && plan.quests && plan.anniversaries,
        "indices not rebuilt on the new day: {plan:?}"
    );
    ensure!(after.quadrum != before.quadrum, "quadrum stayed {}", after.quadrum);
    ensure!(calendar.palette().len() == 14, "palette has {} marks", calendar.palette().len());
    ensure!(
        calendar.scheduler().last_observed().day == Some(0),
        "last indexed day is {:?}",
        calendar.scheduler().last_observed().day
    );
    ensure!(
        calendar.palette().marks() == twin.palette().marks(),
        "same seed drew different palettes"
    );
    Ok(())
}

fn random_quest(rng: &mut SmallRng, id: u64) -> Quest {
    let mut parts = Vec::new();
    for _ in 0..rng.gen_range(0..4) {
        parts.push(match rng.gen_range(0..6) {
            0 => QuestPart::RandomRaid,
            1 => QuestPart::ShuttleDelay,
            2 => QuestPart::SendShuttleAway,
            3 => QuestPart::RefugeeDelayedReward,
            4 => QuestPart::Other("QuestPart_Letter".to_string()),
            _ => QuestPart::Delay {
                ticks_left: rng.gen_range(0..40 * TICKS_PER_DAY),
            },
        });
    }
    let state = if rng.gen_bool(0.3) {
        QuestState::NotYetAccepted
    } else {
        QuestState::Ongoing
    };
    let mut quest = Quest::new(id, "Sampled", state, parts);
    quest.ticks_until_acceptance_expiry = rng.gen_range(-TICKS_PER_DAY..40 * TICKS_PER_DAY);
    quest
}

/// One year in six-hour steps, checking every index against a fresh rebuild.
pub fn year_sweep(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let longitude = f32::from(rng.gen_range(-180i16..180));
    let latitude = f32::from(rng.gen_range(-60i16..60));
    let mut colony = SimColony::at(longitude, latitude, config);
    let mut calendar = calendar(seed, config);
    for id in 0..8u64 {
        let pawn = Pawn::colonist(id, "Colonist", rng.gen_range(0..60));
        colony.add_colonist(pawn, &mut calendar);
    }
    colony.quests = (0..30).map(|id| random_quest(&mut rng, id)).collect();

    let mut textures = SimTextures::default();
    let steps = TICKS_PER_YEAR / (6 * TICKS_PER_HOUR);
    for _ in 0..steps {
        colony.advance(6 * TICKS_PER_HOUR);
        let plan = calendar.frame(&colony, &mut textures)?;
        let snapshot = FrameSnapshot::capture(&colony)?;
        let date = snapshot.date;
        ensure!(date.hour < 24, "hour {} off the clock", date.hour);

        let quests = index_quest_events(&colony.quests, colony.dates(), &snapshot);
        for (day, entries) in quests.index.iter() {
            for entry in entries {
                let firing = entry.classification.firing_tick.context("unscheduled entry")?;
                ensure!(firing > snapshot.now, "quest {:?} fires in the past", entry.id);
                ensure!(
                    colony.dates().quadrum(firing, longitude) == date.quadrum,
                    "quest {:?} fires outside {}",
                    entry.id,
                    date.quadrum
                );
                ensure!(
                    colony.dates().day_of_season(firing, longitude).saturating_add(1) == day,
                    "quest {:?} filed under the wrong day",
                    entry.id
                );
            }
        }
        ensure!(
            quests == index_quest_events(&colony.quests, colony.dates(), &snapshot),
            "quest reindexing is not idempotent"
        );

        let birthdays = index_birthdays(&colony.colonists, date.quadrum);
        for (day, pawns) in birthdays.index.iter() {
            for pawn in pawns {
                let birth = colony
                    .colonists
                    .iter()
                    .find(|c| c.id == pawn.id)
                    .and_then(|c| c.birth_day_of_year)
                    .context("indexed pawn has no birthday")?;
                ensure!(
                    birth / 15 == date.quadrum.index() && birth % 15 + 1 == day,
                    "birthday {birth} filed under {} day {day}",
                    date.quadrum
                );
            }
        }
        ensure!(
            birthdays == index_birthdays(&colony.colonists, date.quadrum),
            "birthday reindexing is not idempotent"
        );

        if plan.quests {
            ensure!(
                calendar.quest_events() == &quests.index,
                "service quest index diverged on {} day {}",
                date.quadrum,
                date.display_day()
            );
        }
        if plan.birthdays {
            ensure!(
                calendar.birthdays() == &birthdays.index,
                "service birthday index diverged on {} day {}",
                date.quadrum,
                date.display_day()
            );
        }
    }
    Ok(())
}

pub fn panel_contract(seed: u64, config: &CalendarConfig) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let widths = [1280.0, 1920.0, 2560.0];
    let screen_width = widths[rng.gen_range(0..widths.len())];
    let base_y = f32::from(rng.gen_range(400u16..900));

    let mut colony = SimColony::at(0.0, 40.0, config);
    let mut calendar = calendar(seed, config);
    colony.add_colonist(Pawn::colonist(1, "Ada", 4), &mut calendar);
    colony.add_colonist(Pawn::colonist(2, "Bo", 4), &mut calendar);
    colony.now = rng.gen_range(0..4) * TICKS_PER_DAY;

    let origin = panel_origin(screen_width, base_y);
    let mut painter = RecordingPainter::with_width(screen_width);
    painter.click = slot_rect(origin, 5);
    let mut ui = RecordingUi::default();
    let next = calendar.draw(
        base_y,
        &colony,
        &mut SimTextures::default(),
        &mut painter,
        &mut ui,
    );

    let expected_next = base_y - PANEL_SIZE * PANEL_LEAD_FACTOR - PANEL_SIZE * PANEL_TRAIL_FACTOR;
    ensure!((next - expected_next).abs() < 1e-3, "next base y {next}, expected {expected_next}");
    let backdrop = painter.textures.first().context("nothing drawn")?.0;
    ensure!(
        backdrop == Rect::new(origin.0, origin.1, PANEL_SIZE, PANEL_SIZE),
        "backdrop at {backdrop:?}"
    );
    let month = painter.label_rect("Aprimay").context("month label missing")?;
    ensure!(
        month == Rect::new(origin.0, origin.1 + 20.0, PANEL_SIZE, 30.0),
        "month label at {month:?}"
    );
    ensure!(
        ui.menus == vec![vec!["Ada".to_string(), "Bo".to_string()]],
        "menus {:?}",
        ui.menus
    );

    for day in 1..=15u8 {
        let rect = slot_rect(origin, day).context("slot outside the grid")?;
        let centre = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        ensure!(
            slot_at(origin, centre.0, centre.1) == Some(day),
            "hit test missed day {day}"
        );
    }
    Ok(())
}
