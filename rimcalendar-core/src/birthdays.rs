//! Birthday indexing for the current quadrum.
use log::debug;

use crate::clock::Quadrum;
use crate::constants::{DAYS_PER_QUADRUM, DAYS_PER_YEAR};
use crate::day_index::Indexed;
use crate::host::{Pawn, PawnRef};
use crate::numbers::narrow_to_u8;

/// Quadrum and one-based day a birth day-of-year falls on, or `None` when
/// the value is outside the year.
#[must_use]
pub fn birthday_slot(birth_day_of_year: u8) -> Option<(Quadrum, u8)> {
    let day_of_year = i64::from(birth_day_of_year);
    if day_of_year >= i64::from(DAYS_PER_YEAR) {
        return None;
    }
    let quadrum = Quadrum::from_day_of_year(day_of_year);
    let day = narrow_to_u8(day_of_year % i64::from(DAYS_PER_QUADRUM) + 1);
    Some((quadrum, day))
}

/// Index every colonist whose birthday falls in `current`.
///
/// Pawns without an age tracker are ignored.
pub fn index_birthdays<'a, I>(colonists: I, current: Quadrum) -> Indexed<PawnRef>
where
    I: IntoIterator<Item = &'a Pawn>,
{
    let mut out = Indexed::default();
    for pawn in colonists {
        let Some(birth_day_of_year) = pawn.birth_day_of_year else {
            continue;
        };
        let Some((quadrum, day)) = birthday_slot(birth_day_of_year) else {
            debug!(
                "birthday day-of-year {birth_day_of_year} for '{}' is outside the year",
                pawn.label
            );
            continue;
        };
        if quadrum == current {
            out.index.push(day, PawnRef::from(pawn));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PawnId;

    #[test]
    fn birthday_lands_on_its_quadrum_day() {
        let pawns = vec![Pawn::colonist(1, "Ada", 17)];
        let jugust = index_birthdays(&pawns, Quadrum::Jugust);
        assert_eq!(jugust.index.get(3).len(), 1);
        assert_eq!(jugust.index.get(3)[0].id, PawnId(1));

        let septober = index_birthdays(&pawns, Quadrum::Septober);
        assert!(septober.index.is_empty());
    }

    #[test]
    fn shared_birthdays_keep_roster_order() {
        let pawns = vec![
            Pawn::colonist(1, "Ada", 0),
            Pawn::colonist(2, "Bo", 14),
            Pawn::colonist(3, "Cy", 0),
        ];
        let out = index_birthdays(&pawns, Quadrum::Aprimay);
        let labels: Vec<_> = out.index.get(1).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Ada", "Cy"]);
        assert_eq!(out.index.get(15)[0].label, "Bo");
    }

    #[test]
    fn pawns_without_age_tracker_are_skipped() {
        let mut ageless = Pawn::colonist(4, "Mech", 5);
        ageless.birth_day_of_year = None;
        let out = index_birthdays([&ageless], Quadrum::Aprimay);
        assert!(out.index.is_empty());
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn slot_rejects_out_of_year_values() {
        assert_eq!(birthday_slot(59), Some((Quadrum::Decembary, 15)));
        assert_eq!(birthday_slot(60), None);
    }
}
