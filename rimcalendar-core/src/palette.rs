//! Past-day markers.
//!
//! Each season gets fourteen markers drawn independently from the weighted
//! palette; the stream is seeded so a given seed replays the same seasons.
use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::XMarkWeights;
use crate::constants::X_MARKS_PER_SEASON;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XMark {
    Plain,
    Blue,
    Red,
}

impl XMark {
    pub const ALL: [Self; 3] = [Self::Plain, Self::Blue, Self::Red];
}

/// Draw one marker against the cumulative weights.
pub fn draw_mark<R: Rng + ?Sized>(rng: &mut R, weights: &XMarkWeights) -> XMark {
    let roll: f32 = rng.r#gen();
    if roll < weights.plain {
        XMark::Plain
    } else if roll < weights.plain + weights.blue {
        XMark::Blue
    } else {
        XMark::Red
    }
}

/// Domain-separated seed for one random stream.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// The current season's markers plus the stream they are drawn from.
#[derive(Debug, Clone)]
pub struct XMarkPalette {
    rng: ChaCha20Rng,
    marks: Vec<XMark>,
}

impl XMarkPalette {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"x-marks")),
            marks: Vec::with_capacity(X_MARKS_PER_SEASON),
        }
    }

    /// Discard the current markers and draw a fresh season's worth.
    pub fn reshuffle(&mut self, weights: &XMarkWeights) {
        self.marks.clear();
        for _ in 0..X_MARKS_PER_SEASON {
            let mark = draw_mark(&mut self.rng, weights);
            self.marks.push(mark);
        }
    }

    /// Marker for a zero-based day of the season.
    #[must_use]
    pub fn mark_for(&self, day_of_season: usize) -> Option<XMark> {
        self.marks.get(day_of_season).copied()
    }

    #[must_use]
    pub fn marks(&self) -> &[XMark] {
        &self.marks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SIZE: usize = 30_000;
    // χ² critical value for 2 degrees of freedom at p = 0.001.
    const CHI_SQUARED_LIMIT: f64 = 13.82;

    #[test]
    fn reshuffle_fills_a_season() {
        let mut palette = XMarkPalette::from_seed(7);
        assert!(palette.is_empty());
        palette.reshuffle(&XMarkWeights::default());
        assert_eq!(palette.len(), X_MARKS_PER_SEASON);
        assert!(palette.mark_for(13).is_some());
        assert!(palette.mark_for(14).is_none());
        palette.reshuffle(&XMarkWeights::default());
        assert_eq!(palette.len(), X_MARKS_PER_SEASON);
    }

    #[test]
    fn same_seed_replays_the_same_seasons() {
        let weights = XMarkWeights::default();
        let mut a = XMarkPalette::from_seed(0xBEEF);
        let mut b = XMarkPalette::from_seed(0xBEEF);
        for _ in 0..3 {
            a.reshuffle(&weights);
            b.reshuffle(&weights);
            assert_eq!(a.marks(), b.marks());
        }
    }

    #[test]
    fn degenerate_weights_pick_one_colour() {
        let mut palette = XMarkPalette::from_seed(1);
        palette.reshuffle(&XMarkWeights {
            plain: 0.0,
            blue: 0.0,
            red: 1.0,
        });
        assert!(palette.marks().iter().all(|mark| *mark == XMark::Red));
    }

    #[test]
    fn draws_match_weights_under_chi_squared() {
        let weights = XMarkWeights::default();
        let mut rng = ChaCha20Rng::seed_from_u64(derive_stream_seed(42, b"chi"));
        let mut counts = [0usize; 3];
        for _ in 0..SAMPLE_SIZE {
            let idx = match draw_mark(&mut rng, &weights) {
                XMark::Plain => 0,
                XMark::Blue => 1,
                XMark::Red => 2,
            };
            counts[idx] += 1;
        }
        let total = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
        let chi_squared: f64 = XMark::ALL
            .iter()
            .zip(counts)
            .map(|(mark, count)| {
                let expected = total * f64::from(weights.weight(*mark));
                let observed = f64::from(u32::try_from(count).expect("count fits"));
                (observed - expected).powi(2) / expected
            })
            .sum();
        assert!(
            chi_squared < CHI_SQUARED_LIMIT,
            "x-mark draws drifted: chi^2 = {chi_squared:.3}, counts {counts:?}"
        );
    }

    #[test]
    fn stream_seeds_are_domain_separated() {
        assert_ne!(derive_stream_seed(1, b"x-marks"), derive_stream_seed(1, b"other"));
        assert_eq!(derive_stream_seed(1, b"x-marks"), derive_stream_seed(1, b"x-marks"));
    }
}
