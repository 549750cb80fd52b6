//! Calendar overlay configuration.
//!
//! The embedded `assets/calendar.json` is the shipped default; hosts and the
//! tester may load an alternate file through [`CalendarConfig::from_json`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{Season, StandardCalendar};
use crate::palette::XMark;
use crate::quest::EventKind;

const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Validation failures for [`CalendarConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("calendar config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("x-mark weight `{field}` must be between 0 and 1 (got {value:.3})")]
    WeightRange { field: &'static str, value: f32 },
    #[error("x-mark weights must sum to 1 (got {sum:.3})")]
    WeightSum { sum: f32 },
    #[error("texture asset name for `{field}` is empty")]
    EmptyAsset { field: &'static str },
    #[error("latitude bands invalid: tropical {tropical:.1} must be below polar {polar:.1}")]
    LatitudeBands { tropical: f32, polar: f32 },
}

/// Draw probabilities for the past-day marker colours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XMarkWeights {
    pub plain: f32,
    pub blue: f32,
    pub red: f32,
}

impl Default for XMarkWeights {
    fn default() -> Self {
        Self {
            plain: 0.40,
            blue: 0.40,
            red: 0.20,
        }
    }
}

impl XMarkWeights {
    #[must_use]
    pub const fn weight(&self, mark: XMark) -> f32 {
        match mark {
            XMark::Plain => self.plain,
            XMark::Blue => self.blue,
            XMark::Red => self.red,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("plain", self.plain), ("blue", self.blue), ("red", self.red)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightRange { field, value });
            }
        }
        let sum = self.plain + self.blue + self.red;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

/// Asset names requested from the host's texture loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureNames {
    pub spring_backdrop: String,
    pub summer_backdrop: String,
    pub fall_backdrop: String,
    pub winter_backdrop: String,
    pub x_plain: String,
    pub x_blue: String,
    pub x_red: String,
    pub birthday: String,
    pub gravestone: String,
    pub raid: String,
    pub shuttle: String,
    pub refugee: String,
    pub timed_event: String,
    pub quest_expiry: String,
}

impl TextureNames {
    /// Backdrop for a season; permanent seasons use their normalized art.
    #[must_use]
    pub fn backdrop(&self, season: Season) -> &str {
        match season.normalized() {
            Season::Summer | Season::PermanentSummer => &self.summer_backdrop,
            Season::Fall => &self.fall_backdrop,
            Season::Winter | Season::PermanentWinter => &self.winter_backdrop,
            Season::Spring => &self.spring_backdrop,
        }
    }

    #[must_use]
    pub fn x_mark(&self, mark: XMark) -> &str {
        match mark {
            XMark::Plain => &self.x_plain,
            XMark::Blue => &self.x_blue,
            XMark::Red => &self.x_red,
        }
    }

    #[must_use]
    pub fn event_icon(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::Raid => &self.raid,
            EventKind::ShuttleArrival | EventKind::ShuttleDeparture => &self.shuttle,
            EventKind::RefugeeDeparture => &self.refugee,
            EventKind::TimedEvent => &self.timed_event,
            EventKind::Expiry => &self.quest_expiry,
        }
    }

    fn fields(&self) -> [(&'static str, &str); 14] {
        [
            ("spring_backdrop", &self.spring_backdrop),
            ("summer_backdrop", &self.summer_backdrop),
            ("fall_backdrop", &self.fall_backdrop),
            ("winter_backdrop", &self.winter_backdrop),
            ("x_plain", &self.x_plain),
            ("x_blue", &self.x_blue),
            ("x_red", &self.x_red),
            ("birthday", &self.birthday),
            ("gravestone", &self.gravestone),
            ("raid", &self.raid),
            ("shuttle", &self.shuttle),
            ("refugee", &self.refugee),
            ("timed_event", &self.timed_event),
            ("quest_expiry", &self.quest_expiry),
        ]
    }

    /// Every asset name, in a stable order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.fields().into_iter().map(|(_, name)| name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.fields().into_iter().find(|(_, name)| name.trim().is_empty()) {
            Some((field, _)) => Err(ConfigError::EmptyAsset { field }),
            None => Ok(()),
        }
    }
}

/// Absolute-latitude thresholds for permanent seasons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatitudeBands {
    pub tropical: f32,
    pub polar: f32,
}

impl Default for LatitudeBands {
    fn default() -> Self {
        Self {
            tropical: 10.0,
            polar: 70.0,
        }
    }
}

/// Complete overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub x_marks: XMarkWeights,
    pub textures: TextureNames,
    #[serde(default)]
    pub latitude_bands: LatitudeBands,
}

impl CalendarConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check weights, asset names and latitude bands.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.x_marks.validate()?;
        self.textures.validate()?;
        let bands = self.latitude_bands;
        if !(bands.tropical >= 0.0 && bands.tropical < bands.polar) {
            return Err(ConfigError::LatitudeBands {
                tropical: bands.tropical,
                polar: bands.polar,
            });
        }
        Ok(())
    }

    /// Reference date primitives using this configuration's latitude bands.
    #[must_use]
    pub const fn reference_calendar(&self) -> StandardCalendar {
        StandardCalendar::new(self.latitude_bands)
    }

    /// The configuration shipped with the crate.
    ///
    /// # Panics
    ///
    /// Panics if the embedded asset is malformed, which the test suite rules out.
    #[must_use]
    pub fn default_config() -> Self {
        Self::from_json(include_str!("../assets/calendar.json"))
            .expect("embedded calendar config is valid")
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_loads() {
        let cfg = CalendarConfig::default_config();
        assert_eq!(cfg.x_marks, XMarkWeights::default());
        assert_eq!(cfg.textures.birthday, "Cake");
        assert_eq!(cfg.textures.backdrop(Season::PermanentWinter), "WinterCalendar");
        assert_eq!(cfg.textures.event_icon(EventKind::ShuttleDeparture), "Shuttle");
        assert_eq!(cfg.textures.all().count(), 14);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut cfg = CalendarConfig::default_config();
        cfg.x_marks.red = 0.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::WeightSum { .. })));
    }

    #[test]
    fn rejects_negative_weight() {
        let mut cfg = CalendarConfig::default_config();
        cfg.x_marks.plain = -0.2;
        cfg.x_marks.blue = 1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::WeightRange { field: "plain", .. })
        ));
    }

    #[test]
    fn rejects_empty_asset_names() {
        let mut cfg = CalendarConfig::default_config();
        cfg.textures.gravestone = "  ".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("gravestone"));
    }

    #[test]
    fn rejects_inverted_latitude_bands() {
        let mut cfg = CalendarConfig::default_config();
        cfg.latitude_bands = LatitudeBands {
            tropical: 80.0,
            polar: 20.0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::LatitudeBands { .. })
        ));
    }

    #[test]
    fn reference_calendar_follows_latitude_bands() {
        use crate::clock::{DatePrimitives, WorldLocation};

        let mut cfg = CalendarConfig::default_config();
        let temperate = WorldLocation::new(0.0, 40.0);
        assert_eq!(cfg.reference_calendar().season(0, temperate), Season::Spring);

        cfg.latitude_bands = LatitudeBands {
            tropical: 80.0,
            polar: 85.0,
        };
        assert_eq!(
            cfg.reference_calendar().season(0, temperate),
            Season::PermanentSummer
        );
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        assert!(matches!(
            CalendarConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_optional_sections_use_defaults() {
        let base = CalendarConfig::default_config();
        let json = serde_json::json!({ "textures": base.textures }).to_string();
        let cfg = CalendarConfig::from_json(&json).unwrap();
        assert_eq!(cfg.latitude_bands, LatitudeBands::default());
        assert_eq!(cfg.x_marks, XMarkWeights::default());
    }
}
