use anyhow::Result;
use rimcalendar_core::CalendarConfig;

pub mod catalog;

/// One scenario iteration: a seed and the calendar configuration under test.
pub type ScenarioFn = fn(u64, &CalendarConfig) -> Result<()>;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub run: ScenarioFn,
}

impl TestScenario {
    const fn new(key: &'static str, name: &'static str, run: ScenarioFn) -> Self {
        Self { key, name, run }
    }
}

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "hour-longitude-0",
            "Local Hour at the Prime Meridian",
            catalog::hour_at_prime_meridian,
        ),
        TestScenario::new(
            "hour-longitude-east",
            "Local Hour Three Zones East",
            catalog::hour_east,
        ),
        TestScenario::new(
            "hour-wrap-west",
            "Local Hour Wrapping Three Zones West",
            catalog::hour_wraps_west,
        ),
        TestScenario::new(
            "quest-classification",
            "Quest Event Classification",
            catalog::quest_classification,
        ),
        TestScenario::new(
            "birthday-index",
            "Birthday Indexing for the Current Quadrum",
            catalog::birthday_index,
        ),
        TestScenario::new(
            "death-anniversary",
            "Death Anniversary a Year Later",
            catalog::death_anniversary,
        ),
        TestScenario::new(
            "season-rollover",
            "Season Rollover and Palette Reshuffle",
            catalog::season_rollover,
        ),
        TestScenario::new(
            "year-sweep",
            "One-Year Sweep Against Fresh Indices",
            catalog::year_sweep,
        ),
        TestScenario::new(
            "panel-contract",
            "Panel Layout and Click Dispatch",
            catalog::panel_contract,
        ),
    ]
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = key.to_lowercase();
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

/// Keys run for `smoke`: the fast, fixed-outcome scenarios.
pub const SMOKE_SCENARIOS: [&str; 4] = [
    "hour-longitude-0",
    "quest-classification",
    "birthday-index",
    "panel-contract",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        let keys: Vec<_> = list_scenarios().into_iter().map(|(key, _)| key).collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(get_scenario("Year-Sweep").unwrap().key, "year-sweep");
        assert!(get_scenario("weather-effects").is_none());
    }

    #[test]
    fn smoke_keys_exist() {
        for key in SMOKE_SCENARIOS {
            assert!(get_scenario(key).is_some(), "{key}");
        }
    }

    #[test]
    fn every_scenario_passes_for_a_fixed_seed() {
        let config = CalendarConfig::default_config();
        for scenario in catalog_scenarios() {
            (scenario.run)(1337, &config)
                .unwrap_or_else(|err| panic!("{} failed: {err:#}", scenario.key));
        }
    }
}
