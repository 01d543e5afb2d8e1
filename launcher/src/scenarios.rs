//! Predefined collection scenarios

use std::time::Duration;

/// One named parameter bundle for a bulk collection run
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub start_year: u16,
    pub end_year: u16,
    pub items: &'static [&'static str],
    pub delay: f64,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "full",
        description: "Full collection (2018-2024, all items)",
        start_year: 2018,
        end_year: 2024,
        items: &["semiconductor", "oil", "copper", "plastic"],
        delay: 1.5,
    },
    Scenario {
        key: "recent",
        description: "Recent data (2022-2024, all items)",
        start_year: 2022,
        end_year: 2024,
        items: &["semiconductor", "oil", "copper", "plastic"],
        delay: 1.0,
    },
    Scenario {
        key: "semiconductor_focus",
        description: "Semiconductor focus (2018-2024)",
        start_year: 2018,
        end_year: 2024,
        items: &["semiconductor"],
        delay: 0.5,
    },
    Scenario {
        key: "energy_materials",
        description: "Energy and raw materials (2018-2024, oil + copper)",
        start_year: 2018,
        end_year: 2024,
        items: &["oil", "copper"],
        delay: 1.0,
    },
    Scenario {
        key: "test",
        description: "Test collection (2023-2024, semiconductor only)",
        start_year: 2023,
        end_year: 2024,
        items: &["semiconductor"],
        delay: 0.5,
    },
];

pub fn find(key: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.key == key)
}

/// Fully resolved parameters for one run (preset or custom)
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub name: String,
    pub start_year: u16,
    pub end_year: u16,
    pub items: Vec<String>,
    pub delay: f64,
}

impl RunPlan {
    /// Estimated request count and wall-clock duration from the delay alone
    pub fn estimate(&self) -> (usize, Duration) {
        let years = (self.end_year - self.start_year + 1) as usize;
        let expanded = shared::expand_items(&self.items);
        let requests = years * expanded.len() * shared::TRADE_PAIRS.len();
        (requests, Duration::from_secs_f64(requests as f64 * self.delay))
    }
}

impl From<&Scenario> for RunPlan {
    fn from(scenario: &Scenario) -> Self {
        Self {
            name: scenario.description.to_string(),
            start_year: scenario.start_year,
            end_year: scenario.end_year,
            items: scenario.items.iter().map(|s| s.to_string()).collect(),
            delay: scenario.delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_key_is_findable() {
        for scenario in SCENARIOS {
            assert!(find(scenario.key).is_some());
        }
        assert!(find("bogus").is_none());
    }

    #[test]
    fn estimate_counts_expanded_items() {
        let plan = RunPlan::from(find("test").unwrap());
        // 2 years x 2 semiconductor codes x 10 pairs
        let (requests, duration) = plan.estimate();
        assert_eq!(requests, 40);
        assert_eq!(duration, Duration::from_secs_f64(20.0));
    }
}
