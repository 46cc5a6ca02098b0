//! Scenarios — the tasks a run can work.
//!
//! A scenario is selected before a run starts and is immutable. Selection is
//! rejected while a run is in progress.

use serde::{Deserialize, Serialize};

/// A task definition the role team works through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Short unique key (e.g. "syslog")
    pub id: String,

    /// Display title
    pub title: String,

    /// One-line summary
    pub description: String,

    /// The concrete problem the team must solve
    pub problem_definition: String,

    /// What this scenario demonstrates
    pub briefing: String,
}

impl Scenario {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        problem_definition: impl Into<String>,
        briefing: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            problem_definition: problem_definition.into(),
            briefing: briefing.into(),
        }
    }
}

/// The built-in scenario catalog.
pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "weather",
            "Smart Weather Alerts",
            "Automatic response to severe weather.",
            "A major storm is approaching a city. The team must cut power in \
             exposed districts and route residents to shelter using current \
             map locations.",
            "Exercises fast-moving data and coordinated safety actions.",
        ),
        Scenario::new(
            "syslog",
            "Automatic Computer Fixer",
            "Detecting and repairing service faults.",
            "A website is returning errors. The team must read the logs, \
             isolate the failing component, and restart it to restore \
             service.",
            "Exercises diagnosis against a history of past fixes.",
        ),
        Scenario::new(
            "ecommerce",
            "Shopping Helper",
            "Stock and price management under demand spikes.",
            "A product goes viral. The team must spot the sell-through rate, \
             reorder stock, and reprice to capture the surge.",
            "Exercises long-horizon planning and commercial trade-offs.",
        ),
    ]
}

/// Look up a catalog scenario by its key.
pub fn find(id: &str) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_three_scenarios_with_unique_ids() {
        let scenarios = catalog();
        assert_eq!(scenarios.len(), 3);
        let mut ids: Vec<_> = scenarios.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn find_by_id() {
        let scenario = find("syslog").unwrap();
        assert_eq!(scenario.title, "Automatic Computer Fixer");
        assert!(find("nope").is_none());
    }
}
