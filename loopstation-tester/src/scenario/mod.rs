use anyhow::Result;

pub mod catalog;
pub mod soak;

pub type ScenarioFn = fn(u64) -> Result<()>;

/// A named check run against a fresh station for each seed.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    run: ScenarioFn,
}

impl Scenario {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        run: ScenarioFn,
    ) -> Self {
        Self {
            key,
            name,
            description,
            run,
        }
    }

    /// # Errors
    ///
    /// Returns the first expectation the scenario saw violated.
    pub fn run(&self, seed: u64) -> Result<()> {
        (self.run)(seed)
    }
}

pub fn all_scenarios() -> Vec<Scenario> {
    let mut scenarios = catalog::catalog_scenarios();
    scenarios.push(soak::soak_scenario());
    scenarios
}

pub fn get_scenario(key: &str) -> Option<Scenario> {
    all_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

/// Expand `all` into every registered key, keeping other entries as given.
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    if requested.iter().any(|s| s == "all") {
        return all_scenarios()
            .into_iter()
            .map(|scenario| scenario.key.to_string())
            .collect();
    }
    requested.to_vec()
}
