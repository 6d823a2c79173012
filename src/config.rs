use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub population: PopulationConfig,
    pub disease: DiseaseConfig,
    pub run: RunConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Initial number of susceptible individuals.
    pub susceptible: usize,
    /// Initial number of infected individuals.
    pub infected: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Daily probability that one infected individual infects one susceptible
    /// individual.
    pub prob_trans: f64,
    /// Number of infectious days before recovery.
    pub days_to_recover: u32,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of days to simulate.
    pub days: u32,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.population.susceptible, 0..1_000_000)
            .context("invalid number of susceptible individuals")?;
        check_num(self.population.infected, 1..1_000_000)
            .context("invalid number of infected individuals")?;

        check_num(self.disease.prob_trans, 0.0..=1.0)
            .context("invalid transmission probability")?;
        check_num(self.disease.days_to_recover, 1..10_000)
            .context("invalid number of days to recover")?;

        check_num(self.run.days, 1..10_000).context("invalid number of simulation days")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            population: PopulationConfig {
                susceptible: 20,
                infected: 1,
            },
            disease: DiseaseConfig {
                prob_trans: 0.02,
                days_to_recover: 3,
            },
            run: RunConfig { days: 30 },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut cfg = config();
        cfg.disease.prob_trans = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.disease.days_to_recover = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.population.infected = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_parses_from_toml() {
        let contents = r#"
[population]
susceptible = 20
infected = 1

[disease]
prob_trans = 0.02
days_to_recover = 3

[run]
days = 30
"#;
        let cfg: Config = toml::from_str(contents).unwrap();
        assert_eq!(cfg, config());
    }
}
