//! Simulation engine.

use crate::error::SpreadError;
use crate::model::{Individual, Infection, Record};
use crate::population::Population;
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;

/// Simulation engine.
///
/// Owns the population partitions, the day counter, the per-day log and the
/// random number generator, and advances the outbreak one day at a time.
pub struct Engine {
    population: Population,
    defaults: Infection,
    current_day: u32,
    sim_days: Option<u32>,
    log: Vec<Record>,
    rng: ChaCha12Rng,
}

impl Engine {
    /// Create a new `Engine` from seed partitions.
    ///
    /// The seed lists are validated and owned by the engine. `defaults` are
    /// the disease parameters given to every newly infected individual,
    /// regardless of who infected them.
    pub fn new(
        susceptible: Vec<Individual>,
        infected: Vec<Individual>,
        defaults: Infection,
    ) -> Result<Self> {
        let rng = ChaCha12Rng::try_from_os_rng()?;
        Self::with_rng(susceptible, infected, defaults, rng)
    }

    /// Create a new `Engine` with a caller-supplied random number generator.
    pub fn with_rng(
        susceptible: Vec<Individual>,
        infected: Vec<Individual>,
        defaults: Infection,
        rng: ChaCha12Rng,
    ) -> Result<Self> {
        let population = Population::new(susceptible, infected)
            .context("failed to build population partitions")?;

        Ok(Self {
            population,
            defaults,
            current_day: 0,
            sim_days: None,
            log: Vec::new(),
            rng,
        })
    }

    /// The per-day log, one row per completed day, day ascending from 1.
    pub fn log(&self) -> &[Record] {
        &self.log
    }

    /// Simulate one day.
    ///
    /// Every individual infected at day start interacts with the current
    /// susceptible partition, then counts down one infectious day and moves
    /// to the recovered partition when the countdown reaches zero. New
    /// infections join the infected partition at day end. An empty infected
    /// partition is not an error: the day is logged with unchanged counts.
    pub fn step(&mut self) -> Result<()> {
        // Work on a copy so a failed day leaves the previous state intact.
        let mut population = self.population.clone();

        let today = population.infected_names();
        let mut arrivals = Vec::new();

        for name in &today {
            let carrier = population
                .infected(name)
                .with_context(|| format!("{name} is missing from the infected partition"))?;
            let (originals, new_infected) =
                carrier.transmit(population.susceptible(), &self.defaults, &mut self.rng)?;

            for original in &originals {
                population.remove_susceptible(original).with_context(|| {
                    format!("{original} is missing from the susceptible partition")
                })?;
                log::debug!(
                    "day {}: {original} was infected by {name}",
                    self.current_day + 1
                );
            }
            arrivals.extend(new_infected);

            let carrier = population
                .infected_mut(name)
                .with_context(|| format!("{name} is missing from the infected partition"))?;
            carrier.advance_one_day()?;
            if !carrier.is_infectious() {
                let original = population
                    .remove_infected(name)
                    .with_context(|| format!("{name} is missing from the infected partition"))?;
                population.push_recovered(original.recover()?)?;
                log::debug!("day {}: {name} has recovered", self.current_day + 1);
            }
        }

        for person in arrivals {
            population.push_infected(person)?;
        }

        self.population = population;
        self.current_day += 1;
        self.log.push(Record {
            day: self.current_day,
            susceptible: self.population.n_susceptible(),
            infected: self.population.n_infected(),
            recovered: self.population.n_recovered(),
        });

        if self.population.n_infected() == 0 {
            log::debug!("day {}: the outbreak is over", self.current_day);
        }

        Ok(())
    }

    /// Run the simulation for `days` more days.
    ///
    /// `None` reuses the previously configured day count and fails with
    /// [`SpreadError::MissingConfiguration`] if there is none. The day
    /// counter is preserved across calls: running again continues the
    /// outbreak, it does not restart it.
    pub fn run(&mut self, days: Option<u32>) -> Result<()> {
        let days = match days {
            Some(days) => {
                self.sim_days = Some(days);
                days
            }
            None => self
                .sim_days
                .ok_or(SpreadError::MissingConfiguration("number of simulation days"))?,
        };

        for _ in 0..days {
            self.step().context("failed to simulate day")?;
        }

        Ok(())
    }

    /// Seed a population, run it for `days` days, and return the log.
    ///
    /// Susceptible individuals are named `p1..pN`, infected seeds continue
    /// the sequence, so names never collide.
    pub fn run_with(
        days: u32,
        n_susceptible: usize,
        n_infected: usize,
        prob_trans: f64,
        days_to_recover: u32,
    ) -> Result<Vec<Record>> {
        let defaults = Infection::new(prob_trans, days_to_recover)?;

        let susceptible = (0..n_susceptible)
            .map(|idx| Individual::susceptible(format!("p{}", idx + 1)))
            .collect();
        let infected = (0..n_infected)
            .map(|idx| Individual::infected(format!("p{}", n_susceptible + idx + 1), defaults.clone()))
            .collect();

        let mut engine = Self::new(susceptible, infected, defaults)?;
        engine.run(Some(days))?;

        Ok(engine.log().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(n_susceptible: usize, n_infected: usize, prob_trans: f64, days: u32) -> Engine {
        let defaults = Infection::new(prob_trans, days).unwrap();
        let susceptible = (0..n_susceptible)
            .map(|idx| Individual::susceptible(format!("p{}", idx + 1)))
            .collect();
        let infected = (0..n_infected)
            .map(|idx| {
                Individual::infected(format!("p{}", n_susceptible + idx + 1), defaults.clone())
            })
            .collect();
        Engine::with_rng(
            susceptible,
            infected,
            defaults,
            ChaCha12Rng::seed_from_u64(42),
        )
        .unwrap()
    }

    #[test]
    fn certain_transmission_one_day() {
        // 1 susceptible, 1 infected, p = 1.0, 1 day to recover. After day 1
        // the original has recovered and its single victim is infected.
        let mut engine = engine(1, 1, 1.0, 1);
        engine.step().unwrap();

        assert_eq!(
            engine.log(),
            &[Record {
                day: 1,
                susceptible: 0,
                infected: 1,
                recovered: 1,
            }]
        );
    }

    #[test]
    fn zero_transmission_two_days() {
        let mut engine = engine(5, 1, 0.0, 2);

        engine.step().unwrap();
        assert_eq!(
            engine.log().last().unwrap(),
            &Record {
                day: 1,
                susceptible: 5,
                infected: 1,
                recovered: 0,
            }
        );

        engine.step().unwrap();
        assert_eq!(
            engine.log().last().unwrap(),
            &Record {
                day: 2,
                susceptible: 5,
                infected: 0,
                recovered: 1,
            }
        );
    }

    #[test]
    fn recovery_lands_exactly_on_the_countdown_day() {
        let mut engine = engine(0, 1, 0.0, 3);
        engine.run(Some(3)).unwrap();

        assert_eq!(engine.log()[1].recovered, 0);
        assert_eq!(engine.log()[2].recovered, 1);
        assert_eq!(engine.log()[2].infected, 0);
    }

    #[test]
    fn population_is_conserved_and_counts_are_monotone() {
        let mut engine = engine(50, 3, 0.3, 4);
        engine.run(Some(20)).unwrap();
        assert_eq!(engine.log().len(), 20);

        let mut prev = Record {
            day: 0,
            susceptible: 50,
            infected: 3,
            recovered: 0,
        };
        for record in engine.log() {
            assert_eq!(record.susceptible + record.infected + record.recovered, 53);
            assert!(record.susceptible <= prev.susceptible);
            assert!(record.recovered >= prev.recovered);
            prev = record.clone();
        }
    }

    #[test]
    fn step_with_no_infected_logs_unchanged_counts() {
        let mut engine = engine(5, 1, 0.0, 1);
        engine.step().unwrap();
        assert_eq!(engine.log().last().unwrap().infected, 0);

        // The outbreak is over, but stepping on is not an error.
        engine.step().unwrap();
        assert_eq!(
            engine.log().last().unwrap(),
            &Record {
                day: 2,
                susceptible: 5,
                infected: 0,
                recovered: 1,
            }
        );
    }

    #[test]
    fn run_without_a_day_count_fails() {
        let mut engine = engine(5, 1, 0.5, 2);
        let error = engine.run(None).unwrap_err();
        assert_eq!(
            error.downcast_ref::<SpreadError>(),
            Some(&SpreadError::MissingConfiguration(
                "number of simulation days"
            ))
        );
    }

    #[test]
    fn run_continues_from_the_current_day() {
        let mut engine = engine(10, 1, 0.2, 3);
        engine.run(Some(2)).unwrap();
        assert_eq!(engine.log().last().unwrap().day, 2);

        // A later call reuses the configured count and keeps counting days.
        engine.run(None).unwrap();
        assert_eq!(engine.log().len(), 4);
        assert_eq!(engine.log().last().unwrap().day, 4);
    }

    #[test]
    fn run_with_returns_the_full_log() {
        let log = Engine::run_with(10, 20, 1, 0.02, 3).unwrap();
        assert_eq!(log.len(), 10);
        assert_eq!(log[0].day, 1);
        for record in &log {
            assert_eq!(record.susceptible + record.infected + record.recovered, 21);
        }
    }
}
