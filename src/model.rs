//! Core disease model types.

use crate::error::SpreadError;
use rand::prelude::*;
use rand_distr::Binomial;
use serde::{Deserialize, Serialize};

/// Disease parameters carried by an infected individual.
#[derive(Debug, Clone, PartialEq)]
pub struct Infection {
    prob_trans: f64,
    days_to_recover: u32,
}

impl Infection {
    /// Create a new infection with a given daily transmission probability and
    /// number of infectious days.
    pub fn new(prob_trans: f64, days_to_recover: u32) -> Result<Self, SpreadError> {
        if !(0.0..=1.0).contains(&prob_trans) {
            return Err(SpreadError::InvalidProbability(prob_trans));
        }
        Ok(Self {
            prob_trans,
            days_to_recover,
        })
    }
}

/// Disease state of an individual.
///
/// Transitions only move forward: susceptible individuals are promoted to
/// infected, infected individuals whose countdown has reached zero are
/// reclassified to recovered, and recovered is terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Susceptible,
    Infected(Infection),
    Recovered,
}

/// One member of the population.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    name: String,
    status: Status,
}

impl Individual {
    /// Create a susceptible individual.
    pub fn susceptible(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Susceptible,
        }
    }

    /// Create an infected individual.
    pub fn infected(name: impl Into<String>, infection: Infection) -> Self {
        Self {
            name: name.into(),
            status: Status::Infected(infection),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Whether this individual can still transmit the disease.
    pub fn is_infectious(&self) -> bool {
        matches!(&self.status, Status::Infected(inf) if inf.days_to_recover > 0)
    }

    /// Construct the infected counterpart of a susceptible individual.
    pub fn promote(&self, infection: Infection) -> Result<Individual, SpreadError> {
        match &self.status {
            Status::Susceptible => Ok(Individual::infected(self.name.clone(), infection)),
            _ => Err(SpreadError::TypeMismatch {
                name: self.name.clone(),
                expected: "a susceptible individual",
            }),
        }
    }

    /// Construct the recovered counterpart of an infected individual whose
    /// countdown has reached zero.
    pub fn recover(&self) -> Result<Individual, SpreadError> {
        match &self.status {
            Status::Infected(inf) if inf.days_to_recover == 0 => Ok(Individual {
                name: self.name.clone(),
                status: Status::Recovered,
            }),
            Status::Infected(_) => Err(SpreadError::NotFullyRecovered(self.name.clone())),
            _ => Err(SpreadError::TypeMismatch {
                name: self.name.clone(),
                expected: "an infected individual",
            }),
        }
    }

    /// Count down one infectious day.
    pub fn advance_one_day(&mut self) -> Result<(), SpreadError> {
        match &mut self.status {
            Status::Infected(inf) if inf.days_to_recover > 0 => {
                inf.days_to_recover -= 1;
                Ok(())
            }
            Status::Infected(_) | Status::Recovered => {
                Err(SpreadError::AlreadyRecovered(self.name.clone()))
            }
            Status::Susceptible => Err(SpreadError::TypeMismatch {
                name: self.name.clone(),
                expected: "an infected individual",
            }),
        }
    }

    /// Expose every susceptible individual to this infectious one for one day.
    ///
    /// Draws the number of new infections from a binomial distribution with
    /// one trial per susceptible individual, then picks that many distinct
    /// individuals uniformly without replacement. Each pick is promoted with
    /// `defaults`, never with this individual's own parameters.
    ///
    /// Returns the names of the picked individuals (to remove from the
    /// susceptible partition) and their infected counterparts (to append to
    /// the infected partition). Both are empty when the draw is zero.
    pub fn transmit<R: Rng>(
        &self,
        susceptible: &[Individual],
        defaults: &Infection,
        rng: &mut R,
    ) -> Result<(Vec<String>, Vec<Individual>), SpreadError> {
        let infection = match &self.status {
            Status::Infected(inf) if inf.days_to_recover > 0 => inf,
            Status::Infected(_) | Status::Recovered => {
                return Err(SpreadError::AlreadyRecovered(self.name.clone()));
            }
            Status::Susceptible => {
                return Err(SpreadError::TypeMismatch {
                    name: self.name.clone(),
                    expected: "an infected individual",
                });
            }
        };

        let dist = Binomial::new(susceptible.len() as u64, infection.prob_trans)
            .map_err(|_| SpreadError::InvalidProbability(infection.prob_trans))?;
        let n_infected = dist.sample(rng) as usize;

        let mut originals = Vec::with_capacity(n_infected);
        let mut arrivals = Vec::with_capacity(n_infected);
        for person in susceptible.choose_multiple(rng, n_infected) {
            originals.push(person.name.clone());
            arrivals.push(person.promote(defaults.clone())?);
        }

        Ok((originals, arrivals))
    }
}

/// Partition sizes at the end of one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub day: u32,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}
