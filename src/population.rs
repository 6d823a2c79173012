//! Population partitions.

use crate::error::SpreadError;
use crate::model::{Individual, Status};

/// The three disjoint partitions of the population.
///
/// Every individual belongs to exactly one partition. All membership changes
/// go through the methods below, which check that an individual's status
/// matches its destination.
#[derive(Debug, Clone)]
pub struct Population {
    susceptible: Vec<Individual>,
    infected: Vec<Individual>,
    recovered: Vec<Individual>,
}

impl Population {
    /// Build the partitions from seed lists, validating each seed's status.
    pub fn new(
        susceptible: Vec<Individual>,
        infected: Vec<Individual>,
    ) -> Result<Self, SpreadError> {
        for person in &susceptible {
            if person.status() != &Status::Susceptible {
                return Err(SpreadError::TypeMismatch {
                    name: person.name().to_owned(),
                    expected: "a susceptible individual",
                });
            }
        }
        for person in &infected {
            if !matches!(person.status(), Status::Infected(_)) {
                return Err(SpreadError::TypeMismatch {
                    name: person.name().to_owned(),
                    expected: "an infected individual",
                });
            }
        }

        Ok(Self {
            susceptible,
            infected,
            recovered: Vec::new(),
        })
    }

    pub fn susceptible(&self) -> &[Individual] {
        &self.susceptible
    }

    pub fn n_susceptible(&self) -> usize {
        self.susceptible.len()
    }

    pub fn n_infected(&self) -> usize {
        self.infected.len()
    }

    pub fn n_recovered(&self) -> usize {
        self.recovered.len()
    }

    /// Names of the currently infected individuals, in partition order.
    ///
    /// The per-day iteration basis: taken at day start, so individuals
    /// infected mid-day neither transmit nor get reprocessed the same day.
    pub fn infected_names(&self) -> Vec<String> {
        self.infected
            .iter()
            .map(|person| person.name().to_owned())
            .collect()
    }

    pub fn infected(&self, name: &str) -> Option<&Individual> {
        self.infected.iter().find(|person| person.name() == name)
    }

    pub fn infected_mut(&mut self, name: &str) -> Option<&mut Individual> {
        self.infected
            .iter_mut()
            .find(|person| person.name() == name)
    }

    pub fn remove_susceptible(&mut self, name: &str) -> Option<Individual> {
        let idx = self
            .susceptible
            .iter()
            .position(|person| person.name() == name)?;
        Some(self.susceptible.remove(idx))
    }

    pub fn remove_infected(&mut self, name: &str) -> Option<Individual> {
        let idx = self
            .infected
            .iter()
            .position(|person| person.name() == name)?;
        Some(self.infected.remove(idx))
    }

    pub fn push_infected(&mut self, person: Individual) -> Result<(), SpreadError> {
        if !matches!(person.status(), Status::Infected(_)) {
            return Err(SpreadError::TypeMismatch {
                name: person.name().to_owned(),
                expected: "an infected individual",
            });
        }
        self.infected.push(person);
        Ok(())
    }

    pub fn push_recovered(&mut self, person: Individual) -> Result<(), SpreadError> {
        if person.status() != &Status::Recovered {
            return Err(SpreadError::TypeMismatch {
                name: person.name().to_owned(),
                expected: "a recovered individual",
            });
        }
        self.recovered.push(person);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Infection;

    fn infection() -> Infection {
        Infection::new(0.5, 3).unwrap()
    }

    #[test]
    fn new_rejects_mismatched_seeds() {
        let result = Population::new(vec![Individual::infected("p1", infection())], vec![]);
        assert_eq!(
            result.err(),
            Some(SpreadError::TypeMismatch {
                name: "p1".into(),
                expected: "a susceptible individual",
            })
        );

        let result = Population::new(vec![], vec![Individual::susceptible("p1")]);
        assert_eq!(
            result.err(),
            Some(SpreadError::TypeMismatch {
                name: "p1".into(),
                expected: "an infected individual",
            })
        );
    }

    #[test]
    fn membership_moves_preserve_the_total() {
        let mut population = Population::new(
            vec![Individual::susceptible("p1"), Individual::susceptible("p2")],
            vec![Individual::infected("p3", infection())],
        )
        .unwrap();

        let person = population.remove_susceptible("p1").unwrap();
        population
            .push_infected(person.promote(infection()).unwrap())
            .unwrap();
        assert_eq!(population.n_susceptible(), 1);
        assert_eq!(population.n_infected(), 2);
        assert_eq!(population.n_recovered(), 0);

        assert!(population.remove_susceptible("p1").is_none());
    }

    #[test]
    fn push_infected_rejects_wrong_status() {
        let mut population = Population::new(vec![], vec![]).unwrap();
        let result = population.push_infected(Individual::susceptible("p1"));
        assert_eq!(
            result,
            Err(SpreadError::TypeMismatch {
                name: "p1".into(),
                expected: "an infected individual",
            })
        );
    }
}
