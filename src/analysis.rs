use crate::model::Record;
use crate::stats::Accumulator;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::Path;

struct DayStats {
    susceptible: Accumulator,
    infected: Accumulator,
    recovered: Accumulator,
}

impl DayStats {
    fn new() -> Self {
        Self {
            susceptible: Accumulator::new(),
            infected: Accumulator::new(),
            recovered: Accumulator::new(),
        }
    }
}

/// One row of the cross-trial summary table.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub day: u32,
    pub susceptible_mean: f64,
    pub susceptible_std_dev: f64,
    pub infected_mean: f64,
    pub infected_std_dev: f64,
    pub recovered_mean: f64,
    pub recovered_std_dev: f64,
}

/// Per-day averages over a set of simulation trials.
pub struct Analyzer {
    days: Vec<DayStats>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self { days: Vec::new() }
    }

    /// Fold one trial file into the per-day accumulators.
    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let file = file.as_ref();
        let mut reader =
            csv::Reader::from_path(file).with_context(|| format!("failed to open {file:?}"))?;

        for (idx, record) in reader.deserialize().enumerate() {
            let record: Record = record.context("failed to read record")?;
            if record.day as usize != idx + 1 {
                bail!(
                    "days must be consecutive from 1, but row {idx} has day {}",
                    record.day
                );
            }
            self.add_record(&record);
        }

        Ok(())
    }

    fn add_record(&mut self, record: &Record) {
        let idx = record.day as usize - 1;
        while self.days.len() <= idx {
            self.days.push(DayStats::new());
        }

        let stats = &mut self.days[idx];
        stats.susceptible.add(record.susceptible as f64);
        stats.infected.add(record.infected as f64);
        stats.recovered.add(record.recovered as f64);
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        self.days
            .iter()
            .enumerate()
            .map(|(idx, stats)| {
                let susceptible = stats.susceptible.report();
                let infected = stats.infected.report();
                let recovered = stats.recovered.report();
                SummaryRow {
                    day: idx as u32 + 1,
                    susceptible_mean: susceptible.mean,
                    susceptible_std_dev: susceptible.std_dev,
                    infected_mean: infected.mean,
                    infected_std_dev: infected.std_dev,
                    recovered_mean: recovered.mean,
                    recovered_std_dev: recovered.std_dev,
                }
            })
            .collect()
    }

    /// Write the summary table as CSV.
    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let mut writer =
            csv::Writer::from_path(file).with_context(|| format!("failed to create {file:?}"))?;

        for row in self.summary() {
            writer.serialize(row).context("failed to write summary row")?;
        }

        writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }
}
