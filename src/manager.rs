use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::Engine;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Simulation directory manager.
///
/// A simulation directory holds a `config.toml`, one `trial-NNNN.csv` per
/// completed trial, and the `summary.csv` produced by analysis.
pub struct Manager {
    sim_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(sim_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { sim_dir, cfg })
    }

    /// Run one simulation trial and write its log to the next trial file.
    pub fn run_trial(&self) -> Result<()> {
        let trial_idx = self.count_trial_files().context("failed to count trial files")?;

        let log = Engine::run_with(
            self.cfg.run.days,
            self.cfg.population.susceptible,
            self.cfg.population.infected,
            self.cfg.disease.prob_trans,
            self.cfg.disease.days_to_recover,
        )
        .context("failed to run simulation")?;

        let trial_file = self.trial_file(trial_idx);
        let mut writer = csv::Writer::from_path(&trial_file)
            .with_context(|| format!("failed to create {trial_file:?}"))?;
        for record in &log {
            writer.serialize(record).context("failed to write record")?;
        }
        writer.flush().context("failed to flush writer stream")?;

        log::info!("wrote {trial_file:?}");
        Ok(())
    }

    /// Average all trials per day and write `summary.csv`.
    pub fn analyze_sim(&self) -> Result<()> {
        let n_trials = self.count_trial_files().context("failed to count trial files")?;
        if n_trials == 0 {
            bail!("there are no trial files to analyze");
        }

        let mut analyzer = Analyzer::new();
        for trial_idx in 0..n_trials {
            analyzer
                .add_file(self.trial_file(trial_idx))
                .context("failed to add file")?;
        }

        let summary_file = self.summary_file();
        analyzer
            .save_results(&summary_file)
            .context("failed to save results")?;

        log::info!("wrote {summary_file:?} from {n_trials} trials");
        Ok(())
    }

    /// Remove all generated files, keeping the config.
    pub fn clean_sim(&self) -> Result<()> {
        let n_trials = self.count_trial_files().context("failed to count trial files")?;
        for trial_idx in 0..n_trials {
            let trial_file = self.trial_file(trial_idx);
            fs::remove_file(&trial_file)
                .with_context(|| format!("failed to remove {trial_file:?}"))?;
        }

        let summary_file = self.summary_file();
        if summary_file.exists() {
            fs::remove_file(&summary_file)
                .with_context(|| format!("failed to remove {summary_file:?}"))?;
        }

        Ok(())
    }

    fn count_trial_files(&self) -> Result<usize> {
        let pattern = self.sim_dir.join("trial-*.csv");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let count = glob(pattern)
            .context("failed to glob trial files")?
            .filter_map(Result::ok)
            .count();
        Ok(count)
    }

    fn trial_file(&self, trial_idx: usize) -> PathBuf {
        self.sim_dir.join(format!("trial-{trial_idx:04}.csv"))
    }

    fn summary_file(&self) -> PathBuf {
        self.sim_dir.join("summary.csv")
    }
}
