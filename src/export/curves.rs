//! CSV export of learning curves and genetic search history
//!
//! One row per episode (tagged with the learner name) or per generation,
//! written with headers for plotting.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{Result, pipeline::EpisodeSummary, search::GenerationStats};

/// One row of a learning-curve CSV.
#[derive(Debug, Clone, Serialize)]
pub struct CurveRow<'a> {
    pub learner: &'a str,
    pub episode: usize,
    pub steps: usize,
    #[serde(rename = "return")]
    pub total_reward: f64,
    pub reached_goal: bool,
}

/// One row of a search-history CSV.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub generation: usize,
    pub elapsed_secs: f64,
    pub best_lme: f64,
    pub mean_lme: f64,
    pub std_lme: f64,
}

impl From<&GenerationStats> for HistoryRow {
    fn from(stats: &GenerationStats) -> Self {
        Self {
            generation: stats.generation,
            elapsed_secs: stats.elapsed_secs,
            best_lme: stats.best_fitness,
            mean_lme: stats.mean_fitness,
            std_lme: stats.std_fitness,
        }
    }
}

fn write_rows<W: Write, R: Serialize>(writer: W, rows: impl IntoIterator<Item = R>) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write learning curves of one or more learners to a single CSV file.
pub fn write_learning_curve_csv<P: AsRef<Path>>(
    path: P,
    curves: &[(&str, &[EpisodeSummary])],
) -> Result<()> {
    let rows = curves.iter().flat_map(|&(learner, curve)| {
        curve.iter().map(move |e| CurveRow {
            learner,
            episode: e.episode,
            steps: e.steps,
            total_reward: e.total_reward,
            reached_goal: e.reached_goal,
        })
    });
    write_rows(File::create(path)?, rows)
}

/// Write the per-generation statistics of a search.
pub fn write_history_csv<P: AsRef<Path>>(path: P, history: &[GenerationStats]) -> Result<()> {
    write_rows(File::create(path)?, history.iter().map(HistoryRow::from))
}
