//! Search result files
//!
//! Result files are pretty-printed JSON. The `solution`, `LME`,
//! `generations` and `population size` keys are always present; the search
//! configuration and per-generation history are optional so that minimal
//! result files still load.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{GenerationStats, decode_agent};
use crate::{
    Error, Result, agents::RegionBasedAgent, app::SearchConfig, graphs::UndirectedGraph,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Genes of the fittest agent
    pub solution: Vec<u8>,

    /// Log model evidence of the fittest agent
    #[serde(rename = "LME")]
    pub lme: f64,

    /// Generations completed
    pub generations: usize,

    #[serde(rename = "population size")]
    pub population_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SearchConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<GenerationStats>,

    /// Seconds since the Unix epoch when the search finished
    #[serde(default)]
    pub timestamp: u64,

    #[serde(default)]
    pub elapsed_secs: f64,
}

impl SearchResults {
    /// File name encoding the finish time, evidence and search size.
    pub fn filename(&self) -> String {
        format!(
            "results_{}_LME:{}_{}gens_{}pop.json",
            self.timestamp, self.lme as i64, self.generations, self.population_size
        )
        .replace(' ', "_")
    }

    /// Save as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Save into `dir` under [`SearchResults::filename`], creating `dir` if needed.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            operation: format!("create results directory {}", dir.display()),
            source,
        })?;
        let path = dir.join(self.filename());
        self.save(&path)?;
        Ok(path)
    }

    /// Load from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path)?;
        let results = serde_json::from_reader(file)?;
        Ok(results)
    }

    /// Agent encoded by the solution.
    pub fn decode<T: Clone>(&self, graph: &UndirectedGraph<T>) -> Result<RegionBasedAgent<T>> {
        decode_agent(&self.solution, graph)
    }
}

/// Result files in `dir` whose names contain `pattern`, sorted by name.
pub fn find_results<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        operation: format!("read results directory {}", dir.display()),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with("results_") && name.ends_with(".json") && name.contains(pattern) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample() -> SearchResults {
        SearchResults {
            solution: vec![1, 0, 1],
            lme: -1234.56,
            generations: 20,
            population_size: 100,
            config: None,
            history: vec![],
            timestamp: 1_700_000_000,
            elapsed_secs: 1.5,
        }
    }

    #[test]
    fn test_filename_format() {
        assert_eq!(
            sample().filename(),
            "results_1700000000_LME:-1234_20gens_100pop.json"
        );
    }

    #[test]
    fn test_minimal_file_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results_old.json");
        fs::write(
            &path,
            r#"{"solution": [0, 1], "LME": -3.5, "generations": 1, "population size": 4}"#,
        )
        .unwrap();

        let loaded = SearchResults::load(&path).unwrap();
        assert_eq!(loaded.solution, vec![0, 1]);
        assert_eq!(loaded.lme, -3.5);
        assert_eq!(loaded.population_size, 4);
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn test_save_to_dir_and_find() {
        let dir = TempDir::new().unwrap();
        let results_dir = dir.path().join("results");
        let path = sample().save_to_dir(&results_dir).unwrap();
        fs::write(results_dir.join("notes.txt"), "ignored").unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"population size\": 100"));
        assert!(json.contains("\"LME\""));

        assert_eq!(find_results(&results_dir, "100pop").unwrap(), vec![path.clone()]);
        assert!(find_results(&results_dir, "999pop").unwrap().is_empty());
        assert_eq!(SearchResults::load(&path).unwrap(), sample());
    }
}
