//! Sweep grid: tasks, dimension configuration, and combination enumeration.

use anyhow::{bail, Result};

use crate::config::Config;

/// Experiment family. Selects the dispatch pattern and the subdirectory
/// the experiment scripts live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    NodeClassification,
    LinkPrediction,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::NodeClassification => "node classification",
            Task::LinkPrediction => "link prediction",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "node classification" => Some(Task::NodeClassification),
            "link prediction" => Some(Task::LinkPrediction),
            _ => None,
        }
    }
}

/// Dimension values for one task's sweep.
///
/// Field order is the nesting order of enumeration: `node_similarity`
/// varies slowest, `model` fastest.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub node_similarity: Vec<String>,
    pub ranking_similarity: Vec<String>,
    pub dataset: Vec<String>,
    pub model: Vec<String>,
}

impl SweepConfig {
    /// Dimension values for `task`, from config keys with built-in defaults.
    pub fn from_config(cfg: &Config, task: Task) -> Self {
        let prefix = match task {
            Task::NodeClassification => "NC",
            Task::LinkPrediction => "LP",
        };
        Self {
            node_similarity: cfg.values(&format!("{prefix}_NODE_SIMILARITY")),
            ranking_similarity: cfg.values(&format!("{prefix}_RANKING_SIMILARITY")),
            dataset: cfg.values(&format!("{prefix}_DATASETS")),
            model: cfg.values(&format!("{prefix}_MODELS")),
        }
    }

    /// Every dimension must be non-empty for a sweep to run.
    pub fn validate(&self) -> Result<()> {
        for (name, dim) in self.dimensions() {
            if dim.is_empty() {
                bail!("dimension {} has no values", name);
            }
        }
        Ok(())
    }

    pub fn combination_count(&self) -> usize {
        self.dimensions().iter().map(|(_, d)| d.len()).product()
    }

    pub fn combinations(&self, task: Task) -> Combinations<'_> {
        Combinations::new(task, self)
    }

    fn dimensions(&self) -> [(&'static str, &[String]); 4] {
        [
            ("node_similarity", &self.node_similarity),
            ("ranking_similarity", &self.ranking_similarity),
            ("dataset", &self.dataset),
            ("model", &self.model),
        ]
    }
}

/// One fully-specified experiment parameterization. Immutable; consumed
/// exactly once by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub task: Task,
    pub node_similarity: String,
    pub ranking_similarity: String,
    pub dataset: String,
    pub model: String,
}

/// Lazy Cartesian product over the four dimensions.
///
/// Counts through the grid odometer-style, innermost digit first. Pure
/// function of the configuration: re-creating the iterator yields the
/// identical sequence. Duplicate dimension values produce duplicate
/// combinations.
pub struct Combinations<'a> {
    task: Task,
    config: &'a SweepConfig,
    indices: [usize; 4],
    exhausted: bool,
}

impl<'a> Combinations<'a> {
    fn new(task: Task, config: &'a SweepConfig) -> Self {
        let exhausted = config.dimensions().iter().any(|(_, d)| d.is_empty());
        Self {
            task,
            config,
            indices: [0; 4],
            exhausted,
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.exhausted {
            return None;
        }
        let [ns, rs, d, m] = self.indices;
        let item = Combination {
            task: self.task,
            node_similarity: self.config.node_similarity[ns].clone(),
            ranking_similarity: self.config.ranking_similarity[rs].clone(),
            dataset: self.config.dataset[d].clone(),
            model: self.config.model[m].clone(),
        };

        // Increment indices like counting with mixed radix, model fastest
        let dims = self.config.dimensions();
        let mut carry = true;
        for i in (0..self.indices.len()).rev() {
            if carry {
                self.indices[i] += 1;
                if self.indices[i] >= dims[i].1.len() {
                    self.indices[i] = 0;
                    // carry remains true
                } else {
                    carry = false;
                }
            }
        }
        if carry {
            self.exhausted = true;
        }

        Some(item)
    }
}
