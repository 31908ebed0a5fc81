//! Result records and per-task persistence.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::sweep::Combination;

/// What one invocation produced: captured stdout on success, the rendered
/// error chain on failure. The results file does not distinguish the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

impl Outcome {
    pub fn from_run(run: Result<String>) -> Self {
        match run {
            Ok(output) => Outcome::Success(output),
            Err(err) => Outcome::Failure(format!("{err:#}")),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Outcome::Success(s) | Outcome::Failure(s) => s,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }
}

/// One row of the results file. Serializes as the 6-element array
/// `[task, node_similarity, ranking_similarity, dataset, model, outcome]`.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub task: String,
    pub node_similarity: String,
    pub ranking_similarity: String,
    pub dataset: String,
    pub model: String,
    pub outcome: Outcome,
}

impl ResultRecord {
    pub fn new(combo: &Combination, outcome: Outcome) -> Self {
        Self {
            task: combo.task.name().to_string(),
            node_similarity: combo.node_similarity.clone(),
            ranking_similarity: combo.ranking_similarity.clone(),
            dataset: combo.dataset.clone(),
            model: combo.model.clone(),
            outcome,
        }
    }
}

impl Serialize for ResultRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(6))?;
        seq.serialize_element(&self.task)?;
        seq.serialize_element(&self.node_similarity)?;
        seq.serialize_element(&self.ranking_similarity)?;
        seq.serialize_element(&self.dataset)?;
        seq.serialize_element(&self.model)?;
        seq.serialize_element(self.outcome.as_text())?;
        seq.end()
    }
}

/// All records for one task, in enumeration order.
#[derive(Debug, Clone)]
pub struct ResultSet {
    task: String,
    records: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_failure()).count()
    }

    /// Serialize the whole set in one write to `<dir>/<task>_results.json`,
    /// overwriting any prior file. A write failure is fatal to the sweep.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}_results.json", self.task));
        let text = serde_json::to_string(&self.records)
            .with_context(|| format!("serializing results for {}", self.task))?;
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
