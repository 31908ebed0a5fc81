//! Invocation planning: maps a combination onto a concrete script call.

use std::path::{Path, PathBuf};

use crate::sweep::{Combination, Task};

/// A fully-resolved external invocation: interpreter, script, argument
/// vector, and working directory. Arguments are passed to the process
/// verbatim, never through a shell.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub script: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

impl Invocation {
    /// Human-readable command line for progress output and --dry-run.
    pub fn command_line(&self) -> String {
        let mut line = format!("{} {}", self.program, self.script);
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Resolve the script and arguments for one combination.
///
/// Node classification runs `REDRESS_<node>_<ranking>.py` with both
/// `--dataset` and `--model`; link prediction runs
/// `<model>_<node>_<ranking>.py` (model lowercased) with `--dataset` only.
/// Scripts live under the task-named subdirectory of `experiments_root`.
pub fn plan(combo: &Combination, experiments_root: &Path, python: &str) -> Invocation {
    let workdir = experiments_root.join(combo.task.name());
    match combo.task {
        Task::NodeClassification => Invocation {
            program: python.to_string(),
            script: format!(
                "REDRESS_{}_{}.py",
                combo.node_similarity, combo.ranking_similarity
            ),
            args: vec![
                "--dataset".into(),
                combo.dataset.clone(),
                "--model".into(),
                combo.model.clone(),
            ],
            workdir,
        },
        Task::LinkPrediction => Invocation {
            program: python.to_string(),
            script: format!(
                "{}_{}_{}.py",
                combo.model.to_lowercase(),
                combo.node_similarity,
                combo.ranking_similarity
            ),
            args: vec!["--dataset".into(), combo.dataset.clone()],
            workdir,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(task: Task) -> Combination {
        Combination {
            task,
            node_similarity: "feature".into(),
            ranking_similarity: "NDCG".into(),
            dataset: "ACM".into(),
            model: "GCN".into(),
        }
    }

    #[test]
    fn node_classification_selects_redress_script() {
        let inv = plan(&combo(Task::NodeClassification), Path::new("/exp"), "python");
        assert_eq!(inv.script, "REDRESS_feature_NDCG.py");
        assert_eq!(inv.args, ["--dataset", "ACM", "--model", "GCN"]);
        assert_eq!(inv.workdir, Path::new("/exp/node classification"));
    }

    #[test]
    fn link_prediction_selects_lowercased_model_script() {
        let inv = plan(&combo(Task::LinkPrediction), Path::new("/exp"), "python");
        assert_eq!(inv.script, "gcn_feature_NDCG.py");
        assert_eq!(inv.args, ["--dataset", "ACM"]);
        assert_eq!(inv.workdir, Path::new("/exp/link prediction"));
    }

    #[test]
    fn command_line_renders_program_script_and_args() {
        let inv = plan(&combo(Task::LinkPrediction), Path::new("."), "python3");
        assert_eq!(inv.command_line(), "python3 gcn_feature_NDCG.py --dataset ACM");
    }
}
