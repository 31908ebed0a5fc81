//! Sweep execution: one blocking child process per combination, with
//! failures isolated per record.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::{
    dispatch::{self, Invocation},
    results::{Outcome, ResultRecord, ResultSet},
    sweep::{SweepConfig, Task},
};

/// Anything that can run one invocation to completion and hand back its
/// textual output. Production uses [`ProcessRunner`]; tests substitute
/// in-process stubs.
pub trait Runnable {
    fn execute(&self, invocation: &Invocation) -> Result<String>;
}

impl<F> Runnable for F
where
    F: Fn(&Invocation) -> Result<String>,
{
    fn execute(&self, invocation: &Invocation) -> Result<String> {
        self(invocation)
    }
}

/// Runs the invocation as a child process and blocks until it exits.
/// No timeout: a script that never terminates stalls the sweep.
pub struct ProcessRunner;

impl Runnable for ProcessRunner {
    fn execute(&self, invocation: &Invocation) -> Result<String> {
        let output = Command::new(&invocation.program)
            .arg(&invocation.script)
            .args(&invocation.args)
            .current_dir(&invocation.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("spawning {}", invocation.command_line()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                bail!("{} failed with {}", invocation.script, output.status);
            }
            bail!(
                "{} failed with {}: {}",
                invocation.script,
                output.status,
                detail
            );
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("decoding output of {}", invocation.script))
    }
}

/// Drives one task's sweep: enumerate, dispatch, record, persist.
pub struct SweepRunner<R: Runnable> {
    runnable: R,
    experiments_root: PathBuf,
    python: String,
    color: bool,
}

impl<R: Runnable> SweepRunner<R> {
    pub fn new(runnable: R, experiments_root: PathBuf, python: String) -> Self {
        Self {
            runnable,
            experiments_root,
            python,
            color: io::stdout().is_terminal(),
        }
    }

    /// Execute every combination of `config` for `task`, in enumeration
    /// order. Each combination yields exactly one record whether its
    /// invocation succeeds or fails; a failure never stops the sweep.
    pub fn run(&self, task: Task, config: &SweepConfig) -> Result<ResultSet> {
        config
            .validate()
            .with_context(|| format!("sweep config for {}", task.name()))?;

        let total = config.combination_count();
        let mut results = ResultSet::new(task.name());
        for (i, combo) in config.combinations(task).enumerate() {
            let invocation = dispatch::plan(&combo, &self.experiments_root, &self.python);
            println!("[{}/{}] {}", i + 1, total, invocation.command_line());

            let started = Instant::now();
            let outcome = Outcome::from_run(self.runnable.execute(&invocation));
            self.report(&outcome, started.elapsed());
            results.push(ResultRecord::new(&combo, outcome));
        }
        Ok(results)
    }

    fn report(&self, outcome: &Outcome, elapsed: Duration) {
        let line = match outcome {
            Outcome::Failure(msg) => format!(
                "  failed in {:.1?}: {}",
                elapsed,
                msg.lines().next().unwrap_or("")
            ),
            Outcome::Success(_) => format!("  ok in {:.1?}", elapsed),
        };
        if !self.color {
            println!("{}", line);
        } else if outcome.is_failure() {
            println!("{}", line.red());
        } else {
            println!("{}", line.green());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::fs;

    fn single_combo_config() -> SweepConfig {
        SweepConfig {
            node_similarity: vec!["feature".into()],
            ranking_similarity: vec!["NDCG".into()],
            dataset: vec!["ACM".into()],
            model: vec!["SGC".into()],
        }
    }

    fn runner<R: Runnable>(runnable: R) -> SweepRunner<R> {
        SweepRunner::new(runnable, PathBuf::from("."), "python".into())
    }

    #[test]
    fn all_succeed_persists_single_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let sweep = runner(|_: &Invocation| Ok("ok".to_string()));
        let results = sweep
            .run(Task::NodeClassification, &single_combo_config())
            .unwrap();
        let path = results.save(dir.path()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "node classification_results.json"
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"[["node classification","feature","NDCG","ACM","SGC","ok"]]"#
        );
    }

    #[test]
    fn failure_is_recorded_and_sweep_continues() {
        let calls = RefCell::new(0usize);
        let stub = |_: &Invocation| {
            let mut n = calls.borrow_mut();
            *n += 1;
            if *n == 1 {
                Err(anyhow!("boom"))
            } else {
                Ok("ok".to_string())
            }
        };
        let config = SweepConfig {
            model: vec!["SGC".into(), "GCN".into()],
            ..single_combo_config()
        };

        let results = runner(stub).run(Task::NodeClassification, &config).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.failures(), 1);
        assert_eq!(results.records()[0].outcome.as_text(), "boom");
        assert_eq!(results.records()[1].outcome.as_text(), "ok");
    }

    #[test]
    fn one_record_per_combination_in_enumeration_order() {
        let config = SweepConfig {
            node_similarity: vec!["feature".into(), "structural".into()],
            ranking_similarity: vec!["NDCG".into(), "ERR".into()],
            dataset: vec!["BlogCatalog".into()],
            model: vec!["GCN".into()],
        };
        let sweep = runner(|inv: &Invocation| Ok(inv.script.clone()));
        let results = sweep.run(Task::LinkPrediction, &config).unwrap();

        assert_eq!(results.len(), 4);
        let scripts: Vec<&str> = results
            .records()
            .iter()
            .map(|r| r.outcome.as_text())
            .collect();
        assert_eq!(
            scripts,
            [
                "gcn_feature_NDCG.py",
                "gcn_feature_ERR.py",
                "gcn_structural_NDCG.py",
                "gcn_structural_ERR.py",
            ]
        );
    }

    #[test]
    fn empty_dimension_refuses_to_run() {
        let config = SweepConfig {
            dataset: vec![],
            ..single_combo_config()
        };
        let sweep = runner(|_: &Invocation| Ok(String::new()));
        assert!(sweep.run(Task::NodeClassification, &config).is_err());
    }

    #[test]
    fn persistence_failure_leaves_earlier_task_file_intact() {
        let dir = tempfile::tempdir().unwrap();

        let first = runner(|_: &Invocation| Ok("ok".to_string()))
            .run(Task::NodeClassification, &single_combo_config())
            .unwrap();
        let first_path = first.save(dir.path()).unwrap();

        let second = runner(|_: &Invocation| Ok("ok".to_string()))
            .run(Task::LinkPrediction, &single_combo_config())
            .unwrap();
        let missing = dir.path().join("missing");
        assert!(second.save(&missing).is_err());

        assert!(first_path.exists());
        assert!(!missing.join("link prediction_results.json").exists());
    }

    #[test]
    fn missing_program_failure_is_captured_not_fatal() {
        let config = single_combo_config();
        let sweep = SweepRunner::new(
            ProcessRunner,
            PathBuf::from("."),
            "redsweep-no-such-interpreter".into(),
        );
        let results = sweep.run(Task::NodeClassification, &config).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.records()[0].outcome.is_failure());
        assert!(results.records()[0]
            .outcome
            .as_text()
            .contains("REDRESS_feature_NDCG.py"));
    }
}
