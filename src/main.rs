mod cli;
mod config;
mod dispatch;
mod results;
mod runner;
mod sweep;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::Config;
use runner::{ProcessRunner, SweepRunner};
use sweep::{SweepConfig, Task};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let cfg = Config::load();

    // CLI overrides config; config falls back to built-in defaults
    let experiments_root = args
        .experiments_root
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.experiments_root());
    let results_dir = args
        .results_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.results_dir());
    let python = args.python.clone().unwrap_or_else(|| cfg.python_bin());

    let tasks: Vec<Task> = match args.task.as_deref() {
        Some(name) => match Task::from_name(name) {
            Some(task) => vec![task],
            None => bail!(
                "unknown task: {} (expected \"node classification\" or \"link prediction\")",
                name
            ),
        },
        None => vec![Task::NodeClassification, Task::LinkPrediction],
    };

    if args.dry_run {
        for task in &tasks {
            let config = SweepConfig::from_config(&cfg, *task);
            config
                .validate()
                .with_context(|| format!("sweep config for {}", task.name()))?;
            for combo in config.combinations(*task) {
                let inv = dispatch::plan(&combo, &experiments_root, &python);
                println!("{}: {}", inv.workdir.display(), inv.command_line());
            }
        }
        return Ok(());
    }

    let sweep_runner = SweepRunner::new(ProcessRunner, experiments_root, python);
    for task in tasks {
        let config = SweepConfig::from_config(&cfg, task);
        let results = sweep_runner.run(task, &config)?;
        let path = results.save(&results_dir)?;
        println!(
            "{}: {} combinations, {} failed -> {}",
            task.name(),
            results.len(),
            results.failures(),
            path.display()
        );
    }

    Ok(())
}
