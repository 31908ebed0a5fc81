use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "redsweep", about = "REDRESS experiment sweep driver", version)]
pub struct Cli {
    /// Run only the named task ("node classification" or "link prediction").
    #[arg(long)]
    pub task: Option<String>,

    /// Print the planned invocations without executing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Directory containing the per-task experiment subdirectories.
    #[arg(long = "experiments-root")]
    pub experiments_root: Option<String>,

    /// Directory the per-task results files are written to.
    #[arg(long = "results-dir")]
    pub results_dir: Option<String>,

    /// Interpreter used to run the experiment scripts.
    #[arg(long)]
    pub python: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
