use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .redsweeprc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().flatten() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    /// Comma-separated list value. Blank entries are dropped.
    pub fn values(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn experiments_root(&self) -> PathBuf {
        PathBuf::from(self.get("EXPERIMENTS_ROOT").unwrap_or_else(|| ".".into()))
    }

    pub fn results_dir(&self) -> PathBuf {
        PathBuf::from(self.get("RESULTS_PATH").unwrap_or_else(|| ".".into()))
    }

    pub fn python_bin(&self) -> String {
        self.get("PYTHON_BIN").unwrap_or_else(|| "python".into())
    }
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or REDSWEEP_* for forward-compat
    const KEYS: &[&str] = &[
        "EXPERIMENTS_ROOT",
        "RESULTS_PATH",
        "PYTHON_BIN",
        "NC_DATASETS",
        "NC_MODELS",
        "NC_NODE_SIMILARITY",
        "NC_RANKING_SIMILARITY",
        "LP_DATASETS",
        "LP_MODELS",
        "LP_NODE_SIMILARITY",
        "LP_RANKING_SIMILARITY",
    ];

    KEYS.contains(&k) || k.starts_with("REDSWEEP_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("redsweep").join(".redsweeprc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Paths
    m.insert("EXPERIMENTS_ROOT".into(), ".".into());
    m.insert("RESULTS_PATH".into(), ".".into());
    m.insert("PYTHON_BIN".into(), "python".into());

    // Node classification grid
    m.insert("NC_DATASETS".into(), "ACM,coauthor-cs,coauthor-phy".into());
    m.insert("NC_MODELS".into(), "SGC,GCN".into());
    m.insert("NC_NODE_SIMILARITY".into(), "feature,structural".into());
    m.insert("NC_RANKING_SIMILARITY".into(), "NDCG,ERR".into());

    // Link prediction grid
    m.insert("LP_DATASETS".into(), "BlogCatalog,facebook,Flickr".into());
    m.insert("LP_MODELS".into(), "GCN,GAE".into());
    m.insert("LP_NODE_SIMILARITY".into(), "feature,structural".into());
    m.insert("LP_RANKING_SIMILARITY".into(), "NDCG,ERR".into());

    m
}
