use crate::gklib::{InitPolicy, ParsePolicy};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(name = "geokmeans")]
#[command(about = "K-means clustering of labeled 2-D points")]
#[command(version)]
pub struct KmArgs {
    #[command(flatten)]
    pub io: IOParams,

    #[command(flatten)]
    pub km: KmParams,
}

#[derive(clap::Args, Clone, Debug)]
pub struct IOParams {
    /// Tab separated `label<TAB>x<TAB>y` points
    #[arg(short, long, help_heading = "I/O")]
    pub input: PathBuf,

    /// Also write the result as JSON
    #[arg(long, help_heading = "I/O")]
    pub json: Option<PathBuf>,

    /// Read unparsable coordinates as 0 instead of failing
    #[arg(long, default_value_t = false, help_heading = "I/O")]
    pub lenient: bool,

    /// Only print initial centers, convergence and scores
    #[arg(short, long, default_value_t = false, help_heading = "I/O")]
    pub quiet: bool,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct KmParams {
    /// Number of clusters
    #[arg(short = 'k', long = "clusters", default_value_t = 8, help_heading = "Clustering")]
    pub k: usize,

    /// Random seed for center initialization (default random per run)
    #[arg(long, help_heading = "Clustering")]
    pub seed: Option<u64>,

    /// Maximum iterations before giving up (0 = no limit)
    #[arg(long, default_value_t = 300, help_heading = "Clustering")]
    pub max_iter: usize,

    /// Center movement counted as converged (0 = exact equality)
    #[arg(long, default_value_t = 0.0, help_heading = "Clustering")]
    pub tolerance: f64,

    /// Pick distinct points as initial centers
    #[arg(long, default_value_t = false, help_heading = "Clustering")]
    pub unique_init: bool,
}

impl KmArgs {
    /// Validate command line arguments
    pub fn validate(&self) -> bool {
        let mut is_ok = true;

        is_ok &= validate_file(&self.io.input, "--input");

        if self.km.k < 1 {
            error!("--clusters must be at least 1");
            is_ok = false;
        } else if self.km.k == 1 {
            warn!("--clusters 1 has no inter-cluster distance or separability score");
        }

        if self.km.tolerance < 0.0 || !self.km.tolerance.is_finite() {
            error!("--tolerance must be a finite value >= 0");
            is_ok = false;
        }

        if self.km.max_iter == 0 {
            warn!("--max-iter 0 may loop forever if centers never settle");
        }

        if let Some(json) = &self.io.json {
            if json.is_dir() {
                error!("--json is a directory");
                is_ok = false;
            }
        }

        is_ok
    }

    pub fn parse_policy(&self) -> ParsePolicy {
        if self.io.lenient {
            ParsePolicy::Zero
        } else {
            ParsePolicy::Strict
        }
    }

    pub fn init_policy(&self) -> InitPolicy {
        if self.km.unique_init {
            InitPolicy::WithoutReplacement
        } else {
            InitPolicy::WithReplacement
        }
    }
}

/// Helper function to validate a file's existence and type
fn validate_file(path: &Path, label: &str) -> bool {
    if !path.exists() {
        error!("{} does not exist", label);
        return false;
    }
    if !path.is_file() {
        error!("{} is not a file", label);
        return false;
    }
    true
}
