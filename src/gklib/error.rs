use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, KmError>;

#[derive(Debug, thiserror::Error)]
pub enum KmError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unparsable {field} coordinate `{value}`")]
    BadCoordinate {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("{names} labels for {points} points")]
    LabelMismatch { names: usize, points: usize },

    #[error("dataset has no points")]
    EmptyDataset,

    #[error("k must be between 1 and {n} (number of points), got {k}")]
    InvalidK { k: usize, n: usize },

    #[error("cannot assign points without at least one center")]
    NoCenters,

    #[error("partition has {groups} groups but there are {centers} centers")]
    PartitionMismatch { groups: usize, centers: usize },

    #[error("centers did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("inter-cluster distance needs at least 2 centers, got {k}")]
    TooFewCenters { k: usize },

    #[error("intra-cluster distance is zero, separability is undefined")]
    ZeroIntra,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
