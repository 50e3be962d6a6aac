mod cli;
pub use crate::gklib::cli::{IOParams, KmArgs, KmParams};

mod dataset;
pub use crate::gklib::dataset::{Dataset, ParsePolicy};

mod error;
pub use crate::gklib::error::{KmError, Result};

mod kmeans;
pub use crate::gklib::kmeans::{
    assign, init_centers, update, FitObserver, InitPolicy, KMeans, KMeansResult, NoopObserver,
    Partition,
};

pub mod metrics;
pub use crate::gklib::metrics::Evaluation;

mod point;
pub use crate::gklib::point::{distance, Point};

mod report;
pub use crate::gklib::report::{ClusterReport, ConsoleReporter, Report};
