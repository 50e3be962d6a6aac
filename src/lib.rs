#[macro_use]
extern crate log;

mod gklib;
pub use self::{
    gklib::assign, gklib::distance, gklib::init_centers, gklib::metrics, gklib::update,
    gklib::ClusterReport, gklib::ConsoleReporter, gklib::Dataset, gklib::Evaluation,
    gklib::FitObserver, gklib::IOParams, gklib::InitPolicy, gklib::KMeans, gklib::KMeansResult,
    gklib::KmArgs, gklib::KmError, gklib::KmParams, gklib::NoopObserver, gklib::ParsePolicy,
    gklib::Partition, gklib::Point, gklib::Report, gklib::Result,
};
