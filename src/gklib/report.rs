use crate::gklib::metrics::{inter_cluster, intra_cluster, separability};
use crate::gklib::{Dataset, Evaluation, FitObserver, KMeansResult, Partition, Point, Result};
use serde::Serialize;
use std::io::Write;

/// Prints fit progress and the final scores as plain text
pub struct ConsoleReporter<'a, W: Write> {
    data: &'a Dataset,
    out: W,
    /// Skip per-iteration membership and centers
    quiet: bool,
}

impl<'a, W: Write> ConsoleReporter<'a, W> {
    pub fn new(data: &'a Dataset, out: W, quiet: bool) -> Self {
        Self { data, out, quiet }
    }

    fn write_centers(&mut self, centers: &[Point]) -> Result<()> {
        for (i, center) in centers.iter().enumerate() {
            writeln!(self.out, "Cluster {} center: {}", i + 1, center)?;
        }
        Ok(())
    }

    /// Same values as `Evaluation::compute`, but each metric is printed as soon as it
    /// is known so intra and inter still appear when the score is undefined
    pub fn write_evaluation(&mut self, result: &KMeansResult) -> Result<Evaluation> {
        writeln!(self.out, "Evaluation")?;
        let intra = intra_cluster(self.data, &result.centers, &result.clusters)?;
        writeln!(self.out, "Intra-cluster distance: {:.6}", intra)?;
        let inter = inter_cluster(&result.centers)?;
        writeln!(self.out, "Inter-cluster distance: {:.6}", inter)?;
        let score = separability(inter, intra)?;
        writeln!(self.out, "Separability score: {:.6}", score)?;
        Ok(Evaluation {
            intra,
            inter,
            score,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FitObserver for ConsoleReporter<'_, W> {
    fn on_init(&mut self, centers: &[Point]) -> Result<()> {
        writeln!(self.out, "Step 1. Initialize centers")?;
        self.write_centers(centers)
    }

    fn on_assign(&mut self, iteration: usize, clusters: &Partition) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "Step 2. Assign points (iteration {})", iteration + 1)?;
        for (i, group) in clusters.groups().iter().enumerate() {
            let names: Vec<&str> = group.iter().map(|&idx| self.data.name(idx)).collect();
            writeln!(self.out, "Cluster {}: {}", i + 1, names.join(", "))?;
        }
        Ok(())
    }

    fn on_update(&mut self, iteration: usize, centers: &[Point]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "Step 3. Update centers (iteration {})", iteration + 1)?;
        self.write_centers(centers)
    }

    fn on_converged(&mut self, iterations: usize) -> Result<()> {
        let noun = if iterations == 1 {
            "iteration"
        } else {
            "iterations"
        };
        writeln!(
            self.out,
            "Centers unchanged after {} {}, stopping",
            iterations, noun
        )?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub center: Point,
    pub members: Vec<String>,
}

/// Machine readable summary of a finished run
#[derive(Debug, Serialize)]
pub struct Report {
    pub k: usize,
    pub seed: Option<u64>,
    pub iterations: usize,
    pub initial_centers: Vec<Point>,
    pub clusters: Vec<ClusterReport>,
    pub evaluation: Option<Evaluation>,
}

impl Report {
    pub fn new(
        data: &Dataset,
        result: &KMeansResult,
        seed: Option<u64>,
        evaluation: Option<Evaluation>,
    ) -> Self {
        let clusters = result
            .centers
            .iter()
            .zip(result.clusters.groups())
            .map(|(center, group)| ClusterReport {
                center: *center,
                members: group.iter().map(|&idx| data.name(idx).to_string()).collect(),
            })
            .collect();
        Self {
            k: result.centers.len(),
            seed,
            iterations: result.iterations,
            initial_centers: result.initial_centers.clone(),
            clusters,
            evaluation,
        }
    }

    pub fn write_json<W: Write>(&self, out: W) -> Result<()> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gklib::{KMeans, KmError, NoopObserver};

    fn labeled() -> Dataset {
        Dataset::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 11.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_console_progress() {
        let data = labeled();
        let start = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let mut rep = ConsoleReporter::new(&data, Vec::new(), false);
        rep.on_init(&start).unwrap();
        let res = KMeans::new(2).fit_from(&data, start, &mut rep).unwrap();
        let eval = rep.write_evaluation(&res).unwrap();
        assert_eq!(eval.intra, 0.5);

        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert!(text.starts_with("Step 1. Initialize centers\n"));
        assert!(text.contains("Cluster 1: a, b\n"));
        assert!(text.contains("Cluster 2: c, d\n"));
        assert!(text.contains("Cluster 2 center: [10.000000, 10.500000]\n"));
        assert!(text.contains("Centers unchanged after 1 iteration, stopping\n"));
        assert!(text.contains("Intra-cluster distance: 0.500000\n"));
        assert!(text.contains("Separability score: 28.284271\n"));
    }

    #[test]
    fn test_console_quiet() {
        let data = labeled();
        let start = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let mut rep = ConsoleReporter::new(&data, Vec::new(), true);
        KMeans::new(2).fit_from(&data, start, &mut rep).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert!(!text.contains("Step 2"));
        assert!(text.contains("Centers unchanged"));
    }

    #[test]
    fn test_evaluation_matches_compute() {
        let data = labeled();
        let start = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let res = KMeans::new(2)
            .fit_from(&data, start, &mut NoopObserver)
            .unwrap();
        let mut rep = ConsoleReporter::new(&data, Vec::new(), true);
        let printed = rep.write_evaluation(&res).unwrap();
        assert_eq!(printed, Evaluation::compute(&data, &res).unwrap());
    }

    #[test]
    fn test_converged_zero_iterations_plural() {
        let data = labeled();
        let mut rep = ConsoleReporter::new(&data, Vec::new(), true);
        rep.on_converged(0).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert_eq!(text, "Centers unchanged after 0 iterations, stopping\n");
    }

    #[test]
    fn test_evaluation_partial_on_single_cluster() {
        let data = labeled();
        let res = KMeans::new(1)
            .fit_from(&data, vec![Point::new(0.0, 0.0)], &mut NoopObserver)
            .unwrap();
        let mut rep = ConsoleReporter::new(&data, Vec::new(), true);
        let err = rep.write_evaluation(&res).unwrap_err();
        assert!(matches!(err, KmError::TooFewCenters { k: 1 }));
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert!(text.contains("Intra-cluster distance"));
        assert!(!text.contains("Separability"));
    }

    #[test]
    fn test_json_report() {
        let data = labeled();
        let start = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let res = KMeans::new(2)
            .fit_from(&data, start, &mut NoopObserver)
            .unwrap();
        let eval = Evaluation::compute(&data, &res).unwrap();
        let mut buf = Vec::new();
        Report::new(&data, &res, Some(5), Some(eval))
            .write_json(&mut buf)
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["k"], 2);
        assert_eq!(v["seed"], 5);
        assert_eq!(v["iterations"], 1);
        assert_eq!(v["clusters"][1]["members"][0], "c");
        assert_eq!(v["clusters"][0]["center"]["y"], 0.5);
        assert_eq!(v["evaluation"]["intra"], 0.5);
    }
}
