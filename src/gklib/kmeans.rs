use crate::gklib::{Dataset, KmError, Point, Result};
use ordered_float::OrderedFloat;
use rand::seq::index;
use rand::Rng;

/// How initial centers are drawn from the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitPolicy {
    /// Independent uniform draws; the same point may be picked twice
    #[default]
    WithReplacement,
    /// k distinct points
    WithoutReplacement,
}

/// Groups of dataset indices, one group per center
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition(Vec<Vec<usize>>);

impl Partition {
    pub fn new(groups: Vec<Vec<usize>>) -> Self {
        Self(groups)
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.0.iter().map(|g| g.len()).sum()
    }

    /// Group holding dataset index `idx`
    pub fn cluster_of(&self, idx: usize) -> Option<usize> {
        self.0.iter().position(|g| g.contains(&idx))
    }

    /// Per-point cluster labels for a dataset of `n` points.
    /// Indices at or past `n` are ignored; points in no group get label 0.
    pub fn labels(&self, n: usize) -> Vec<usize> {
        let mut ret = vec![0; n];
        for (cid, group) in self.0.iter().enumerate() {
            for &idx in group {
                if let Some(label) = ret.get_mut(idx) {
                    *label = cid;
                }
            }
        }
        ret
    }
}

/// Hooks for watching a fit progress. Every method defaults to doing nothing.
/// An error from a hook aborts the fit.
pub trait FitObserver {
    fn on_init(&mut self, _centers: &[Point]) -> Result<()> {
        Ok(())
    }
    fn on_assign(&mut self, _iteration: usize, _clusters: &Partition) -> Result<()> {
        Ok(())
    }
    fn on_update(&mut self, _iteration: usize, _centers: &[Point]) -> Result<()> {
        Ok(())
    }
    fn on_converged(&mut self, _iterations: usize) -> Result<()> {
        Ok(())
    }
}

pub struct NoopObserver;
impl FitObserver for NoopObserver {}

fn check_k(data: &Dataset, k: usize) -> Result<()> {
    if data.is_empty() {
        return Err(KmError::EmptyDataset);
    }
    if k < 1 || k > data.len() {
        return Err(KmError::InvalidK { k, n: data.len() });
    }
    Ok(())
}

/// Draw k points from the data as starting centers, in draw order
pub fn init_centers<R: Rng>(
    data: &Dataset,
    k: usize,
    policy: InitPolicy,
    rng: &mut R,
) -> Result<Vec<Point>> {
    check_k(data, k)?;
    let points = data.points();
    let centers: Vec<Point> = match policy {
        InitPolicy::WithReplacement => (0..k)
            .map(|_| points[rng.gen_range(0..points.len())])
            .collect(),
        InitPolicy::WithoutReplacement => index::sample(rng, points.len(), k)
            .into_iter()
            .map(|i| points[i])
            .collect(),
    };

    let mut dups = 0;
    for (i, c) in centers.iter().enumerate() {
        if centers[..i].contains(c) {
            dups += 1;
        }
    }
    if dups > 0 {
        debug!("{} duplicate initial centers", dups);
    }
    Ok(centers)
}

/// Put every point in the group of its nearest center. Ties go to the lower index.
pub fn assign(data: &Dataset, centers: &[Point]) -> Result<Partition> {
    if centers.is_empty() {
        return Err(KmError::NoCenters);
    }
    let mut clusters = vec![vec![]; centers.len()];
    for (idx, point) in data.points().iter().enumerate() {
        // min_by_key keeps the first of equal minimums
        let nearest = centers
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| OrderedFloat(point.distance(c)))
            .map(|(cid, _)| cid)
            .ok_or(KmError::NoCenters)?;
        clusters[nearest].push(idx);
    }
    Ok(Partition(clusters))
}

/// Move each center to the mean of its group. Empty groups keep their previous center.
pub fn update(data: &Dataset, clusters: &Partition, previous: &[Point]) -> Result<Vec<Point>> {
    if clusters.len() != previous.len() {
        return Err(KmError::PartitionMismatch {
            groups: clusters.len(),
            centers: previous.len(),
        });
    }
    let points = data.points();
    Ok(clusters
        .groups()
        .iter()
        .zip(previous)
        .map(|(group, old)| {
            if group.is_empty() {
                return *old;
            }
            let (sum_x, sum_y) = group.iter().fold((0.0, 0.0), |(sx, sy), &idx| {
                (sx + points[idx].x, sy + points[idx].y)
            });
            let n = group.len() as f64;
            Point::new(sum_x / n, sum_y / n)
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct KMeansResult {
    pub initial_centers: Vec<Point>,
    pub centers: Vec<Point>,
    /// The partition `centers` produced
    pub clusters: Partition,
    /// Passes that moved at least one center
    pub iterations: usize,
}

/// Lloyd's k-means over 2-D points
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_iter: usize,
    tolerance: f64,
    init: InitPolicy,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            tolerance: 0.0,
            init: InitPolicy::default(),
        }
    }

    /// Maximum number of center-moving passes. 0 removes the cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Largest per-center movement still counted as converged. 0.0 requires exact equality.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_init(mut self, init: InitPolicy) -> Self {
        self.init = init;
        self
    }

    fn has_converged(&self, old: &[Point], new: &[Point]) -> bool {
        if self.tolerance <= 0.0 {
            old == new
        } else {
            old.iter()
                .zip(new)
                .all(|(a, b)| a.distance(b) <= self.tolerance)
        }
    }

    pub fn fit<R: Rng>(&self, data: &Dataset, rng: &mut R) -> Result<KMeansResult> {
        self.fit_with(data, rng, &mut NoopObserver)
    }

    pub fn fit_with<R: Rng>(
        &self,
        data: &Dataset,
        rng: &mut R,
        observer: &mut dyn FitObserver,
    ) -> Result<KMeansResult> {
        let centers = init_centers(data, self.k, self.init, rng)?;
        observer.on_init(&centers)?;
        self.fit_from(data, centers, observer)
    }

    /// Run the assign/update loop from the given starting centers
    pub fn fit_from(
        &self,
        data: &Dataset,
        initial_centers: Vec<Point>,
        observer: &mut dyn FitObserver,
    ) -> Result<KMeansResult> {
        check_k(data, initial_centers.len())?;
        let mut centers = initial_centers.clone();
        let mut steps = 0;
        loop {
            let clusters = assign(data, &centers)?;
            observer.on_assign(steps, &clusters)?;

            let new_centers = update(data, &clusters, &centers)?;
            observer.on_update(steps, &new_centers)?;

            if self.has_converged(&centers, &new_centers) {
                debug!("converged after {} iterations", steps);
                observer.on_converged(steps)?;
                return Ok(KMeansResult {
                    initial_centers,
                    centers,
                    clusters,
                    iterations: steps,
                });
            }

            // the pass after the last allowed move only confirms
            if self.max_iter != 0 && steps >= self.max_iter {
                warn!("no convergence within {} iterations", self.max_iter);
                return Err(KmError::NotConverged { iterations: steps });
            }

            centers = new_centers;
            steps += 1;
            trace!("iteration {} centers {:?}", steps, centers);
        }
    }
}
