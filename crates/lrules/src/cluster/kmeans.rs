use super::Clusterer;
use crate::error::{LrulesError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lloyd's k-means with k-means++ seeding. The same seed and input always
/// give the same centres.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

impl KMeans {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    fn seed_centroids(&self, rows: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
        let n = rows.len();
        let mut centroids = Vec::with_capacity(k);
        centroids.push(rows[rng.gen_range(0..n)].clone());

        for _ in 1..k {
            let dists: Vec<f64> = rows
                .iter()
                .map(|row| {
                    centroids
                        .iter()
                        .map(|c| squared_dist(row, c))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();
            let total: f64 = dists.iter().sum();

            if total < 1e-15 {
                centroids.push(rows[rng.gen_range(0..n)].clone());
                continue;
            }

            let target = rng.gen_range(0.0..total);
            let mut cumulative = 0.0;
            let mut chosen = n - 1;
            for (i, d) in dists.iter().enumerate() {
                cumulative += d;
                if cumulative > target {
                    chosen = i;
                    break;
                }
            }
            centroids.push(rows[chosen].clone());
        }

        centroids
    }
}

impl Clusterer for KMeans {
    fn cluster(&self, rows: &[Vec<f64>], k: usize) -> Result<Vec<Vec<f64>>> {
        if k == 0 || k > rows.len() {
            return Err(LrulesError::Clustering(format!(
                "cannot form {} clusters from {} rows",
                k,
                rows.len()
            )));
        }
        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(LrulesError::Clustering("rows differ in width".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.seed_centroids(rows, k, &mut rng);

        for _ in 0..self.max_iterations {
            let mut sums = vec![vec![0.0; width]; k];
            let mut sizes = vec![0usize; k];

            for row in rows {
                let nearest = nearest_centroid(row, &centroids);
                sizes[nearest] += 1;
                for (s, v) in sums[nearest].iter_mut().zip(row) {
                    *s += v;
                }
            }

            let mut shift = 0.0;
            for ((centroid, sum), &size) in centroids.iter_mut().zip(sums).zip(&sizes) {
                // an emptied cluster keeps its previous centre
                if size == 0 {
                    continue;
                }
                let updated: Vec<f64> = sum.iter().map(|s| s / size as f64).collect();
                shift += squared_dist(centroid, &updated);
                *centroid = updated;
            }

            if shift <= self.tolerance {
                break;
            }
        }

        Ok(centroids)
    }
}

fn nearest_centroid(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_dist(row, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn squared_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
