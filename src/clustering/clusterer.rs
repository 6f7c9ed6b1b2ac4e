use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::cluster::{Cluster, DEFAULT_VALIDITY_DIVISOR};
use super::linkage::MergeTree;
use super::matrix::{CorpusMatrix, TermDocumentMatrix};
use crate::core::config::DetectionConfig;

/// Single-linkage clustering with a greedy scan over cutoff distances.
pub struct HierarchicalClusterer {
    cutoff_step: f64,
    validity_divisor: usize,
}

impl Default for HierarchicalClusterer {
    fn default() -> Self {
        Self {
            cutoff_step: 0.05,
            validity_divisor: DEFAULT_VALIDITY_DIVISOR,
        }
    }
}

impl HierarchicalClusterer {
    pub fn new(cutoff_step: f64, validity_divisor: usize) -> Self {
        Self {
            cutoff_step,
            validity_divisor,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.cutoff_step, config.validity_divisor)
    }

    /// Valid clusters at the first cutoff after which the valid-cluster count
    /// falls. A count that never falls before the root distance yields nothing.
    pub fn cluster(&self, matrix: &CorpusMatrix) -> Vec<Cluster> {
        let CorpusMatrix::Dense(matrix) = matrix else {
            debug!("Empty matrix, no clusters");
            return Vec::new();
        };
        let Some(tree) = MergeTree::single_linkage(matrix.rows()) else {
            debug!("Fewer than two articles, no clusters");
            return Vec::new();
        };
        if !(self.cutoff_step.is_finite() && self.cutoff_step > 0.0) {
            warn!("Unusable cutoff step {}, no clusters", self.cutoff_step);
            return Vec::new();
        }

        let max_distance = tree.max_distance();
        let mut best_count = 0;
        let mut best_cutoff = max_distance;

        for k in 0.. {
            let cutoff = k as f64 * self.cutoff_step;
            if cutoff >= max_distance {
                break;
            }

            let count = self.clusters_at(&tree, matrix, cutoff).len();
            debug!("Cutoff {:.2}: {} valid clusters", cutoff, count);
            if count >= best_count {
                best_count = count;
                best_cutoff = cutoff;
            } else {
                let clusters = self.clusters_at(&tree, matrix, best_cutoff);
                info!(
                    "Selected cutoff {:.2} with {} clusters over {} articles",
                    best_cutoff,
                    clusters.len(),
                    matrix.num_articles()
                );
                return clusters;
            }
        }

        info!("Cluster count never fell before distance {:.3}, no clusters", max_distance);
        Vec::new()
    }

    /// Valid flat clusters at `cutoff`, in ascending id order.
    pub fn clusters_at(&self, tree: &MergeTree, matrix: &TermDocumentMatrix, cutoff: f64) -> Vec<Cluster> {
        let total = matrix.num_articles();
        let mut clusters: BTreeMap<usize, Cluster> = BTreeMap::new();

        for (row, label) in tree.cut(cutoff).into_iter().enumerate() {
            let cluster = clusters
                .entry(label)
                .or_insert_with(|| Cluster::new(label as u32));
            if let Err(err) = cluster.add_member(matrix.article_ids[row], matrix.titles[row].clone()) {
                warn!("Dropping row {}: {}", row, err);
            }
        }

        clusters
            .into_values()
            .filter(|cluster| cluster.is_valid_for(total, self.validity_divisor))
            .collect()
    }
}
