use std::collections::HashMap;

use serde::Serialize;

/// One agglomeration: clusters `left` and `right` joined at `distance`,
/// forming a cluster of `count` leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeStep {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub count: usize,
}

/// Single-linkage dendrogram. Leaves are ids `0..n`; the i-th step creates id `n + i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeTree {
    leaves: usize,
    steps: Vec<MergeStep>,
}

impl MergeTree {
    /// Builds the tree from a minimum spanning tree (Prim) over Euclidean
    /// distances. Fewer than two rows give no tree.
    pub fn single_linkage(rows: &[Vec<f64>]) -> Option<Self> {
        let n = rows.len();
        if n < 2 {
            return None;
        }

        let mut in_tree = vec![false; n];
        let mut nearest = vec![f64::INFINITY; n];
        let mut parent = vec![0usize; n];
        let mut edges: Vec<(usize, usize, f64)> = Vec::with_capacity(n - 1);

        let mut current = 0;
        in_tree[0] = true;
        for _ in 1..n {
            let mut next = None;
            for j in 0..n {
                if in_tree[j] {
                    continue;
                }
                let d = euclidean(&rows[current], &rows[j]);
                if d < nearest[j] {
                    nearest[j] = d;
                    parent[j] = current;
                }
                if next.is_none_or(|best: usize| nearest[j] < nearest[best]) {
                    next = Some(j);
                }
            }
            let Some(j) = next else { break };
            in_tree[j] = true;
            edges.push((parent[j], j, nearest[j]));
            current = j;
        }

        edges.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut sets = DisjointSet::new(n);
        let mut cluster_of_root: Vec<usize> = (0..n).collect();
        let mut size_of_root = vec![1usize; n];
        let mut steps = Vec::with_capacity(n - 1);

        for (i, (a, b, distance)) in edges.into_iter().enumerate() {
            let (root_a, root_b) = (sets.find(a), sets.find(b));
            let (id_a, id_b) = (cluster_of_root[root_a], cluster_of_root[root_b]);
            let count = size_of_root[root_a] + size_of_root[root_b];

            let root = sets.union(root_a, root_b);
            cluster_of_root[root] = n + i;
            size_of_root[root] = count;

            steps.push(MergeStep {
                left: id_a.min(id_b),
                right: id_a.max(id_b),
                distance,
                count,
            });
        }

        Some(Self { leaves: n, steps })
    }

    pub fn leaves(&self) -> usize {
        self.leaves
    }

    pub fn steps(&self) -> &[MergeStep] {
        &self.steps
    }

    /// Distance of the final merge.
    pub fn max_distance(&self) -> f64 {
        self.steps.iter().map(|step| step.distance).fold(0.0, f64::max)
    }

    /// Flat labels per leaf after applying every merge with distance at most
    /// `threshold`. Labels start at 1 and follow each cluster's first leaf.
    pub fn cut(&self, threshold: f64) -> Vec<usize> {
        let n = self.leaves;
        let mut sets = DisjointSet::new(2 * n - 1);
        for (i, step) in self.steps.iter().enumerate() {
            if step.distance <= threshold {
                sets.union_into(step.left, n + i);
                sets.union_into(step.right, n + i);
            }
        }

        let mut label_of_root = HashMap::new();
        (0..n)
            .map(|leaf| {
                let root = sets.find(leaf);
                let next_label = label_of_root.len() + 1;
                *label_of_root.entry(root).or_insert(next_label)
            })
            .collect()
    }
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) -> usize {
        let (root_a, root_b) = (self.find(a), self.find(b));
        self.parent[root_b] = root_a;
        root_a
    }

    /// Points the root of `child` at `parent`.
    fn union_into(&mut self, child: usize, parent: usize) {
        let root = self.find(child);
        if root != parent {
            self.parent[root] = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<Vec<f64>> {
        coords.iter().map(|(x, y)| vec![*x, *y]).collect()
    }

    #[test]
    fn test_too_few_rows() {
        assert!(MergeTree::single_linkage(&[]).is_none());
        assert!(MergeTree::single_linkage(&points(&[(0.0, 0.0)])).is_none());
    }

    #[test]
    fn test_merge_ids_follow_dendrogram_convention() {
        let tree = MergeTree::single_linkage(&points(&[(0.0, 0.0), (0.0, 1.0), (5.0, 0.0)])).unwrap();
        let steps = tree.steps();

        assert_eq!(steps.len(), 2);
        assert_eq!((steps[0].left, steps[0].right, steps[0].count), (0, 1, 2));
        assert!((steps[0].distance - 1.0).abs() < 1e-12);
        assert_eq!((steps[1].left, steps[1].right, steps[1].count), (2, 3, 3));
        assert!((tree.max_distance() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_linkage_chains() {
        // a chain of unit steps merges below 1.5 even though its ends are 3 apart
        let tree = MergeTree::single_linkage(&points(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (10.0, 0.0),
        ]))
        .unwrap();

        assert_eq!(tree.cut(1.5), vec![1, 1, 1, 1, 2]);
    }

    #[test]
    fn test_cut_labels_follow_first_leaf() {
        let tree = MergeTree::single_linkage(&points(&[(9.0, 0.0), (0.0, 0.0), (9.0, 0.1), (0.0, 0.1)])).unwrap();

        assert_eq!(tree.cut(0.0), vec![1, 2, 3, 4]);
        assert_eq!(tree.cut(0.5), vec![1, 2, 1, 2]);
        assert_eq!(tree.cut(100.0), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_distances_are_non_decreasing() {
        let tree = MergeTree::single_linkage(&points(&[(0.0, 0.0), (4.0, 0.0), (0.5, 0.0), (4.2, 0.0)])).unwrap();
        let distances: Vec<f64> = tree.steps().iter().map(|step| step.distance).collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
