use std::{fmt, result};

/// Lengths, in nodes, of every path from root to an absent child.
/// Collected by [Index::validate].
///
/// A tree holding `n` keys has `n + 1` such paths. An empty tree has a
/// single path of length ZERO.
///
/// [Index::validate]: crate::rbt::Index::validate
#[derive(Clone, Default)]
pub struct Depth {
    // paths[d] is the number of paths that are `d` nodes long.
    paths: Vec<usize>,
}

impl Depth {
    /// Record the length of a single root-to-absent-child path.
    pub fn sample(&mut self, depth: usize) {
        if self.paths.len() <= depth {
            self.paths.resize(depth + 1, 0);
        }
        self.paths[depth] += 1;
    }

    pub fn to_samples(&self) -> usize {
        self.paths.iter().sum()
    }

    /// Return the shortest path.
    pub fn to_min(&self) -> usize {
        self.paths.iter().position(|n| *n > 0).unwrap_or(0)
    }

    /// Return the longest path, same as the tree height.
    pub fn to_max(&self) -> usize {
        self.paths.iter().rposition(|n| *n > 0).unwrap_or(0)
    }

    /// Return the average path length, ZERO when nothing was sampled.
    pub fn to_mean(&self) -> usize {
        let total: usize = self.paths.iter().enumerate().map(|(d, n)| d * n).sum();
        match self.to_samples() {
            0 => 0,
            n => total / n,
        }
    }

    /// Red-black trees keep the longest path within twice the shortest.
    pub fn is_balanced(&self) -> bool {
        self.to_max() <= 2 * self.to_min()
    }

    /// Return (depth, count) for every depth that has at least one path.
    pub fn to_histogram(&self) -> Vec<(usize, usize)> {
        let iter = self.paths.iter().enumerate();
        iter.filter(|(_, n)| **n > 0).map(|(d, n)| (d, *n)).collect()
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let hist: Vec<String> = self
            .to_histogram()
            .into_iter()
            .map(|(depth, n)| format!("{}:{}", depth, n))
            .collect();

        write!(
            f,
            "{{ paths={}, min={}, mean={}, max={}, histogram={{ {} }} }}",
            self.to_samples(),
            self.to_min(),
            self.to_mean(),
            self.to_max(),
            hist.join(", ")
        )
    }
}

#[cfg(test)]
#[path = "depth_test.rs"]
mod depth_test;
