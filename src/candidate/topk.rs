//! Fixed-size sorted insertion buffer for score peaks.

use std::cmp::Ordering;

/// Scored grid cell.
///
/// For template scores `(x, y)` is the placement's top-left corner; for the
/// line accumulator `x` is the angle bin and `y` the rho row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

/// Which end of the score range a buffer keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rank {
    /// Keep the largest scores.
    Highest,
    /// Keep the smallest scores.
    Lowest,
}

impl Rank {
    /// `Less` when `a` ranks before `b`; ties break on row, then column.
    fn cmp(self, a: &Peak, b: &Peak) -> Ordering {
        let by_score = match self {
            Rank::Highest => b.score.total_cmp(&a.score),
            Rank::Lowest => a.score.total_cmp(&b.score),
        };
        by_score
            .then_with(|| a.y.cmp(&b.y))
            .then_with(|| a.x.cmp(&b.x))
    }
}

/// Top-K buffer kept in rank order; insertion is O(k).
pub struct TopK {
    k: usize,
    rank: Rank,
    items: Vec<Peak>,
}

impl TopK {
    /// Creates a buffer keeping the `k` highest scores.
    pub fn new(k: usize) -> Self {
        Self::with_rank(k, Rank::Highest)
    }

    pub fn with_rank(k: usize, rank: Rank) -> Self {
        Self {
            k,
            rank,
            items: Vec::with_capacity(k.min(1024) + 1),
        }
    }

    /// Inserts `peak` at its rank position and drops the tail beyond `k`.
    pub fn push(&mut self, peak: Peak) {
        if self.k == 0 || peak.score.is_nan() {
            return;
        }
        if self.items.len() == self.k {
            if let Some(last) = self.items.last() {
                if self.rank.cmp(&peak, last) != Ordering::Less {
                    return;
                }
            }
        }
        let pos = self
            .items
            .partition_point(|item| self.rank.cmp(item, &peak) == Ordering::Less);
        self.items.insert(pos, peak);
        self.items.truncate(self.k);
    }

    /// Returns the kept peaks, best first.
    pub fn into_sorted(self) -> Vec<Peak> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::{Peak, Rank, TopK};

    fn peak(x: usize, score: f32) -> Peak {
        Peak { x, y: 0, score }
    }

    #[test]
    fn keeps_highest_in_order() {
        let mut topk = TopK::new(3);
        for (x, score) in [(0, 1.0), (1, 5.0), (2, 3.0), (3, 4.0), (4, 2.0)] {
            topk.push(peak(x, score));
        }
        let xs: Vec<usize> = topk.into_sorted().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1, 3, 2]);
    }

    #[test]
    fn keeps_lowest_in_order() {
        let mut topk = TopK::with_rank(2, Rank::Lowest);
        for (x, score) in [(0, 1.0), (1, -5.0), (2, 3.0), (3, 0.5)] {
            topk.push(peak(x, score));
        }
        let xs: Vec<usize> = topk.into_sorted().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1, 3]);
    }

    #[test]
    fn ties_prefer_earlier_scan_position() {
        let mut topk = TopK::new(1);
        topk.push(Peak { x: 4, y: 2, score: 1.0 });
        topk.push(Peak { x: 1, y: 2, score: 1.0 });
        topk.push(Peak { x: 9, y: 3, score: 1.0 });
        assert_eq!(topk.into_sorted()[0], Peak { x: 1, y: 2, score: 1.0 });
    }

    #[test]
    fn zero_capacity_and_nan_are_ignored() {
        let mut topk = TopK::new(0);
        topk.push(peak(0, 1.0));
        assert!(topk.into_sorted().is_empty());

        let mut topk = TopK::new(2);
        topk.push(peak(0, f32::NAN));
        assert!(topk.into_sorted().is_empty());
    }
}
