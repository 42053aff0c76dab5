//! Flat parent-array union-find over provisional labels.

/// Disjoint sets over `0..len()`; roots are always the smallest member.
#[derive(Clone, Debug, Default)]
pub(crate) struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }

    /// Adds a singleton set and returns its label.
    pub(crate) fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    /// Root of `label`, halving the path on the way.
    pub(crate) fn find(&mut self, mut label: u32) -> u32 {
        while self.parent[label as usize] != label {
            let grand = self.parent[self.parent[label as usize] as usize];
            self.parent[label as usize] = grand;
            label = grand;
        }
        label
    }

    /// Merges the sets of `a` and `b`, redirecting the larger root to the
    /// smaller one. Returns the surviving root.
    pub(crate) fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        let (lo, hi) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi as usize] = lo;
        lo
    }

    /// Points every label directly at its root.
    pub(crate) fn flatten(&mut self) {
        // Roots are minimal members, so a root always precedes its children.
        for label in 0..self.parent.len() {
            let p = self.parent[label] as usize;
            self.parent[label] = self.parent[p];
        }
    }

    pub(crate) fn parent(&self, label: u32) -> u32 {
        self.parent[label as usize]
    }
}
