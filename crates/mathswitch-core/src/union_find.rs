//! Disjoint-set forest over the dense index space `0..n`.
//!
//! Path-compressing `find`, union by rank. One instance backs exactly one
//! resolution run; nothing is shared between instances.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct DisjointSet {
  parent: Vec<usize>,
  rank:   Vec<u8>,
}

impl DisjointSet {
  /// `n` singleton sets.
  pub fn new(n: usize) -> Self {
    Self { parent: (0..n).collect(), rank: vec![0; n] }
  }

  pub fn len(&self) -> usize { self.parent.len() }

  pub fn is_empty(&self) -> bool { self.parent.is_empty() }

  /// Root of `x`'s set. Every node on the path is re-parented to the root.
  ///
  /// Panics if `x >= self.len()`.
  pub fn find(&mut self, x: usize) -> usize {
    let mut root = x;
    while self.parent[root] != root {
      root = self.parent[root];
    }
    let mut cur = x;
    while self.parent[cur] != root {
      let next = self.parent[cur];
      self.parent[cur] = root;
      cur = next;
    }
    root
  }

  /// Merge the sets containing `x` and `y`. Returns `false` if they were
  /// already the same set.
  ///
  /// On equal ranks `x`'s root becomes the parent and its rank grows by one.
  pub fn union(&mut self, x: usize, y: usize) -> bool {
    let rx = self.find(x);
    let ry = self.find(y);
    if rx == ry {
      return false;
    }
    match self.rank[rx].cmp(&self.rank[ry]) {
      std::cmp::Ordering::Less => self.parent[rx] = ry,
      std::cmp::Ordering::Greater => self.parent[ry] = rx,
      std::cmp::Ordering::Equal => {
        self.parent[ry] = rx;
        self.rank[rx] += 1;
      }
    }
    true
  }

  /// Representative → members (ascending). Covers every element exactly once,
  /// singletons included.
  pub fn components(&mut self) -> BTreeMap<usize, Vec<usize>> {
    let mut out: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..self.len() {
      let root = self.find(i);
      out.entry(root).or_default().push(i);
    }
    out
  }
}
