/// Disjoint-set union-find with union by size.
#[derive(Clone, Debug)]
pub struct Dsuf {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl Dsuf {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    pub fn find(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    /// Merge the sets of `a` and `b`; false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        self.components -= 1;
        true
    }

    #[inline]
    pub fn component_count(&self) -> usize {
        self.components
    }
}
