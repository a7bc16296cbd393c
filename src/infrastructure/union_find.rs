use crate::domain::graph::{ComponentResult, Graph};
use crate::domain::traits::ComponentDetector;

pub struct UnionFindComponentDetector;

impl ComponentDetector for UnionFindComponentDetector {
    fn connected_components(&self, graph: &Graph) -> ComponentResult {
        union_find_components(graph)
    }
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

fn union_find_components(graph: &Graph) -> ComponentResult {
    let n = graph.node_count();
    let mut sets = DisjointSet::new(n);

    for (u, outs) in graph.edges.iter().enumerate() {
        for &v in outs {
            sets.union(u, v);
        }
    }

    // Ascending node order makes components come out ordered by smallest member.
    let mut component_of = vec![usize::MAX; n];
    let mut root_to_component: Vec<usize> = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for v in 0..n {
        let root = sets.find(v);
        if root_to_component[root] == usize::MAX {
            root_to_component[root] = components.len();
            components.push(Vec::new());
        }
        let cid = root_to_component[root];
        component_of[v] = cid;
        components[cid].push(v);
    }

    ComponentResult {
        component_of,
        components,
    }
}
