/// Undirected graph over local node ids `0..node_count`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub edges: Vec<Vec<usize>>,
}

impl Graph {
    pub fn new(node_count: usize) -> Self {
        Self {
            edges: vec![Vec::new(); node_count],
        }
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        self.edges[a].push(b);
        if a != b {
            self.edges[b].push(a);
        }
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Undirected edges, each counted once.
    pub fn edge_count(&self) -> usize {
        let loops: usize = self
            .edges
            .iter()
            .enumerate()
            .map(|(u, outs)| outs.iter().filter(|&&v| v == u).count())
            .sum();
        let total: usize = self.edges.iter().map(|v| v.len()).sum();
        (total - loops) / 2 + loops
    }
}

#[derive(Debug, Clone)]
pub struct ComponentResult {
    pub component_of: Vec<usize>,
    /// Members ascending; components ordered by their smallest member.
    pub components: Vec<Vec<usize>>,
}
