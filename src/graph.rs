use crate::types::Edge;

/// Immutable indexing of the input graph, shared by every stage.
///
/// Vertices are numbered `0..n_vertices`; blossoms reuse the range
/// `n_vertices..2 * n_vertices`. Edge `k` owns the two endpoints `2k` and
/// `2k + 1`, so `p ^ 1` is the opposite end of `p` and `p / 2` its edge.
pub struct MatchingGraph {
    pub n_vertices: usize,
    pub edges: Vec<Edge<f64>>,
    // endpoint[p] is the vertex to which endpoint p is attached
    pub endpoint: Vec<usize>,
    // for every vertex, the remote endpoints of its incident edges
    pub neighbend: Vec<Vec<usize>>,
    // largest edge weight, clipped at zero
    pub max_weight: f64,
}

impl MatchingGraph {
    pub fn from_edges(edges: Vec<Edge<f64>>) -> Self {
        let mut n_vertices = 0;
        let mut max_weight = 0.0f64;
        for &(i, j, w) in edges.iter() {
            n_vertices = n_vertices.max(i + 1).max(j + 1);
            if w > max_weight {
                max_weight = w;
            }
        }

        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbend = vec![Vec::new(); n_vertices];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            endpoint.push(i);
            endpoint.push(j);
            neighbend[i].push(2 * k + 1);
            neighbend[j].push(2 * k);
        }

        MatchingGraph {
            n_vertices,
            edges,
            endpoint,
            neighbend,
            max_weight,
        }
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Largest absolute weight, used to scale comparison tolerances.
    pub fn weight_scale(&self) -> f64 {
        self.edges
            .iter()
            .fold(1.0f64, |acc, &(_, _, w)| acc.max(w.abs()))
    }
}
