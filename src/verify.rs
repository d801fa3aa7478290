//! Consistency checks on the engine state.
//!
//! `verify_optimum` checks the complementary-slackness certificate of the
//! final matching. The delta checks recompute the cached least-slack edges by
//! brute force; both are only run when enabled through `MatchingOptions`.

use crate::blossom_data::BlossomData;
use crate::error::OptimalityViolation;
use crate::types::BlossomLabel;

impl<'g> BlossomData<'g> {
    fn tolerance(&self) -> f64 {
        1e-9 * self.graph.weight_scale()
    }

    // v followed by all its enclosing blossoms, outermost first
    fn blossom_chain(&self, v: usize) -> Vec<usize> {
        let mut chain = vec![v];
        let mut current = v;
        while let Some(parent) = self.blossom_parent[current] {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    pub fn verify_optimum(&self, max_cardinality: bool) -> Result<(), OptimalityViolation> {
        let n = self.n_vertices;
        let eps = self.tolerance();
        let endpoint = &self.graph.endpoint;

        // in maximum-cardinality mode vertex duals may go negative; shift them all
        let min_dual = self.dual_var[..n].iter().copied().fold(f64::INFINITY, f64::min);
        let offset = if max_cardinality { (-min_dual).max(0.0) } else { 0.0 };

        for v in 0..n {
            if self.dual_var[v] + offset < -eps {
                return Err(OptimalityViolation::NegativeVertexDual {
                    vertex: v,
                    dual: self.dual_var[v],
                });
            }
        }
        for b in n..2 * n {
            if self.dual_var[b] < -eps {
                return Err(OptimalityViolation::NegativeBlossomDual {
                    blossom: b,
                    dual: self.dual_var[b],
                });
            }
        }

        for (k, &(i, j, w)) in self.graph.edges.iter().enumerate() {
            let mut slack = self.dual_var[i] + self.dual_var[j] - 2.0 * w;
            for (bi, bj) in self.blossom_chain(i).into_iter().zip(self.blossom_chain(j)) {
                if bi != bj {
                    break;
                }
                slack += 2.0 * self.dual_var[bi];
            }
            if slack < -eps {
                return Err(OptimalityViolation::NegativeSlack { edge: k, slack });
            }
            let i_matched = self.mate[i].map(|p| p / 2) == Some(k);
            let j_matched = self.mate[j].map(|p| p / 2) == Some(k);
            if i_matched != j_matched {
                return Err(OptimalityViolation::AsymmetricMate { edge: k });
            }
            if i_matched && slack.abs() > eps {
                return Err(OptimalityViolation::MatchedEdgeNotTight { edge: k, slack });
            }
        }

        for v in 0..n {
            if self.mate[v].is_none() && (self.dual_var[v] + offset).abs() > eps {
                return Err(OptimalityViolation::ExposedVertexDual {
                    vertex: v,
                    dual: self.dual_var[v],
                });
            }
        }

        for b in n..2 * n {
            if self.blossom_base[b].is_none() || self.dual_var[b] <= eps {
                continue;
            }
            let endpoints = &self.blossom_endpoints[b];
            let full = endpoints.len() % 2 == 1
                && endpoints.iter().skip(1).step_by(2).all(|&p| {
                    self.mate[endpoint[p]] == Some(p ^ 1) && self.mate[endpoint[p ^ 1]] == Some(p)
                });
            if !full {
                return Err(OptimalityViolation::BlossomNotFull { blossom: b });
            }
        }

        Ok(())
    }

    /// Compare the cached type-2 edges against a full rescan.
    pub fn check_delta2(&self) {
        let eps = self.tolerance();
        for v in 0..self.n_vertices {
            if self.label[self.in_blossom[v]] != BlossomLabel::Unlabeled {
                continue;
            }
            let mut best: Option<f64> = None;
            for &p in self.graph.neighbend[v].iter() {
                let w = self.graph.endpoint[p];
                if self.label[self.in_blossom[w]] == BlossomLabel::S {
                    let d = self.slack(p / 2);
                    if best.map_or(true, |b| d < b) {
                        best = Some(d);
                    }
                }
            }
            let cached = self.best_edge[v].map(|k| self.slack(k));
            match (best, cached) {
                (None, None) => (),
                (Some(d), Some(c)) => assert!(
                    (d - c).abs() <= eps,
                    "vertex {}: cached least slack {} but rescan found {}",
                    v,
                    c,
                    d
                ),
                _ => panic!(
                    "vertex {}: cached edge {:?} disagrees with rescan {:?}",
                    v, cached, best
                ),
            }
        }
    }

    /// Compare the minimum over cached type-3 edges against a full rescan.
    pub fn check_delta3(&self) {
        let eps = self.tolerance();
        let mut rescanned: Option<f64> = None;
        let mut cached: Option<f64> = None;
        for b in 0..2 * self.n_vertices {
            if !self.is_top_level(b) || self.label[b] != BlossomLabel::S {
                continue;
            }
            for v in self.leaves(b) {
                for &p in self.graph.neighbend[v].iter() {
                    let w = self.graph.endpoint[p];
                    let bw = self.in_blossom[w];
                    if bw != b && self.label[bw] == BlossomLabel::S {
                        let d = self.slack(p / 2);
                        if rescanned.map_or(true, |r| d < r) {
                            rescanned = Some(d);
                        }
                    }
                }
            }
            if let Some(k) = self.best_edge[b] {
                let (i, j, _) = self.graph.edges[k];
                assert!(
                    (self.in_blossom[i] == b) != (self.in_blossom[j] == b),
                    "best edge {} of blossom {} must leave it",
                    k,
                    b
                );
                assert_eq!(self.label[self.in_blossom[i]], BlossomLabel::S);
                assert_eq!(self.label[self.in_blossom[j]], BlossomLabel::S);
                let d = self.slack(k);
                if cached.map_or(true, |c| d < c) {
                    cached = Some(d);
                }
            }
        }
        match (rescanned, cached) {
            (None, None) => (),
            (Some(r), Some(c)) => assert!(
                (r - c).abs() <= eps,
                "cached S-blossom slack {} but rescan found {}",
                c,
                r
            ),
            _ => panic!(
                "cached S-blossom slack {:?} disagrees with rescan {:?}",
                cached, rescanned
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::blossom_data::BlossomData;
    use crate::error::OptimalityViolation;
    use crate::graph::MatchingGraph;

    #[test]
    fn tight_matched_edge_passes() {
        // single edge of weight 3: duals 3 + 3 - 2 * 3 = 0
        let graph = MatchingGraph::from_edges(vec![(0, 1, 3.)]);
        let mut data = BlossomData::new(&graph);
        data.mate[0] = Some(1);
        data.mate[1] = Some(0);
        assert_eq!(data.verify_optimum(false), Ok(()));
    }

    #[test]
    fn exposed_vertex_with_dual_is_reported() {
        let graph = MatchingGraph::from_edges(vec![(0, 1, 3.)]);
        let data = BlossomData::new(&graph);
        assert_eq!(
            data.verify_optimum(false),
            Err(OptimalityViolation::ExposedVertexDual { vertex: 0, dual: 3. })
        );
    }

    #[test]
    fn one_sided_mate_is_reported() {
        let graph = MatchingGraph::from_edges(vec![(0, 1, 3.)]);
        let mut data = BlossomData::new(&graph);
        data.mate[0] = Some(1);
        assert_eq!(
            data.verify_optimum(false),
            Err(OptimalityViolation::AsymmetricMate { edge: 0 })
        );
    }

    #[test]
    fn negative_slack_is_reported() {
        let graph = MatchingGraph::from_edges(vec![(0, 1, 3.), (1, 2, 1.)]);
        let mut data = BlossomData::new(&graph);
        data.mate[0] = Some(1);
        data.mate[1] = Some(0);
        data.dual_var[2] = 0.;
        data.dual_var[1] = 1.;
        match data.verify_optimum(false) {
            Err(OptimalityViolation::NegativeSlack { edge, .. }) => assert_eq!(edge, 0),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
