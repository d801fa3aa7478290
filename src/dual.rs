//! Dual adjustment: when the search stalls, move the dual variables by the
//! largest amount that keeps every edge feasible, then act on whichever bound
//! became tight.

use log::trace;

use crate::blossom_data::BlossomData;
use crate::types::{BlossomLabel, DeltaKind};

impl<'g> BlossomData<'g> {
    fn min_vertex_dual(&self) -> f64 {
        self.dual_var[..self.n_vertices]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Pick the dual step and the reason that bounds it.
    ///
    /// Candidates are scanned in a fixed order (vertex duals, free vertices,
    /// S-blossoms, T-blossoms) and only a strictly smaller value replaces the
    /// current one, so ties go to the first candidate found.
    pub fn determine_delta(&self, max_cardinality: bool) -> (f64, DeltaKind) {
        let n = self.n_vertices;
        let mut best: Option<(f64, DeltaKind)> = None;
        let improves =
            |best: &Option<(f64, DeltaKind)>, d: f64| best.map_or(true, |(delta, _)| d < delta);

        // type 1: an S-vertex dual reaches zero
        if !max_cardinality {
            best = Some((self.min_vertex_dual(), DeltaKind::VertexDual));
        }

        // type 2: least slack between an S-vertex and a free vertex
        for v in 0..n {
            if self.label[self.in_blossom[v]] != BlossomLabel::Unlabeled {
                continue;
            }
            if let Some(k) = self.best_edge[v] {
                let d = self.slack(k);
                if improves(&best, d) {
                    best = Some((d, DeltaKind::FreeVertexEdge(k)));
                }
            }
        }

        // type 3: half the least slack between two S-blossoms
        for b in 0..2 * n {
            if !self.is_top_level(b) || self.label[b] != BlossomLabel::S {
                continue;
            }
            if let Some(k) = self.best_edge[b] {
                let d = self.slack(k) / 2.0;
                if improves(&best, d) {
                    best = Some((d, DeltaKind::SBlossomEdge(k)));
                }
            }
        }

        // type 4: least dual among top-level T-blossoms
        for b in n..2 * n {
            if self.blossom_base[b].is_some()
                && self.is_top_level(b)
                && self.label[b] == BlossomLabel::T
                && improves(&best, self.dual_var[b])
            {
                best = Some((self.dual_var[b], DeltaKind::TBlossomDual(b)));
            }
        }

        best.unwrap_or_else(|| {
            // nothing left to grow in maximum-cardinality mode; a final step
            // keeps the dual solution verifiable
            assert!(max_cardinality, "type 1 bound is always present in weight mode");
            (self.min_vertex_dual().max(0.0), DeltaKind::VertexDual)
        })
    }

    /// Shift all dual variables of labeled vertices and top-level blossoms.
    pub fn update_dual_soln(&mut self, delta: f64) {
        let n = self.n_vertices;
        for v in 0..n {
            match self.label[self.in_blossom[v]] {
                BlossomLabel::S => self.dual_var[v] -= delta,
                BlossomLabel::T => self.dual_var[v] += delta,
                BlossomLabel::Unlabeled => (),
            }
        }
        for b in n..2 * n {
            if self.blossom_base[b].is_none() || !self.is_top_level(b) {
                continue;
            }
            match self.label[b] {
                BlossomLabel::S => self.dual_var[b] += delta,
                BlossomLabel::T => self.dual_var[b] -= delta,
                BlossomLabel::Unlabeled => (),
            }
        }
    }

    /// Act on the bound that was reached. Returns true when the stage is over.
    pub fn update_blossom_structure(&mut self, kind: DeltaKind) -> bool {
        trace!("dual adjustment bounded by {:?}", kind);
        match kind {
            DeltaKind::VertexDual => return true,
            DeltaKind::FreeVertexEdge(k) => {
                self.allowed_edge[k] = true;
                let (i, j, _) = self.graph.edges[k];
                let s = if self.label[self.in_blossom[i]] == BlossomLabel::Unlabeled {
                    j
                } else {
                    i
                };
                debug_assert_eq!(self.label[self.in_blossom[s]], BlossomLabel::S);
                self.queue.push(s);
            }
            DeltaKind::SBlossomEdge(k) => {
                self.allowed_edge[k] = true;
                let (i, _, _) = self.graph.edges[k];
                debug_assert_eq!(self.label[self.in_blossom[i]], BlossomLabel::S);
                self.queue.push(i);
            }
            DeltaKind::TBlossomDual(b) => self.expand_blossom(b, false),
        }
        false
    }
}
