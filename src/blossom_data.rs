use std::mem;

use log::trace;

use crate::graph::MatchingGraph;
use crate::types::BlossomLabel;

/// Depth-first walk over the vertices contained in a (possibly nested) blossom.
///
/// Children are visited in cyclic order, so the leaves come out in the same
/// order a recursive descent would produce them.
pub struct BlossomLeaves<'a> {
    blossom_children: &'a [Vec<usize>],
    n_vertices: usize,
    pending: Vec<usize>,
}

impl<'a> BlossomLeaves<'a> {
    pub fn new(blossom_children: &'a [Vec<usize>], n_vertices: usize, blossom: usize) -> Self {
        let mut pending = Vec::with_capacity(8);
        pending.push(blossom);
        BlossomLeaves {
            blossom_children,
            n_vertices,
            pending,
        }
    }
}

impl<'a> Iterator for BlossomLeaves<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(b) = self.pending.pop() {
            if b < self.n_vertices {
                return Some(b);
            }
            self.pending
                .extend(self.blossom_children[b].iter().rev().copied());
        }
        None
    }
}

/// Python-style index into a cyclic list: `-1` is the last element.
fn wrap(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// The whole mutable state of the primal-dual blossom algorithm.
///
/// Vertices and blossoms share one id space: `0..n` are vertices (trivial
/// blossoms) and `n..2n` are slots for non-trivial blossoms, recycled through
/// `unused_blossoms`. Nesting is kept in parallel arrays indexed by id.
pub struct BlossomData<'g> {
    pub(crate) graph: &'g MatchingGraph,
    pub(crate) n_vertices: usize,

    // mate[v] is the remote endpoint of the matched edge of vertex v,
    // so graph.endpoint[mate[v]] is its partner; None for exposed vertices
    pub(crate) mate: Vec<Option<usize>>,

    // the label of a vertex is found by looking at the label of its top-level
    // blossom; a vertex inside a T-blossom is itself labeled T once it is
    // reachable from an S-vertex outside that blossom
    pub(crate) label: Vec<BlossomLabel>,

    // if b is a labeled top-level blossom, label_end[b] is the remote endpoint
    // of the edge through which b got its label, or None for a tree root
    pub(crate) label_end: Vec<Option<usize>>,

    // the top-level blossom containing a given vertex
    pub(crate) in_blossom: Vec<usize>,

    pub(crate) blossom_parent: Vec<Option<usize>>,
    // sub-blossoms ordered around the cycle, starting with the base
    pub(crate) blossom_children: Vec<Vec<usize>>,
    // base vertex of a blossom; None for unused slots
    pub(crate) blossom_base: Vec<Option<usize>>,
    // blossom_endpoints[b][i] is the endpoint of blossom_children[b][i] on the
    // edge that connects it to the next child around the cycle
    pub(crate) blossom_endpoints: Vec<Vec<usize>>,

    // for a free vertex (or an unreached vertex inside a T-blossom), the
    // least-slack edge to an S-vertex; for a top-level S-blossom, the
    // least-slack edge to a different S-blossom
    pub(crate) best_edge: Vec<Option<usize>>,
    // for a non-trivial top-level S-blossom, the least-slack edge to each
    // neighbouring S-blossom; None when it has not been computed yet
    pub(crate) blossom_best_edges: Vec<Option<Vec<usize>>>,

    pub(crate) unused_blossoms: Vec<usize>,

    // dual_var[v] is twice the vertex dual so that integer weights keep
    // integral duals; dual_var[b] is the blossom dual
    pub(crate) dual_var: Vec<f64>,

    // true if the edge is known to have zero slack during this stage
    pub(crate) allowed_edge: Vec<bool>,

    // S-vertices waiting to be scanned
    pub(crate) queue: Vec<usize>,

    // scratch marks for scan_blossom, always all false between calls
    breadcrumbs: Vec<bool>,
}

impl<'g> BlossomData<'g> {
    pub fn new(graph: &'g MatchingGraph) -> Self {
        let n = graph.n_vertices;
        let mut blossom_base: Vec<Option<usize>> = (0..n).map(Some).collect();
        blossom_base.resize(2 * n, None);
        let mut dual_var = vec![graph.max_weight; n];
        dual_var.resize(2 * n, 0.0);

        BlossomData {
            graph,
            n_vertices: n,
            mate: vec![None; n],
            label: vec![BlossomLabel::Unlabeled; 2 * n],
            label_end: vec![None; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![None; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base,
            blossom_endpoints: vec![Vec::new(); 2 * n],
            best_edge: vec![None; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual_var,
            allowed_edge: vec![false; graph.n_edges()],
            queue: Vec::with_capacity(n),
            breadcrumbs: vec![false; 2 * n],
        }
    }

    /// Forget everything learned during the previous stage except the
    /// matching, the duals and the blossom structure.
    pub fn clear(&mut self) {
        self.label.fill(BlossomLabel::Unlabeled);
        self.best_edge.fill(None);
        for b in self.n_vertices..2 * self.n_vertices {
            self.blossom_best_edges[b] = None;
        }
        self.allowed_edge.fill(false);
        self.queue.clear();
    }

    /// Twice the slack of edge k. Not meaningful for edges inside a blossom.
    #[inline]
    pub fn slack(&self, k: usize) -> f64 {
        let (i, j, w) = self.graph.edges[k];
        self.dual_var[i] + self.dual_var[j] - 2.0 * w
    }

    pub fn leaves(&self, blossom: usize) -> BlossomLeaves<'_> {
        BlossomLeaves::new(&self.blossom_children, self.n_vertices, blossom)
    }

    pub fn is_top_level(&self, b: usize) -> bool {
        self.blossom_parent[b].is_none()
    }

    /// Start a new alternating tree at every exposed vertex.
    pub fn label_exposed_vertices(&mut self) {
        for v in 0..self.n_vertices {
            if self.mate[v].is_none() && self.label[self.in_blossom[v]] == BlossomLabel::Unlabeled {
                self.assign_label(v, BlossomLabel::S, None);
            }
        }
    }

    /// Label the top-level blossom containing `w`, reached through the edge
    /// with remote endpoint `p`. A T-label immediately propagates an S-label
    /// to the mate of the blossom base.
    pub fn assign_label(&mut self, w: usize, label: BlossomLabel, p: Option<usize>) {
        let b = self.in_blossom[w];
        assert_eq!(self.label[w], BlossomLabel::Unlabeled);
        assert_eq!(self.label[b], BlossomLabel::Unlabeled);
        self.label[w] = label;
        self.label[b] = label;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = None;
        self.best_edge[b] = None;

        match label {
            BlossomLabel::S => {
                self.queue
                    .extend(BlossomLeaves::new(&self.blossom_children, self.n_vertices, b));
            }
            BlossomLabel::T => {
                // only the base of a blossom has a mate outside of it
                let base = self.blossom_base[b].expect("labeled blossom has a base");
                let mbase = self.mate[base].expect("T-blossom base must be matched");
                self.assign_label(self.graph.endpoint[mbase], BlossomLabel::S, Some(mbase ^ 1));
            }
            BlossomLabel::Unlabeled => unreachable!("cannot assign the empty label"),
        }
    }

    /// Walk up the alternating tree from two S-vertices joined by a tight edge.
    ///
    /// Returns the base vertex of the odd cycle if both walks meet, or None if
    /// they reach two different roots, i.e. an augmenting path exists.
    pub fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let graph = self.graph;
        let endpoint = &graph.endpoint;
        let mut path = Vec::new();
        let mut base = None;
        let (mut v, mut w) = (Some(v), Some(w));
        while let Some(current) = v {
            let b = self.in_blossom[current];
            if self.breadcrumbs[b] {
                base = self.blossom_base[b];
                break;
            }
            debug_assert_eq!(self.label[b], BlossomLabel::S);
            path.push(b);
            self.breadcrumbs[b] = true;

            // step over the matched edge to the T-blossom, then over its tree edge
            v = self.label_end[b].map(|p| {
                let bt = self.in_blossom[endpoint[p]];
                debug_assert_eq!(self.label[bt], BlossomLabel::T);
                let q = self.label_end[bt].expect("T-blossom was reached through an edge");
                endpoint[q]
            });
            // alternate between the two walks while both are alive
            if w.is_some() {
                mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.breadcrumbs[b] = false;
        }
        base
    }

    /// Contract the odd cycle closed by edge `k` into a new S-blossom with the
    /// given base vertex.
    pub fn add_blossom(&mut self, base: usize, k: usize) {
        let graph = self.graph;
        let (v, w, _) = graph.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        let b = self
            .unused_blossoms
            .pop()
            .expect("at most n - 1 blossoms can be active");
        trace!("contracting blossom {} with base {} through edge {}", b, base, k);
        self.blossom_base[b] = Some(base);
        self.blossom_parent[b] = None;
        self.blossom_parent[bb] = Some(b);

        let mut children = Vec::new();
        let mut endpoints = Vec::new();
        // trace back from v to the base
        while bv != bb {
            self.blossom_parent[bv] = Some(b);
            children.push(bv);
            let p = self.label_end[bv].expect("non-base sub-blossom has a label edge");
            endpoints.push(p);
            bv = self.in_blossom[graph.endpoint[p]];
        }
        children.push(bb);
        children.reverse();
        endpoints.reverse();
        endpoints.push(2 * k);
        // and from w to the base, going the other way round
        while bw != bb {
            self.blossom_parent[bw] = Some(b);
            children.push(bw);
            let p = self.label_end[bw].expect("non-base sub-blossom has a label edge");
            endpoints.push(p ^ 1);
            bw = self.in_blossom[graph.endpoint[p]];
        }
        self.blossom_children[b] = children;
        self.blossom_endpoints[b] = endpoints;

        debug_assert_eq!(self.label[bb], BlossomLabel::S);
        self.label[b] = BlossomLabel::S;
        self.label_end[b] = self.label_end[bb];
        self.dual_var[b] = 0.0;

        let leaves: Vec<usize> = self.leaves(b).collect();
        for v in leaves {
            // former T-vertices are now part of an S-blossom and must be scanned
            if self.label[self.in_blossom[v]] == BlossomLabel::T {
                self.queue.push(v);
            }
            self.in_blossom[v] = b;
        }

        // least-slack edge from the new blossom to every other S-blossom,
        // reusing the lists cached by sub-blossoms where they exist
        let mut best_edge_to: Vec<Option<usize>> = vec![None; 2 * self.n_vertices];
        for c in 0..self.blossom_children[b].len() {
            let bv = self.blossom_children[b][c];
            let candidates: Vec<usize> = match self.blossom_best_edges[bv].take() {
                Some(cached) => cached,
                None => self
                    .leaves(bv)
                    .flat_map(|v| graph.neighbend[v].iter().map(|p| p / 2))
                    .collect(),
            };
            for k in candidates {
                let (i, j, _) = graph.edges[k];
                let j = if self.in_blossom[j] == b { i } else { j };
                let bj = self.in_blossom[j];
                if bj != b
                    && self.label[bj] == BlossomLabel::S
                    && best_edge_to[bj].map_or(true, |best| self.slack(k) < self.slack(best))
                {
                    best_edge_to[bj] = Some(k);
                }
            }
            self.best_edge[bv] = None;
        }
        let best_edges: Vec<usize> = best_edge_to.into_iter().flatten().collect();
        let mut best = None;
        for &k in best_edges.iter() {
            if best.map_or(true, |e| self.slack(k) < self.slack(e)) {
                best = Some(k);
            }
        }
        self.best_edge[b] = best;
        self.blossom_best_edges[b] = Some(best_edges);
    }

    /// Dissolve top-level blossom `b` into its sub-blossoms.
    ///
    /// At the end of a stage (`end_stage`) zero-dual sub-blossoms are expanded
    /// recursively. In the middle of a stage `b` is a T-blossom whose dual hit
    /// zero, and the part of its cycle on the alternating path is relabeled.
    pub fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        let graph = self.graph;
        trace!("expanding blossom {} (end of stage: {})", b, end_stage);
        let children = mem::take(&mut self.blossom_children[b]);
        for &s in children.iter() {
            self.blossom_parent[s] = None;
            if s < self.n_vertices {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual_var[s] == 0.0 {
                self.expand_blossom(s, end_stage);
            } else {
                for v in BlossomLeaves::new(&self.blossom_children, self.n_vertices, s) {
                    self.in_blossom[v] = s;
                }
            }
        }

        if !end_stage && self.label[b] == BlossomLabel::T {
            let endpoints = mem::take(&mut self.blossom_endpoints[b]);
            let len = children.len();
            let entry_end = self.label_end[b].expect("T-blossom was reached through an edge");
            // the sub-blossom through which the expanding blossom got its label
            let entry_child = self.in_blossom[graph.endpoint[entry_end ^ 1]];
            let mut j = children
                .iter()
                .position(|&c| c == entry_child)
                .expect("entry child belongs to the blossom") as isize;
            // walk towards the base along the even-length side of the cycle
            let (jstep, endptrick) = if j & 1 == 1 {
                j -= len as isize;
                (1isize, 0usize)
            } else {
                (-1isize, 1usize)
            };
            let back = endptrick as isize;

            let mut p = entry_end;
            while j != 0 {
                // relabel the T-sub-blossom
                let q = endpoints[wrap(j - back, len)];
                self.label[graph.endpoint[p ^ 1]] = BlossomLabel::Unlabeled;
                self.label[graph.endpoint[q ^ endptrick ^ 1]] = BlossomLabel::Unlabeled;
                self.assign_label(graph.endpoint[p ^ 1], BlossomLabel::T, Some(p));
                // step to the next S-sub-blossom and note its forward endpoint
                self.allowed_edge[q / 2] = true;
                j += jstep;
                p = endpoints[wrap(j - back, len)] ^ endptrick;
                // step to the next T-sub-blossom
                self.allowed_edge[p / 2] = true;
                j += jstep;
            }

            // relabel the base T-sub-blossom without stepping through to its mate
            let bv = children[wrap(j, len)];
            let t = graph.endpoint[p ^ 1];
            self.label[t] = BlossomLabel::T;
            self.label[bv] = BlossomLabel::T;
            self.label_end[t] = Some(p);
            self.label_end[bv] = Some(p);
            self.best_edge[bv] = None;

            // the remaining sub-blossoms are only labeled if some S-vertex
            // outside the expanding blossom already reaches them
            j += jstep;
            while children[wrap(j, len)] != entry_child {
                let bv = children[wrap(j, len)];
                if self.label[bv] == BlossomLabel::S {
                    j += jstep;
                    continue;
                }
                let reached = BlossomLeaves::new(&self.blossom_children, self.n_vertices, bv)
                    .find(|&v| self.label[v] != BlossomLabel::Unlabeled);
                if let Some(v) = reached {
                    debug_assert_eq!(self.label[v], BlossomLabel::T);
                    debug_assert_eq!(self.in_blossom[v], bv);
                    self.label[v] = BlossomLabel::Unlabeled;
                    let base = self.blossom_base[bv].expect("sub-blossom has a base");
                    let mbase = self.mate[base].expect("sub-blossom base is matched");
                    self.label[graph.endpoint[mbase]] = BlossomLabel::Unlabeled;
                    let end = self.label_end[v];
                    self.assign_label(v, BlossomLabel::T, end);
                }
                j += jstep;
            }
        }

        // recycle the blossom id
        self.label[b] = BlossomLabel::Unlabeled;
        self.label_end[b] = None;
        self.blossom_endpoints[b] = Vec::new();
        self.blossom_base[b] = None;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = None;
        self.unused_blossoms.push(b);
    }

    /// Flip matched and unmatched edges on the alternating path inside
    /// blossom `b` from vertex `v` to the base, making `v` the new base.
    pub fn augment_blossom(&mut self, b: usize, v: usize) {
        let graph = self.graph;
        // bubble up to the immediate sub-blossom of b containing v
        let mut t = v;
        while self.blossom_parent[t] != Some(b) {
            t = self.blossom_parent[t].expect("vertex lies inside the blossom");
        }
        if t >= self.n_vertices {
            self.augment_blossom(t, v);
        }

        let len = self.blossom_children[b].len();
        let i = self.blossom_children[b]
            .iter()
            .position(|&c| c == t)
            .expect("sub-blossom belongs to its parent");
        let mut j = i as isize;
        let (jstep, endptrick) = if i & 1 == 1 {
            j -= len as isize;
            (1isize, 0usize)
        } else {
            (-1isize, 1usize)
        };
        let back = endptrick as isize;

        while j != 0 {
            j += jstep;
            let t = self.blossom_children[b][wrap(j, len)];
            let p = self.blossom_endpoints[b][wrap(j - back, len)] ^ endptrick;
            if t >= self.n_vertices {
                self.augment_blossom(t, graph.endpoint[p]);
            }
            j += jstep;
            let t = self.blossom_children[b][wrap(j, len)];
            if t >= self.n_vertices {
                self.augment_blossom(t, graph.endpoint[p ^ 1]);
            }
            // match the edge connecting those sub-blossoms
            self.mate[graph.endpoint[p]] = Some(p ^ 1);
            self.mate[graph.endpoint[p ^ 1]] = Some(p);
        }

        // rotate the cycle so that the new base comes first
        self.blossom_children[b].rotate_left(i);
        self.blossom_endpoints[b].rotate_left(i);
        self.blossom_base[b] = self.blossom_base[self.blossom_children[b][0]];
        debug_assert_eq!(self.blossom_base[b], Some(v));
    }

    /// Flip the augmenting path through edge `k`, which joins two S-vertices
    /// of different alternating trees.
    pub fn augment_matching(&mut self, k: usize) {
        let graph = self.graph;
        let (v, w, _) = graph.edges[k];
        trace!("augmenting through edge {} ({}, {})", k, v, w);
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            // match s to remote endpoint p, then trace back to the root
            loop {
                let bs = self.in_blossom[s];
                debug_assert_eq!(self.label[bs], BlossomLabel::S);
                if bs >= self.n_vertices {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = Some(p);

                let Some(q) = self.label_end[bs] else {
                    // reached an exposed root
                    break;
                };
                let bt = self.in_blossom[graph.endpoint[q]];
                debug_assert_eq!(self.label[bt], BlossomLabel::T);
                let r = self.label_end[bt].expect("T-blossom was reached through an edge");
                s = graph.endpoint[r];
                let j = graph.endpoint[r ^ 1];
                if bt >= self.n_vertices {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = Some(r);
                // the opposite endpoint is matched to s on the next step
                p = r ^ 1;
            }
        }
    }

    /// Grow the alternating forest from the queued S-vertices over tight edges.
    ///
    /// Returns true once an augmenting path has been found and applied.
    pub fn search(&mut self) -> bool {
        let graph = self.graph;
        while let Some(v) = self.queue.pop() {
            debug_assert_eq!(self.label[self.in_blossom[v]], BlossomLabel::S);
            for &p in graph.neighbend[v].iter() {
                let k = p / 2;
                let w = graph.endpoint[p];
                // edges inside a blossom are never useful
                if self.in_blossom[v] == self.in_blossom[w] {
                    continue;
                }
                let mut kslack = 0.0;
                if !self.allowed_edge[k] {
                    kslack = self.slack(k);
                    if kslack <= 0.0 {
                        self.allowed_edge[k] = true;
                    }
                }

                let bw = self.in_blossom[w];
                if self.allowed_edge[k] {
                    match self.label[bw] {
                        BlossomLabel::Unlabeled => {
                            // w is free: label it T and its mate S
                            self.assign_label(w, BlossomLabel::T, Some(p ^ 1));
                        }
                        BlossomLabel::S => match self.scan_blossom(v, w) {
                            Some(base) => self.add_blossom(base, k),
                            None => {
                                self.augment_matching(k);
                                return true;
                            }
                        },
                        BlossomLabel::T => {
                            // w sits inside a T-blossom; remember that it is
                            // reachable from outside for a later expansion
                            if self.label[w] == BlossomLabel::Unlabeled {
                                self.label[w] = BlossomLabel::T;
                                self.label_end[w] = Some(p ^ 1);
                            }
                        }
                    }
                } else if self.label[bw] == BlossomLabel::S {
                    let b = self.in_blossom[v];
                    if self.best_edge[b].map_or(true, |e| kslack < self.slack(e)) {
                        self.best_edge[b] = Some(k);
                    }
                } else if self.label[w] == BlossomLabel::Unlabeled
                    && self.best_edge[w].map_or(true, |e| kslack < self.slack(e))
                {
                    self.best_edge[w] = Some(k);
                }
            }
        }
        false
    }

    /// Expand every top-level S-blossom whose dual dropped to zero.
    pub fn expand_tight_s_blossoms(&mut self) {
        for b in self.n_vertices..2 * self.n_vertices {
            if self.is_top_level(b)
                && self.blossom_base[b].is_some()
                && self.label[b] == BlossomLabel::S
                && self.dual_var[b] == 0.0
            {
                self.expand_blossom(b, true);
            }
        }
    }

    /// Translate mate endpoints into partner vertices, `-1` for exposed ones.
    pub fn into_mates(self) -> Vec<i64> {
        let graph = self.graph;
        let endpoint = &graph.endpoint;
        let mates: Vec<i64> = self
            .mate
            .iter()
            .map(|m| m.map_or(-1, |p| endpoint[p] as i64))
            .collect();
        debug_assert!(mates
            .iter()
            .enumerate()
            .all(|(v, &m)| m < 0 || mates[m as usize] == v as i64));
        mates
    }
}
