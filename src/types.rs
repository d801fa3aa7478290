/// An undirected weighted edge `(u, v, weight)`.
pub type Edge<W> = (usize, usize, W);

/// Entry of a mate array for a vertex that is not covered by the matching.
pub const UNMATCHED: i64 = -1;

/// Largest accepted vertex id. The engine allocates `2 * (id + 1)` slots for the
/// highest id it sees, so ids are capped well below `usize::MAX`.
pub const MAX_VERTEX: usize = (u32::MAX / 4) as usize;

/// Role of a top-level blossom (or vertex) in the alternating forest.
///
/// A vertex inside a T-blossom additionally carries `T` on its own entry once it
/// is reachable from an S-vertex outside that blossom; expansion relies on it.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BlossomLabel {
    Unlabeled,
    /// Outer: even distance from an exposed root.
    S,
    /// Inner: odd distance from an exposed root.
    T,
}

/// The bound that limited the last dual adjustment, together with the edge or
/// blossom that attained it.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum DeltaKind {
    /// Some vertex dual reached zero; the stage cannot make further progress.
    VertexDual,
    /// An edge from an S-vertex to a free vertex became tight.
    FreeVertexEdge(usize),
    /// An edge between two different S-blossoms became tight.
    SBlossomEdge(usize),
    /// The dual of a top-level T-blossom reached zero.
    TBlossomDual(usize),
}

/// Knobs for a single matching run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchingOptions {
    /// Only consider maximum-cardinality matchings, breaking ties by weight.
    pub max_cardinality: bool,
    /// Check the dual certificate after the last stage and panic if it is broken.
    pub verify_optimum: bool,
    /// Cross-check the cached least-slack edges before every dual adjustment.
    pub check_delta: bool,
}

impl MatchingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_cardinality(mut self, enabled: bool) -> Self {
        self.max_cardinality = enabled;
        self
    }

    pub fn verify_optimum(mut self, enabled: bool) -> Self {
        self.verify_optimum = enabled;
        self
    }

    pub fn check_delta(mut self, enabled: bool) -> Self {
        self.check_delta = enabled;
        self
    }
}
