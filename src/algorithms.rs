use log::{debug, trace};
use num::ToPrimitive;

use crate::blossom_data::BlossomData;
use crate::error::Result;
use crate::graph::MatchingGraph;
use crate::input::validate_edges;
use crate::types::{Edge, MatchingOptions, UNMATCHED};

/// Edmonds' blossom algorithm for maximum weight matchings.
///
/// Takes as input a list of edges of the form (u, v, w) where u and v are vertices
/// and w is a finite weight. Vertices `0..=max(u, v)` are assumed to exist, whether
/// or not they appear in an edge.
///
/// Input `max_cardinality` should be `true` if only maximum cardinality matchings
/// should be considered as solutions.
///
/// Returns a list of "mates" to each vertex. Vertex u is matched to `mate[u]` if
/// `mate[u] >= 0` and u is unmatched if `mate[u] == -1`.
///
/// The caller is responsible for not passing parallel edges.
pub fn max_weight_matching<W: ToPrimitive + Copy>(
    weighted_edges: &[Edge<W>],
    max_cardinality: bool,
) -> Result<Vec<i64>> {
    max_weight_matching_with(
        weighted_edges,
        MatchingOptions::new().max_cardinality(max_cardinality),
    )
}

/// Same as [`max_weight_matching`] with every knob exposed.
///
/// # Panics
///
/// With `verify_optimum` or `check_delta` enabled, panics if the engine ends up
/// in an inconsistent state. That always indicates a bug in this crate.
pub fn max_weight_matching_with<W: ToPrimitive + Copy>(
    weighted_edges: &[Edge<W>],
    options: MatchingOptions,
) -> Result<Vec<i64>> {
    let edges = validate_edges(weighted_edges)?;
    Ok(match_validated(edges, options))
}

/// Maximum cardinality matching of least total weight.
///
/// Negates the weights and runs the maximum-cardinality variant of
/// [`max_weight_matching`].
pub fn min_weight_max_cardinality_matching<W: ToPrimitive + Copy>(
    weighted_edges: &[Edge<W>],
) -> Result<Vec<i64>> {
    let negated: Vec<Edge<f64>> = validate_edges(weighted_edges)?
        .into_iter()
        .map(|(i, j, w)| (i, j, -w))
        .collect();
    Ok(match_validated(negated, MatchingOptions::new().max_cardinality(true)))
}

fn match_validated(edges: Vec<Edge<f64>>, options: MatchingOptions) -> Vec<i64> {
    if edges.is_empty() {
        return Vec::new();
    }
    let graph = MatchingGraph::from_edges(edges);
    run_stages(&graph, options)
}

fn run_stages(graph: &MatchingGraph, options: MatchingOptions) -> Vec<i64> {
    let n_vertices = graph.n_vertices;
    debug!(
        "matching {} vertices and {} edges (max cardinality: {})",
        n_vertices,
        graph.n_edges(),
        options.max_cardinality
    );
    let mut blossom_data = BlossomData::new(graph);

    // every stage either adds one edge to the matching or proves that none
    // can be added, so there are at most n_vertices / 2 useful stages
    for stage in 0..n_vertices {
        blossom_data.clear();
        blossom_data.label_exposed_vertices();

        let mut augmented = false;
        loop {
            if blossom_data.search() {
                augmented = true;
                break;
            }

            // no augmenting path over tight edges; pump slack out of the duals
            if options.check_delta {
                blossom_data.check_delta2();
                blossom_data.check_delta3();
            }
            let (delta, kind) = blossom_data.determine_delta(options.max_cardinality);
            trace!("stage {}: delta {} from {:?}", stage, delta, kind);
            blossom_data.update_dual_soln(delta);
            if blossom_data.update_blossom_structure(kind) {
                break;
            }
        }

        debug!("stage {} finished, augmented: {}", stage, augmented);
        // without an augmenting path no later stage can find one either
        if !augmented {
            break;
        }
        blossom_data.expand_tight_s_blossoms();
    }

    if options.verify_optimum {
        if let Err(violation) = blossom_data.verify_optimum(options.max_cardinality) {
            panic!("matching failed its optimality check: {}", violation);
        }
    }

    let mates = blossom_data.into_mates();
    debug!("matched {} pairs", matching_cardinality(&mates));
    mates
}

/// Number of matched pairs in a mate array.
pub fn matching_cardinality(mates: &[i64]) -> usize {
    mates.iter().filter(|&&m| m != UNMATCHED).count() / 2
}

/// Every matched pair once, as `(u, v)` with `u < v`.
pub fn matched_pairs(mates: &[i64]) -> Vec<(usize, usize)> {
    mates
        .iter()
        .enumerate()
        .filter(|&(u, &v)| v != UNMATCHED && (u as i64) < v)
        .map(|(u, &v)| (u, v as usize))
        .collect()
}

/// Total weight of the edges selected by a mate array.
///
/// The edges are validated like the matching entry points do, so a weight that
/// cannot be represented as a finite `f64` is an `InvalidWeight` error here too.
pub fn matching_weight<W: ToPrimitive + Copy>(
    weighted_edges: &[Edge<W>],
    mates: &[i64],
) -> Result<f64> {
    let edges = validate_edges(weighted_edges)?;
    Ok(edges
        .iter()
        .filter(|&&(u, v, _)| mates.get(u).copied() == Some(v as i64))
        .map(|&(_, _, w)| w)
        .sum())
}
