//! Validation of caller-supplied edge lists.
//!
//! Every entry point runs its edges through here before the engine allocates
//! anything. Parallel edges are not detected: the engine accepts them but the
//! result is only meaningful when each vertex pair appears at most once.
//! Vertex ids above [`MAX_VERTEX`] are rejected.

use num::ToPrimitive;

use crate::error::{MatchingError, Result};
use crate::types::{Edge, MAX_VERTEX};

/// Convert loosely-typed rows `[u, v, weight]` into edges.
///
/// Vertex fields must hold non-negative integers; the weight must be finite.
pub fn edges_from_rows(rows: &[Vec<f64>]) -> Result<Vec<Edge<f64>>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            if row.len() != 3 {
                return Err(MatchingError::MalformedInput {
                    index,
                    reason: format!(
                        "expected (vertex, vertex, weight), found {} fields",
                        row.len()
                    ),
                });
            }
            let u = vertex_from_f64(index, row[0])?;
            let v = vertex_from_f64(index, row[1])?;
            let weight = finite_weight(index, row[2])?;
            check_distinct(index, u, v)?;
            Ok((u, v, weight))
        })
        .collect()
}

/// Convert one edge given with signed vertex ids.
pub fn edge_from_signed(index: usize, edge: (i64, i64, f64)) -> Result<Edge<f64>> {
    let (u, v, weight) = edge;
    let u = vertex_from_i64(index, u)?;
    let v = vertex_from_i64(index, v)?;
    let weight = finite_weight(index, weight)?;
    check_distinct(index, u, v)?;
    Ok((u, v, weight))
}

/// Check a typed edge list and convert its weights to `f64`.
pub(crate) fn validate_edges<W: ToPrimitive + Copy>(
    edges: &[Edge<W>],
) -> Result<Vec<Edge<f64>>> {
    edges
        .iter()
        .enumerate()
        .map(|(index, &(u, v, w))| {
            let weight = w
                .to_f64()
                .ok_or(MatchingError::InvalidWeight { index, value: f64::NAN })?;
            let weight = finite_weight(index, weight)?;
            check_vertex(index, u)?;
            check_vertex(index, v)?;
            check_distinct(index, u, v)?;
            Ok((u, v, weight))
        })
        .collect()
}

fn check_vertex(index: usize, u: usize) -> Result<usize> {
    if u > MAX_VERTEX {
        return Err(MatchingError::InvalidVertex {
            index,
            value: u as f64,
        });
    }
    Ok(u)
}

fn vertex_from_f64(index: usize, value: f64) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(MatchingError::InvalidVertex { index, value });
    }
    let u = value
        .to_usize()
        .ok_or(MatchingError::InvalidVertex { index, value })?;
    check_vertex(index, u)
}

fn vertex_from_i64(index: usize, value: i64) -> Result<usize> {
    let u = value.to_usize().ok_or(MatchingError::InvalidVertex {
        index,
        value: value as f64,
    })?;
    check_vertex(index, u)
}

fn finite_weight(index: usize, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MatchingError::InvalidWeight { index, value })
    }
}

fn check_distinct(index: usize, u: usize, v: usize) -> Result<()> {
    if u == v {
        return Err(MatchingError::MalformedInput {
            index,
            reason: format!("self-loop on vertex {}", u),
        });
    }
    Ok(())
}
