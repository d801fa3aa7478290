//! Maximum weight matching in general undirected graphs.
//!
//! An implementation of Edmonds' blossom algorithm with the primal-dual method,
//! running in O(n^3) time. See [`max_weight_matching`] for the entry point.

pub mod algorithms;
pub mod blossom_data;
pub mod dual;
pub mod error;
pub mod graph;
pub mod input;
pub mod types;
pub mod verify;

pub use algorithms::{
    matched_pairs, matching_cardinality, matching_weight, max_weight_matching,
    max_weight_matching_with, min_weight_max_cardinality_matching,
};
pub use error::{MatchingError, OptimalityViolation, Result};
pub use types::{Edge, MatchingOptions, MAX_VERTEX, UNMATCHED};

#[cfg(test)]
mod tests {
    use crate::algorithms::*;
    use crate::types::MatchingOptions;

    fn checked(weighted_edges: &[(usize, usize, f64)], max_cardinality: bool) -> Vec<i64> {
        let options = MatchingOptions::new()
            .max_cardinality(max_cardinality)
            .verify_optimum(true)
            .check_delta(true);
        max_weight_matching_with(weighted_edges, options).unwrap()
    }

    #[test]
    fn empty_input() {
        let weighted_edges: Vec<(usize, usize, f64)> = vec![];
        assert_eq!(max_weight_matching(&weighted_edges, false).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn single_edge() {
        let matching = max_weight_matching(&[(0, 1, 1)], false).unwrap();
        assert_eq!(matching, vec![1, 0]);
    }

    #[test]
    fn heavier_edge_wins() {
        let weighted_edges = vec![(1, 2, 10.), (2, 3, 11.)];
        assert_eq!(checked(&weighted_edges, false), vec![-1, -1, 3, 2]);
    }

    #[test]
    fn max_weight_matching1() {
        let weighted_edges = vec![(1, 2, 5.), (2, 3, 11.), (3, 4, 5.)];
        assert_eq!(checked(&weighted_edges, false), vec![-1, -1, 3, 2, -1]);
        assert_eq!(checked(&weighted_edges, true), vec![-1, 2, 1, 4, 3]);
    }

    #[test]
    fn float_weights() {
        let weighted_edges = vec![
            (1, 2, std::f64::consts::PI),
            (2, 3, std::f64::consts::E),
            (1, 3, 3.0),
            (1, 4, 2f64.sqrt()),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 4, 3, 2, 1]);
    }

    #[test]
    fn max_weight_max_card_matching() {
        let weighted_edges = vec![
            (1, 2, 2.),
            (1, 3, -2.),
            (2, 3, 1.),
            (2, 4, -1.),
            (3, 4, -6.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 2, 1, -1, -1]);
        assert_eq!(checked(&weighted_edges, true), vec![-1, 3, 4, 1, 2]);
    }

    #[test]
    fn s_blossom_augmentation() {
        let weighted_edges = vec![(1, 2, 8.), (1, 3, 9.), (2, 3, 10.), (3, 4, 7.)];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 2, 1, 4, 3]);

        let weighted_edges = vec![
            (1, 2, 8.),
            (1, 3, 9.),
            (2, 3, 10.),
            (3, 4, 7.),
            (1, 6, 5.),
            (4, 5, 6.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 5, 4, 1]);
    }

    #[test]
    fn s_blossom_relabeled_as_t() {
        let weighted_edges = vec![
            (1, 2, 9.),
            (1, 3, 8.),
            (2, 3, 10.),
            (1, 4, 5.),
            (4, 5, 4.),
            (1, 6, 3.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 5, 4, 1]);

        let weighted_edges = vec![
            (1, 2, 9.),
            (1, 3, 8.),
            (2, 3, 10.),
            (1, 4, 5.),
            (4, 5, 3.),
            (1, 6, 4.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 5, 4, 1]);

        let weighted_edges = vec![
            (1, 2, 9.),
            (1, 3, 8.),
            (2, 3, 10.),
            (1, 4, 5.),
            (4, 5, 3.),
            (3, 6, 4.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 2, 1, 6, 5, 4, 3]);
    }

    #[test]
    fn max_weight_matching2() {
        // nested S-blossom used for augmentation
        let weighted_edges = vec![
            (1, 2, 9.),
            (1, 3, 9.),
            (2, 3, 10.),
            (2, 4, 8.),
            (3, 5, 8.),
            (4, 5, 10.),
            (5, 6, 6.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 3, 4, 1, 2, 6, 5]);
    }

    #[test]
    fn s_blossom_nested_after_relabel() {
        let weighted_edges = vec![
            (1, 2, 10.),
            (1, 7, 10.),
            (2, 3, 12.),
            (3, 4, 20.),
            (3, 5, 20.),
            (4, 5, 25.),
            (5, 6, 10.),
            (6, 7, 10.),
            (7, 8, 8.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 2, 1, 4, 3, 6, 5, 8, 7]);
    }

    #[test]
    fn nested_s_blossom_expanded_recursively() {
        let weighted_edges = vec![
            (1, 2, 8.),
            (1, 3, 8.),
            (2, 3, 10.),
            (2, 4, 12.),
            (3, 5, 12.),
            (4, 5, 14.),
            (4, 6, 12.),
            (5, 7, 12.),
            (6, 7, 14.),
            (7, 8, 12.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 2, 1, 5, 6, 3, 4, 8, 7]);
    }

    #[test]
    fn s_blossom_relabeled_as_t_and_expanded() {
        let weighted_edges = vec![
            (1, 2, 23.),
            (1, 5, 22.),
            (1, 6, 15.),
            (2, 3, 25.),
            (3, 4, 22.),
            (4, 5, 25.),
            (4, 8, 14.),
            (5, 7, 13.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 8, 7, 1, 5, 4]);
    }

    #[test]
    fn nested_s_blossom_relabeled_as_t_and_expanded() {
        let weighted_edges = vec![
            (1, 2, 19.),
            (1, 3, 20.),
            (1, 8, 8.),
            (2, 3, 25.),
            (2, 4, 18.),
            (3, 5, 18.),
            (4, 5, 13.),
            (4, 7, 7.),
            (5, 6, 7.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 8, 3, 2, 7, 6, 5, 4, 1]);
    }

    #[test]
    fn t_blossom_relabeled_in_several_ways() {
        let weighted_edges = vec![
            (1, 2, 45.),
            (1, 5, 45.),
            (2, 3, 50.),
            (3, 4, 45.),
            (4, 5, 50.),
            (1, 6, 30.),
            (3, 9, 35.),
            (4, 8, 35.),
            (5, 7, 26.),
            (9, 10, 5.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 8, 7, 1, 5, 4, 10, 9]);

        let weighted_edges = vec![
            (1, 2, 45.),
            (1, 5, 45.),
            (2, 3, 50.),
            (3, 4, 45.),
            (4, 5, 50.),
            (1, 6, 30.),
            (3, 9, 35.),
            (4, 8, 26.),
            (5, 7, 40.),
            (9, 10, 5.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 8, 7, 1, 5, 4, 10, 9]);
    }

    #[test]
    fn t_blossom_expansion_exposes_least_slack_edge() {
        let weighted_edges = vec![
            (1, 2, 45.),
            (1, 5, 45.),
            (2, 3, 50.),
            (3, 4, 45.),
            (4, 5, 50.),
            (1, 6, 30.),
            (3, 9, 35.),
            (4, 8, 28.),
            (5, 7, 26.),
            (9, 10, 5.),
        ];
        assert_eq!(checked(&weighted_edges, false), vec![-1, 6, 3, 2, 8, 7, 1, 5, 4, 10, 9]);
    }

    #[test]
    fn inner_blossom_ends_up_on_augmenting_path() {
        // nested blossom relabeled as T in more than one way, outer blossom
        // expanded so that the inner one ends up on an augmenting path
        let weighted_edges = vec![
            (1, 2, 45.),
            (1, 7, 45.),
            (2, 3, 50.),
            (3, 4, 45.),
            (4, 5, 95.),
            (4, 6, 94.),
            (5, 6, 94.),
            (6, 7, 50.),
            (1, 8, 30.),
            (3, 11, 35.),
            (5, 9, 36.),
            (7, 10, 26.),
            (11, 12, 5.),
        ];
        assert_eq!(
            checked(&weighted_edges, false),
            vec![-1, 8, 3, 2, 6, 9, 4, 10, 1, 5, 7, 12, 11]
        );
    }

    #[test]
    fn nested_s_blossom_relabeled_as_s_and_expanded() {
        // nested S-blossom relabeled as S, then expanded recursively
        let weighted_edges = vec![
            (1, 2, 40.),
            (1, 3, 40.),
            (2, 3, 60.),
            (2, 4, 55.),
            (3, 5, 55.),
            (4, 5, 50.),
            (1, 8, 15.),
            (5, 7, 30.),
            (7, 6, 10.),
            (8, 10, 10.),
            (4, 9, 30.),
        ];
        assert_eq!(
            checked(&weighted_edges, false),
            vec![-1, 2, 1, 5, 9, 3, 7, 6, 10, 4, 8]
        );
    }

    #[test]
    fn rerunning_gives_identical_result() {
        let weighted_edges = vec![
            (1, 2, 9.),
            (1, 3, 9.),
            (2, 3, 10.),
            (2, 4, 8.),
            (3, 5, 8.),
            (4, 5, 10.),
            (5, 6, 6.),
        ];
        let first = max_weight_matching(&weighted_edges, false).unwrap();
        let second = max_weight_matching(&weighted_edges, false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn huge_vertex_id_is_reported_before_matching() {
        assert!(matches!(
            max_weight_matching(&[(0usize, usize::MAX, 1.0)], false),
            Err(crate::MatchingError::InvalidVertex { index: 0, .. })
        ));
        assert!(matches!(
            min_weight_max_cardinality_matching(&[(1usize << 40, 0usize, 1.0)]),
            Err(crate::MatchingError::InvalidVertex { index: 0, .. })
        ));
    }

    #[test]
    fn invalid_weight_is_reported_before_matching() {
        let weighted_edges = vec![(0, 1, 1.), (1, 2, f64::NEG_INFINITY)];
        assert!(matches!(
            max_weight_matching(&weighted_edges, false),
            Err(crate::MatchingError::InvalidWeight { index: 1, .. })
        ));
    }
}
