use blossom_matching::{matched_pairs, matching_weight, max_weight_matching, MatchingError};

fn main() -> Result<(), MatchingError> {
    env_logger::init();

    let weighted_edges = vec![
        (1, 2, 2.),
        (1, 3, -2.),
        (2, 3, 1.),
        (2, 4, -1.),
        (3, 4, -6.),
    ];

    for max_cardinality in [false, true] {
        let mates = max_weight_matching(&weighted_edges, max_cardinality)?;
        let weight = matching_weight(&weighted_edges, &mates)?;
        println!(
            "max_cardinality = {}: mates {:?}, pairs {:?}, weight {}",
            max_cardinality,
            mates,
            matched_pairs(&mates),
            weight
        );
    }
    Ok(())
}
