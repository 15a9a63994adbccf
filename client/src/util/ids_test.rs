use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn generate_id_with_has_prefix_time_and_suffix() {
    let mut rng = StdRng::seed_from_u64(1);
    let id = generate_id_with("assistant", 1_700_000_000_000, &mut rng);
    let parts: Vec<&str> = id.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "assistant");
    assert_eq!(parts[1], "1700000000000");
    assert_eq!(parts[2].len(), 9);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn same_millisecond_ids_still_differ() {
    let mut rng = StdRng::seed_from_u64(42);
    let ids: HashSet<String> = (0..500)
        .map(|_| generate_id_with("msg", 1, &mut rng))
        .collect();
    assert_eq!(ids.len(), 500);
}

#[test]
fn generate_id_uses_prefix() {
    assert!(generate_id("ctx").starts_with("ctx-"));
}
