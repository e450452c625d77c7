use std::collections::HashSet;

use crate::types::PlaceCandidate;

/// Drop candidates whose identity was already seen, keeping first occurrences in order.
pub fn dedupe_by_identity(candidates: Vec<PlaceCandidate>) -> Vec<PlaceCandidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.identity))
        .collect()
}
