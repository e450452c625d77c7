//! Location ranking: dedupe, score, and order geocoder candidates.
//!
//! Order, most preferred first:
//! 1. prefix match before non-match
//! 2. country match before non-match
//! 3. both have a distance: nearer first; only one has a distance: it wins;
//!    neither: higher provider importance first (missing counts as 0)
//!
//! The sort is stable, so full ties keep their input order.

use std::cmp::Ordering;

use crate::dedup::dedupe_by_identity;
use crate::geo::{distance_to_reference, is_country_match, is_prefix_match};
use crate::types::{PlaceCandidate, RankedCandidate, RankedSplit, ReferenceLocation};

/// Rank candidates for `query` relative to an optional reference location.
pub fn rank(
    candidates: Vec<PlaceCandidate>,
    query: &str,
    reference: Option<&ReferenceLocation>,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = dedupe_by_identity(candidates)
        .into_iter()
        .map(|candidate| RankedCandidate {
            distance_km: distance_to_reference(&candidate, reference),
            is_prefix_match: is_prefix_match(&candidate, query),
            is_country_match: is_country_match(&candidate, reference),
            candidate,
        })
        .collect();

    // slice::sort_by is stable
    ranked.sort_by(compare);
    ranked
}

/// Rank, then take the first `local_size` results as local and the next
/// `total_size - local_size` as global.
pub fn rank_and_split(
    candidates: Vec<PlaceCandidate>,
    query: &str,
    reference: Option<&ReferenceLocation>,
    local_size: usize,
    total_size: usize,
) -> RankedSplit {
    let mut ranked = rank(candidates, query, reference).into_iter();
    let local: Vec<_> = ranked.by_ref().take(local_size).collect();
    let global: Vec<_> = ranked.take(total_size.saturating_sub(local_size)).collect();

    tracing::debug!(
        "Ranked \"{}\": {} local, {} global",
        query.trim(),
        local.len(),
        global.len()
    );

    RankedSplit { local, global }
}

fn compare(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.is_prefix_match
        .cmp(&a.is_prefix_match)
        .then_with(|| b.is_country_match.cmp(&a.is_country_match))
        .then_with(|| match (a.distance_km, b.distance_km) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b
                .candidate
                .importance_or_zero()
                .total_cmp(&a.candidate.importance_or_zero()),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::PlaceAddress;

    fn place(id: u64, name: &str, country_code: &str, coords: Option<(f64, f64)>) -> PlaceCandidate {
        let (lat, lon) = coords
            .map(|(lat, lon)| (lat.to_string(), lon.to_string()))
            .unwrap_or_default();
        PlaceCandidate {
            identity: id,
            name: name.to_string(),
            display_name: format!("{name}, {country_code}"),
            latitude: lat,
            longitude: lon,
            category: "place".to_string(),
            place_type: "city".to_string(),
            importance: None,
            address: Some(PlaceAddress {
                country_code: Some(country_code.to_lowercase()),
                ..Default::default()
            }),
        }
    }

    fn with_importance(mut p: PlaceCandidate, importance: f64) -> PlaceCandidate {
        p.importance = Some(importance);
        p
    }

    fn ids(ranked: &[RankedCandidate]) -> Vec<u64> {
        ranked.iter().map(|r| r.candidate.identity).collect()
    }

    fn london() -> ReferenceLocation {
        ReferenceLocation {
            country_code: Some("GB".into()),
            country_name: Some("United Kingdom".into()),
            latitude: Some(51.5074),
            longitude: Some(-0.1278),
            ..Default::default()
        }
    }

    #[test]
    fn test_country_match_breaks_prefix_tie() {
        let candidates = vec![place(1, "Paris", "FR", None), place(2, "Paris", "US", None)];
        let reference = ReferenceLocation {
            country_code: Some("US".into()),
            ..Default::default()
        };
        let ranked = rank(candidates, "Paris", Some(&reference));
        assert_eq!(ids(&ranked), vec![2, 1]);
        assert!(ranked.iter().all(|r| r.is_prefix_match));
        assert!(ranked[0].is_country_match);
        assert!(!ranked[1].is_country_match);
        assert!(ranked.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn test_prefix_match_outranks_country_match() {
        let candidates = vec![
            place(1, "Upper Norwich", "GB", Some((52.6, 1.3))),
            place(2, "Norwich", "US", Some((41.5, -72.1))),
        ];
        let ranked = rank(candidates, "norwich", Some(&london()));
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_nearer_candidate_first() {
        let candidates = vec![
            place(1, "Birmingham", "GB", Some((52.4862, -1.8904))),
            place(2, "Birmingham", "GB", Some((51.52, -0.2))),
        ];
        let ranked = rank(candidates, "Birmingham", Some(&london()));
        assert_eq!(ids(&ranked), vec![2, 1]);
        assert!(ranked[0].distance_km.unwrap() < ranked[1].distance_km.unwrap());
    }

    #[test]
    fn test_candidate_with_distance_beats_one_without() {
        let candidates = vec![
            with_importance(place(1, "Glasgow", "GB", None), 0.9),
            place(2, "Glasgow", "GB", Some((55.8642, -4.2518))),
        ];
        let ranked = rank(candidates, "Glasgow", Some(&london()));
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_importance_fallback_without_reference() {
        let candidates = vec![
            place(1, "Malta", "MT", Some((35.9, 14.4))),
            with_importance(place(2, "Malta", "US", Some((48.3, -107.8))), 0.4),
            with_importance(place(3, "Malta", "IT", Some((35.9, 14.5))), 0.7),
        ];
        let ranked = rank(candidates, "malta", None);
        assert_eq!(ids(&ranked), vec![3, 2, 1]);
    }

    #[test]
    fn test_stable_on_full_ties() {
        let candidates = vec![
            place(10, "Springfield", "US", None),
            place(4, "Springfield", "US", None),
            place(7, "Springfield", "US", None),
        ];
        let ranked = rank(candidates, "Springfield", None);
        assert_eq!(ids(&ranked), vec![10, 4, 7]);
    }

    #[test]
    fn test_rank_is_unchanged_by_prior_dedup() {
        let candidates = vec![
            place(1, "London", "GB", Some((51.5, -0.12))),
            place(2, "London", "CA", Some((42.98, -81.24))),
            place(1, "London (dup)", "GB", Some((51.5, -0.12))),
            place(3, "Londonderry", "GB", Some((54.99, -7.3))),
        ];
        let direct = rank(candidates.clone(), "London", Some(&london()));
        let prededuped = rank(dedupe_by_identity(candidates), "London", Some(&london()));
        assert_eq!(direct, prededuped);
        assert_eq!(direct.len(), 3);
        assert_eq!(direct[0].candidate.name, "London");
    }

    #[test]
    fn test_empty_input_ranks_to_empty() {
        assert!(rank(Vec::new(), "anything", Some(&london())).is_empty());
        assert!(rank_and_split(Vec::new(), "x", None, 3, 6).is_empty());
    }

    #[test]
    fn test_split_sizes() {
        let candidates: Vec<_> = (1..=8)
            .map(|i| with_importance(place(i, "Town", "GB", None), 1.0 - i as f64 / 10.0))
            .collect();
        let split = rank_and_split(candidates, "town", None, 3, 6);
        assert_eq!(ids(&split.local), vec![1, 2, 3]);
        assert_eq!(ids(&split.global), vec![4, 5, 6]);
        assert_eq!(split.first().unwrap().candidate.identity, 1);
    }

    #[test]
    fn test_split_with_fewer_results_than_sizes() {
        let candidates = vec![place(1, "A", "GB", None), place(2, "B", "GB", None)];
        let split = rank_and_split(candidates, "a", None, 3, 6);
        assert_eq!(split.local.len(), 2);
        assert!(split.global.is_empty());
    }

    #[test]
    fn test_split_total_below_local() {
        let candidates: Vec<_> = (1..=5).map(|i| place(i, "X", "GB", None)).collect();
        let split = rank_and_split(candidates, "x", None, 4, 2);
        assert_eq!(split.local.len(), 4);
        assert!(split.global.is_empty());
    }
}
