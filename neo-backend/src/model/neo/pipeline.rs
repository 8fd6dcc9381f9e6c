///! Pure working-set operations: flatten, filter, sort, closest approach and stats
use std::cmp::Ordering;

use neo_common::{FilterMode, SortKey};

use super::types::{FeedResult, NearEarthObject, NeoStats};

/// Concatenate every date group in feed order.
///
/// Objects listed under several dates are kept once per date.
pub fn flatten(feed: FeedResult) -> Vec<NearEarthObject> {
    let mut objects = Vec::with_capacity(feed.object_count());
    for group in feed.groups {
        objects.extend(group.objects);
    }
    objects
}

pub fn filter(objects: &[NearEarthObject], mode: FilterMode) -> Vec<NearEarthObject> {
    objects
        .iter()
        .filter(|o| mode.accepts(o.is_hazardous))
        .cloned()
        .collect()
}

fn compare(a: &NearEarthObject, b: &NearEarthObject, key: SortKey) -> Ordering {
    let (approach_a, approach_b) = (a.representative_approach(), b.representative_approach());
    match key {
        SortKey::Date => approach_a
            .approach_timestamp
            .cmp(&approach_b.approach_timestamp),
        SortKey::Distance => approach_a
            .miss_distance_km
            .total_cmp(&approach_b.miss_distance_km),
        SortKey::Speed => approach_b
            .relative_velocity_km_per_sec
            .total_cmp(&approach_a.relative_velocity_km_per_sec),
        SortKey::Size => b
            .estimated_diameter_max_km
            .total_cmp(&a.estimated_diameter_max_km),
    }
}

/// Stable sort into a new vector; equal keys keep their input order.
pub fn sort(objects: &[NearEarthObject], key: SortKey) -> Vec<NearEarthObject> {
    let mut sorted = objects.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key));
    sorted
}

/// Object with the smallest miss distance; the first one wins on ties.
pub fn closest(objects: &[NearEarthObject]) -> Option<&NearEarthObject> {
    let mut iter = objects.iter();
    let mut best = iter.next()?;
    for candidate in iter {
        if candidate.miss_distance_km() < best.miss_distance_km() {
            best = candidate;
        }
    }
    Some(best)
}

pub fn stats(objects: &[NearEarthObject]) -> NeoStats {
    let total = objects.len();
    let hazardous_count = objects.iter().filter(|o| o.is_hazardous).count();
    let closest_distance_thousand_km = closest(objects)
        .map(|o| (o.miss_distance_km() / 1000.0).round() as u64)
        .unwrap_or(0);

    NeoStats {
        total,
        hazardous_count,
        safe_count: total - hazardous_count,
        closest_distance_thousand_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::neo::types::{DateGroup, sample_neo};

    fn ids(objects: &[NearEarthObject]) -> Vec<&str> {
        objects.iter().map(|o| o.id.as_str()).collect()
    }

    /// Mixed set with deliberate ties on every key
    fn mixed_set() -> Vec<NearEarthObject> {
        vec![
            sample_neo("a", true, 50_000.0, 10.0, 0.50, "2024-01-15 10:00"),
            sample_neo("b", false, 20_000.0, 25.0, 0.10, "2024-01-15 08:00"),
            sample_neo("c", false, 50_000.0, 10.0, 0.50, "2024-01-16 00:00"),
            sample_neo("d", true, 75_000.0, 25.0, 1.20, "2024-01-15 08:00"),
            sample_neo("e", false, 20_000.0, 3.5, 0.10, "2024-01-14 23:59"),
        ]
    }

    fn group(date: &str, objects: Vec<NearEarthObject>) -> DateGroup {
        DateGroup { date: date.to_string(), objects }
    }

    #[test]
    fn test_flatten_preserves_group_and_item_order() {
        let set = mixed_set();
        let feed = FeedResult::new(vec![
            group("2024-01-16", vec![set[2].clone()]),
            group("2024-01-15", vec![set[0].clone(), set[1].clone(), set[3].clone()]),
            group("2024-01-17", vec![]),
            group("2024-01-14", vec![set[4].clone()]),
        ]);
        let flat = flatten(feed);
        assert_eq!(flat.len(), 1 + 3 + 0 + 1);
        assert_eq!(ids(&flat), vec!["c", "a", "b", "d", "e"]);
    }

    #[test]
    fn test_flatten_keeps_duplicates() {
        let neo = sample_neo("dup", false, 1.0, 1.0, 1.0, "2024-01-15 00:00");
        let feed = FeedResult::new(vec![
            group("2024-01-15", vec![neo.clone()]),
            group("2024-01-16", vec![neo]),
        ]);
        assert_eq!(ids(&flatten(feed)), vec!["dup", "dup"]);
    }

    #[test]
    fn test_filter_partitions_set() {
        let set = mixed_set();
        let all = filter(&set, FilterMode::All);
        let hazardous = filter(&set, FilterMode::HazardousOnly);
        let safe = filter(&set, FilterMode::SafeOnly);

        assert_eq!(all, set);
        assert_eq!(ids(&hazardous), vec!["a", "d"]);
        assert_eq!(ids(&safe), vec!["b", "c", "e"]);
        assert_eq!(hazardous.len() + safe.len(), all.len());
        assert!(hazardous.iter().all(|h| !safe.iter().any(|s| s.id == h.id)));
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter(&[], FilterMode::HazardousOnly).is_empty());
    }

    #[test]
    fn test_sort_orders_by_key() {
        let set = mixed_set();

        let by_date = sort(&set, SortKey::Date);
        assert!(by_date.windows(2).all(|w| {
            w[0].representative_approach().approach_timestamp
                <= w[1].representative_approach().approach_timestamp
        }));

        let by_distance = sort(&set, SortKey::Distance);
        assert!(by_distance.windows(2).all(|w| w[0].miss_distance_km() <= w[1].miss_distance_km()));

        let by_speed = sort(&set, SortKey::Speed);
        assert!(by_speed.windows(2).all(|w| {
            w[0].representative_approach().relative_velocity_km_per_sec
                >= w[1].representative_approach().relative_velocity_km_per_sec
        }));

        let by_size = sort(&set, SortKey::Size);
        assert!(by_size
            .windows(2)
            .all(|w| w[0].estimated_diameter_max_km >= w[1].estimated_diameter_max_km));
    }

    #[test]
    fn test_sort_is_stable() {
        let set = mixed_set();
        assert_eq!(ids(&sort(&set, SortKey::Date)), vec!["e", "b", "d", "a", "c"]);
        assert_eq!(ids(&sort(&set, SortKey::Distance)), vec!["b", "e", "a", "c", "d"]);
        assert_eq!(ids(&sort(&set, SortKey::Speed)), vec!["b", "d", "a", "c", "e"]);
        assert_eq!(ids(&sort(&set, SortKey::Size)), vec!["d", "a", "c", "b", "e"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let set = mixed_set();
        let before = set.clone();
        let _ = sort(&set, SortKey::Speed);
        assert_eq!(set, before);
    }

    #[test]
    fn test_closest() {
        assert!(closest(&[]).is_none());

        let set = mixed_set();
        let found = closest(&set).unwrap();
        assert_eq!(found.id, "b");
        assert!(set.iter().all(|o| found.miss_distance_km() <= o.miss_distance_km()));

        // Same minimum regardless of order; ties go to the first occurrence
        let mut reversed = set.clone();
        reversed.reverse();
        let found = closest(&reversed).unwrap();
        assert_eq!(found.id, "e");
        assert_eq!(found.miss_distance_km(), 20_000.0);
    }

    #[test]
    fn test_stats() {
        let stats = stats(&mixed_set());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.hazardous_count, 2);
        assert_eq!(stats.safe_count, 3);
        assert_eq!(stats.closest_distance_thousand_km, 20);
    }

    #[test]
    fn test_stats_rounds_to_nearest_thousand() {
        let set = vec![sample_neo("x", false, 12_500.0, 1.0, 1.0, "2024-01-15 00:00")];
        assert_eq!(stats(&set).closest_distance_thousand_km, 13);
        let set = vec![sample_neo("y", false, 12_499.9, 1.0, 1.0, "2024-01-15 00:00")];
        assert_eq!(stats(&set).closest_distance_thousand_km, 12);
    }

    #[test]
    fn test_stats_empty_is_zero() {
        assert_eq!(stats(&[]), NeoStats::default());
    }

    #[test]
    fn test_two_date_scenario() {
        let feed = FeedResult::new(vec![
            group("2024-01-15", vec![sample_neo("A", true, 50_000.0, 10.0, 0.3, "2024-01-15 10:00")]),
            group("2024-01-16", vec![sample_neo("B", false, 20_000.0, 12.0, 0.2, "2024-01-16 10:00")]),
        ]);
        let set = flatten(feed);
        assert_eq!(set.len(), 2);
        assert_eq!(closest(&set).unwrap().id, "B");
        assert_eq!(
            stats(&set),
            NeoStats {
                total: 2,
                hazardous_count: 1,
                safe_count: 1,
                closest_distance_thousand_km: 20,
            }
        );
    }
}
