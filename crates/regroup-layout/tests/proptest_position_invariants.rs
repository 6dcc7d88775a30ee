//! Property-based invariants for position mappings and layout offsets.
//!
//! 1. **Bijection**: `generate_positions` maps `n` unique ids onto `0..n`
//!    in input order.
//! 2. **Involution**: swapping the same pair twice restores the mapping.
//! 3. **Locality**: a swap only changes the entities at the two ordinals.
//! 4. **Linear content height**: doubling every section's rows adds exactly
//!    `rows × row_height`.
//! 5. **Top identities**: the first section in mapping order sits at 0, the
//!    last at `total − own height`, whatever swaps happened before.
//!
//! Dimensions are whole pixels so every float sum is exact.

use proptest::prelude::*;
use regroup_layout::{
    EntityId, Item, Metrics, PositionMap, Section, content_height, generate_positions,
    section_top, swap_positions,
};

fn items(n: usize) -> Vec<Item> {
    (0..n).map(|i| Item::new(format!("i{i}"))).collect()
}

fn sections(rows: &[usize]) -> Vec<Section<Item>> {
    rows.iter()
        .enumerate()
        .map(|(s, &count)| {
            Section::new(
                format!("s{s}"),
                (0..count).map(|i| Item::new(format!("s{s}-{i}"))).collect(),
            )
        })
        .collect()
}

fn apply_swaps(mut map: PositionMap, swaps: &[(usize, usize)]) -> PositionMap {
    let n = map.len().max(1);
    for &(a, b) in swaps {
        map = swap_positions(&map, a % n, b % n);
    }
    map
}

fn metrics_strategy() -> impl Strategy<Value = Metrics> {
    (1u32..120, 0u32..80).prop_map(|(row, header)| Metrics::new(f64::from(row), f64::from(header)))
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Mappings
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generate_is_bijection_in_input_order(n in 0usize..60) {
        let list = items(n);
        let map = generate_positions(&list);
        prop_assert_eq!(map.len(), n);
        prop_assert!(map.is_dense());
        for (i, item) in list.iter().enumerate() {
            prop_assert_eq!(map.ordinal(&item.id), Some(i));
        }
    }

    #[test]
    fn swap_is_involution(n in 1usize..40, a in 0usize..40, b in 0usize..40) {
        let map = generate_positions(&items(n));
        let twice = swap_positions(&swap_positions(&map, a, b), a, b);
        prop_assert_eq!(twice, map);
    }

    #[test]
    fn swap_touches_only_endpoints(
        n in 1usize..40,
        a in 0usize..40,
        b in 0usize..40,
        history in prop::collection::vec((0usize..40, 0usize..40), 0..10),
    ) {
        let map = apply_swaps(generate_positions(&items(n)), &history);
        let next = swap_positions(&map, a, b);
        prop_assert!(next.is_dense());
        for (id, before) in map.iter() {
            let after = next.ordinal(id);
            if before != a && before != b {
                prop_assert_eq!(after, Some(before));
            }
        }
        if a < n && b < n {
            let at_a: Option<EntityId> = map.id_at(a).cloned();
            let at_b: Option<EntityId> = map.id_at(b).cloned();
            prop_assert_eq!(next.id_at(b).cloned(), at_a);
            prop_assert_eq!(next.id_at(a).cloned(), at_b);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Offsets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn content_height_is_linear_in_rows(
        rows in prop::collection::vec(0usize..10, 0..8),
        metrics in metrics_strategy(),
    ) {
        let base = sections(&rows);
        let doubled_rows: Vec<usize> = rows.iter().map(|r| r * 2).collect();
        let doubled = sections(&doubled_rows);
        let total_rows: usize = rows.iter().sum();
        prop_assert_eq!(
            content_height(&doubled, metrics) - content_height(&base, metrics),
            total_rows as f64 * metrics.row_height
        );
    }

    #[test]
    fn first_top_is_zero_and_last_top_is_total_minus_own(
        rows in prop::collection::vec(0usize..10, 1..8),
        swaps in prop::collection::vec((0usize..8, 0usize..8), 0..12),
        metrics in metrics_strategy(),
    ) {
        let list = sections(&rows);
        let map = apply_swaps(generate_positions(&list), &swaps);
        let order = map.ordered_ids();

        let first = &order[0];
        prop_assert_eq!(section_top(&map, &list, first, metrics), Ok(0.0));

        let last = &order[order.len() - 1];
        let own = list
            .iter()
            .find(|s| &s.id == last)
            .map(|s| metrics.section_height(s.row_count()))
            .unwrap();
        prop_assert_eq!(
            section_top(&map, &list, last, metrics),
            Ok(content_height(&list, metrics) - own)
        );
    }

    #[test]
    fn section_tops_are_monotonic_in_mapping_order(
        rows in prop::collection::vec(0usize..10, 1..8),
        swaps in prop::collection::vec((0usize..8, 0usize..8), 0..12),
        metrics in metrics_strategy(),
    ) {
        let list = sections(&rows);
        let map = apply_swaps(generate_positions(&list), &swaps);
        let tops: Vec<f64> = map
            .ordered_ids()
            .iter()
            .map(|id| section_top(&map, &list, id, metrics).unwrap())
            .collect();
        for pair in tops.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}
