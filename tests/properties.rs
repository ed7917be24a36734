//! Property-based tests for the packing optimizer.
//!
//! Random child lists are packed and checked for the guarantees every
//! successful `optimize()` must give: no overlaps, sizes preserved, an
//! origin-anchored tight bound, determinism, idempotence, and compaction
//! never making the placement worse.

use std::sync::Arc;

use pressure::{optimize_with_stats, Block, Layout, LayoutConfig, LayoutRect};
use proptest::prelude::*;

/// Sizes on a half-pixel grid plus some awkward fractions.
fn dimension_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        (1u32..=80).prop_map(|n| f64::from(n) * 0.5),
        (1u32..=400).prop_map(|n| f64::from(n) / 7.0),
    ]
}

fn sizes_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((dimension_strategy(), dimension_strategy()), 0..24)
}

fn build(sizes: &[(f64, f64)], config: &LayoutConfig) -> Layout<Block> {
    let mut layout = Layout::with_config(config.clone());
    for (i, &(w, h)) in sizes.iter().enumerate() {
        layout
            .add_child(Arc::new(Block::new(&format!("p{i}"), w, h)))
            .unwrap();
    }
    layout
}

fn boxes(layout: &Layout<Block>) -> Vec<LayoutRect> {
    layout
        .children()
        .iter()
        .map(|c| c.rect().expect("every child is packed"))
        .collect()
}

fn config_strategy() -> impl Strategy<Value = LayoutConfig> {
    (0u32..4, prop_oneof![Just(1.0), Just(pressure::PHI), Just(3.0)]).prop_map(|(gap, ratio)| {
        LayoutConfig::default()
            .with_spacing(f64::from(gap), f64::from(gap))
            .with_target_ratio(ratio)
    })
}

proptest! {
    #[test]
    fn packing_is_overlap_free(sizes in sizes_strategy(), config in config_strategy()) {
        let mut layout = build(&sizes, &config);
        layout.optimize().unwrap();
        let rects = boxes(&layout);
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn dimensions_are_preserved(sizes in sizes_strategy()) {
        let mut layout = build(&sizes, &LayoutConfig::default());
        layout.optimize().unwrap();
        for (rect, &(w, h)) in boxes(&layout).iter().zip(&sizes) {
            prop_assert_eq!((rect.width, rect.height), (w, h));
        }
    }

    #[test]
    fn bound_is_tight_and_anchored(sizes in sizes_strategy(), config in config_strategy()) {
        let mut layout = build(&sizes, &config);
        let (w, h) = layout.optimize().unwrap();
        let rects = boxes(&layout);

        let max_right = rects.iter().map(LayoutRect::right).fold(0.0, f64::max);
        let max_bottom = rects.iter().map(LayoutRect::bottom).fold(0.0, f64::max);
        prop_assert_eq!((w, h), (max_right, max_bottom));

        if !rects.is_empty() {
            let min_x = rects.iter().map(|r| r.x).fold(f64::INFINITY, f64::min);
            let min_y = rects.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
            prop_assert_eq!((min_x, min_y), (0.0, 0.0));
        }
    }

    #[test]
    fn same_inputs_same_result(sizes in sizes_strategy(), config in config_strategy()) {
        let mut first = build(&sizes, &config);
        let mut second = build(&sizes, &config);
        prop_assert_eq!(first.optimize().unwrap(), second.optimize().unwrap());
        prop_assert_eq!(boxes(&first), boxes(&second));
    }

    #[test]
    fn optimize_twice_is_stable(sizes in sizes_strategy()) {
        let mut layout = build(&sizes, &LayoutConfig::default());
        let once = layout.optimize().unwrap();
        let rects_once = boxes(&layout);
        let twice = layout.optimize().unwrap();
        prop_assert_eq!(once, twice);
        prop_assert_eq!(rects_once, boxes(&layout));
    }

    #[test]
    fn compaction_never_hurts(sizes in sizes_strategy(), config in config_strategy()) {
        let mut layout = build(&sizes, &config);
        let stats = optimize_with_stats(&mut layout).unwrap();
        prop_assert!(stats.width * stats.height <= stats.initial_width * stats.initial_height);
        prop_assert!(stats.width <= stats.initial_width);
        prop_assert!(stats.height <= stats.initial_height);
        prop_assert!(stats.sweeps <= config.sweep_cap(sizes.len()));
    }
}
