//! Property-based invariants for the navigation controller.
//!
//! 1. The scrolled flag is true iff the offset exceeds the threshold
//! 2. Easing is monotonic on [0, 1] and stays within [0, 1]
//! 3. Sub-minimum distances never write a scroll position
//! 4. Toggle flips the menu exactly once per click
//! 5. The selected section has the strictly maximal ratio among intersecting entries
//! 6. At most one link carries the active marker after any event sequence

use std::time::Duration;

use proptest::prelude::*;
use sitenav_core::{
    IntersectionSample, NavConfig, NavController, NavLayout, NavLink, RecordingDocument,
    ease_in_out_quart, most_visible,
};

const SECTIONS: [&str; 4] = ["home", "about", "work", "contact"];

fn controller() -> NavController<RecordingDocument> {
    let mut doc = RecordingDocument::new();
    for (i, id) in SECTIONS.iter().enumerate() {
        doc = doc.with_section(*id, i as f64 * 700.0);
    }
    let links = SECTIONS
        .iter()
        .map(|id| NavLink::to_href(format!("#{id}")))
        .collect();
    NavController::new(doc, NavLayout::new(links, SECTIONS).with_toggle(None), NavConfig::default())
}

#[derive(Debug, Clone)]
enum Op {
    Scroll(f64),
    Click(usize),
    Toggle,
    Escape,
    Resize(f64),
    Observe(Vec<(usize, f64, bool)>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f64..5_000.0).prop_map(Op::Scroll),
        (0usize..SECTIONS.len()).prop_map(Op::Click),
        Just(Op::Toggle),
        Just(Op::Escape),
        (200.0f64..2_000.0).prop_map(Op::Resize),
        prop::collection::vec((0usize..SECTIONS.len(), 0.0f64..=1.0, any::<bool>()), 0..6)
            .prop_map(Op::Observe),
    ]
}

fn sample_strategy() -> impl Strategy<Value = Vec<IntersectionSample>> {
    // Unique ids so a selected id identifies exactly one sample.
    prop::collection::vec((0.0f64..=1.0, any::<bool>()), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (r, hit))| IntersectionSample::new(format!("section-{i}"), r, hit))
            .collect()
    })
}

proptest! {
    #[test]
    fn scrolled_iff_offset_exceeds_threshold(offset in -100.0f64..10_000.0) {
        let mut nav = controller();
        nav.document_mut().set_scroll_y(offset);
        nav.update_scrolled();
        prop_assert_eq!(nav.is_scrolled(), offset > 50.0);
    }

    #[test]
    fn easing_is_monotonic_and_bounded(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (f_lo, f_hi) = (ease_in_out_quart(lo), ease_in_out_quart(hi));
        prop_assert!(f_lo <= f_hi, "f({lo}) = {f_lo} > f({hi}) = {f_hi}");
        prop_assert!((0.0..=1.0).contains(&f_lo));
        prop_assert!((0.0..=1.0).contains(&f_hi));
    }

    #[test]
    fn sub_minimum_distance_writes_nothing(jitter in -4.99f64..4.99) {
        let mut nav = controller();
        // Link 1 targets 700 - 80 - 20 = 600.
        nav.document_mut().set_scroll_y(600.0 + jitter);
        nav.init().unwrap();
        prop_assert_eq!(nav.on_link_click(1).unwrap(), None);
        prop_assert!(nav.document().scroll_writes().is_empty());
    }

    #[test]
    fn toggle_flips_exactly_once(clicks in 0usize..20) {
        let mut nav = controller();
        for _ in 0..clicks {
            prop_assert!(nav.on_toggle_click());
        }
        prop_assert_eq!(nav.is_menu_open(), clicks % 2 == 1);
    }

    #[test]
    fn selected_sample_has_strictly_maximal_ratio(samples in sample_strategy()) {
        let selected = most_visible(&samples);
        let hits: Vec<&IntersectionSample> =
            samples.iter().filter(|s| s.is_intersecting && s.ratio > 0.0).collect();
        match selected {
            None => prop_assert!(hits.is_empty()),
            Some(id) => {
                let first = hits
                    .iter()
                    .position(|s| s.id == id)
                    .expect("selected id must be an intersecting sample");
                let ratio = hits[first].ratio;
                prop_assert!(hits.iter().all(|s| s.ratio <= ratio));
                prop_assert!(hits[..first].iter().all(|s| s.ratio < ratio));
            }
        }
    }

    #[test]
    fn at_most_one_active_link(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut nav = controller();
        nav.init().unwrap();
        let mut now = Duration::ZERO;
        for op in ops {
            now += Duration::from_millis(16);
            match op {
                Op::Scroll(y) => {
                    nav.document_mut().set_scroll_y(y);
                    nav.on_scroll(now);
                    nav.poll_scroll(now + Duration::from_millis(10));
                }
                Op::Click(i) => {
                    if let Some(ticket) = nav.on_link_click(i).unwrap() {
                        nav.on_animation_frame(ticket, now);
                    }
                }
                Op::Toggle => { nav.on_toggle_click(); }
                Op::Escape => { nav.on_key("Escape"); }
                Op::Resize(w) => { nav.on_resize(w); }
                Op::Observe(entries) => {
                    let batch: Vec<IntersectionSample> = entries
                        .into_iter()
                        .map(|(i, r, hit)| IntersectionSample::new(SECTIONS[i], r, hit))
                        .collect();
                    nav.on_intersections(&batch);
                }
            }
            prop_assert!(nav.document().links_with_class("active").len() <= 1);
        }
    }
}
